use std::error::Error;

use thiserror::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// A grammar that can't be built. Always fatal: nothing gets parsed with it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
  #[error("syntax error: {0}")]
  Syntax(String),

  #[error("empty ruleset")]
  Empty,

  #[error("start symbol {0} has no productions")]
  MissingStart(String),

  #[error("rule for {0} has an empty right-hand side")]
  EmptyRhs(String),

  #[error("rule `{rule}` uses undeclared symbol {symbol}")]
  Undeclared { rule: String, symbol: String },

  #[error("terminal category {0} has no words")]
  EmptyCategory(String),

  #[error("{0} is declared both as a nonterminal and as a terminal category")]
  Conflict(String),
}

/// A token sequence that isn't a sequence of words. Only fails the one request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
  #[error("token {position} is empty")]
  EmptyToken { position: usize },

  #[error("token {position} ({token:?}) contains whitespace")]
  Whitespace { position: usize, token: String },
}

/// Checks that every token is a non-empty, whitespace-free string.
pub fn check_tokens<S: AsRef<str>>(input: &[S]) -> Result<(), InputError> {
  for (position, token) in input.iter().enumerate() {
    let token = token.as_ref();
    if token.is_empty() {
      return Err(InputError::EmptyToken { position });
    }
    if token.chars().any(char::is_whitespace) {
      return Err(InputError::Whitespace {
        position,
        token: token.to_string(),
      });
    }
  }
  Ok(())
}
