#[macro_use]
extern crate lazy_static;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

pub mod chart;
pub mod chunk;
pub mod error;
pub mod forest;
pub mod grammar;
pub mod grammars;
pub mod parse_grammar;
pub mod preprocess;
pub mod rules;
pub mod syntree;

use tracing::debug_span;

use crate::chart::{parse_chart, Chart};
use crate::error::check_tokens;
pub use crate::chunk::{extract_chunks, noun_phrase_chunks, Chunk, NOUN_PHRASE};
pub use crate::error::{Err, GrammarError, InputError};
pub use crate::forest::{Forest, Tree};
pub use crate::grammar::Grammar;
pub use crate::preprocess::preprocess;
pub use crate::rules::{Rule, Symbol};
pub use crate::syntree::{Constituent, SynTree, Word};

impl Grammar {
  /// Builds the chart of every edge derivable from `input`.
  pub fn parse_chart<S: AsRef<str>>(&self, input: &[S]) -> Result<Chart<'_>, InputError> {
    check_tokens(input)?;
    let _span = debug_span!("parse", tokens = input.len()).entered();
    Ok(parse_chart(self, input))
  }

  /// Parses `input` into a forest that yields its trees lazily.
  pub fn parse_forest<S: AsRef<str>>(&self, input: &[S]) -> Result<Forest<'_>, InputError> {
    self.parse_chart(input).map(Forest::from)
  }

  /// Every parse tree of `input`. An empty vec means the sentence doesn't
  /// parse; `Err` means `input` isn't a sequence of words.
  pub fn parse<S: AsRef<str>>(&self, input: &[S]) -> Result<Vec<Tree>, InputError> {
    Ok(self.parse_forest(input)?.trees().collect())
  }
}
