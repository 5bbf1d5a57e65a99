//! Simple recursive-descent parsing of grammar files

use regex::Regex;
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::rules::{Rule, Symbol};

impl FromStr for Grammar {
  type Err = GrammarError;

  /// Parses a grammar from a string. Assumes the first rule's symbol
  /// is the start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (lines, s) = parse_lines(s)?;
    debug_assert!(s.is_empty());
    resolve(lines)
  }
}

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), GrammarError>;

/// One element of an alternative, before we know which names are categories
#[derive(Debug, Clone, PartialEq)]
enum Item {
  Name(String),
  Word(String),
}

/// `lhs -> alt | alt | ...`, exactly as written on one line
#[derive(Debug, Clone, PartialEq)]
struct Line {
  lhs: String,
  alternatives: Vec<Vec<Item>>,
}

fn syntax_error(what: &str, s: &str) -> GrammarError {
  let context = s.lines().next().unwrap_or("end of input");
  GrammarError::Syntax(format!("{} at `{}`", what, context))
}

/// Try to consume a regex, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  match re.find(s) {
    Some(m) if m.start() == 0 => {
      let (_, rest) = s.split_at(m.end());
      (Some(m.as_str()), rest)
    }
    _ => (None, s),
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, what: &str, s: &'a str) -> ParseResult<'a, &'a str> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(syntax_error(&format!("expected {}", what), s))
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<'_, Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

/// Skips whitespace, newlines, and `//` or `#` comments
fn skip_whitespace(s: &str) -> &str {
  regex_static!(WHITESPACE_OR_COMMENT, r"^(\s|//[^\n]*|#[^\n]*)+");
  optional_re(&*WHITESPACE_OR_COMMENT, s).1
}

/// Skips spaces and tabs, staying on the current line
fn skip_inline_whitespace(s: &str) -> &str {
  regex_static!(INLINE_WHITESPACE, r"^[ \t\r]+");
  optional_re(&*INLINE_WHITESPACE, s).1
}

/// Consumes the end of a rule line: an optional comment, then a newline or
/// the end of input.
fn end_of_line(s: &str) -> ParseResult<'_, ()> {
  regex_static!(END_OF_LINE, r"^((//|#)[^\n]*)?(\n|$)");
  needed_re(&*END_OF_LINE, "end of line", s).map(|(_, rest)| ((), rest))
}

/// Tries to parse a symbol name made of letters, numbers, _ and inner -
fn parse_name(s: &str) -> ParseResult<'_, &str> {
  regex_static!(NAME, r"^[a-zA-Z0-9_]+(-[a-zA-Z0-9_]+)*");
  needed_re(&*NAME, "symbol name", s)
}

/// Parses a quoted literal word, returning it without the quotes
fn parse_word(s: &str) -> ParseResult<'_, &str> {
  regex_static!(WORD, r#"^("[^"\n]*"|'[^'\n]*')"#);
  let (quoted, rest) = needed_re(&*WORD, "quoted word", s)?;
  let word = &quoted[1..quoted.len() - 1];
  if word.is_empty() {
    Err(syntax_error("empty word", s))
  } else {
    Ok((word, rest))
  }
}

fn parse_item(s: &str) -> ParseResult<'_, Item> {
  if s.starts_with('"') || s.starts_with('\'') {
    let (word, s) = parse_word(s)?;
    Ok((Item::Word(word.to_string()), s))
  } else {
    let (name, s) = parse_name(s)?;
    Ok((Item::Name(name.to_string()), s))
  }
}

/// Items up to the next `|` or the end of the line
fn parse_alternative(s: &str) -> ParseResult<'_, Vec<Item>> {
  let mut items = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_inline_whitespace(rem);
    if rem.is_empty() || rem.starts_with(['|', '\n', '#']) || rem.starts_with("//") {
      break;
    }
    let (item, s) = parse_item(rem)?;
    items.push(item);
    rem = s;
  }

  if items.is_empty() {
    Err(syntax_error("empty alternative", s))
  } else {
    Ok((items, rem))
  }
}

/// Symbol, arrow, alternatives, terminated by a newline
fn parse_line(s: &str) -> ParseResult<'_, Line> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, "^->");

  let (lhs, s) = parse_name(s)?;
  let s = skip_inline_whitespace(s);
  let (_, s) = needed_re(&*ARROW, "`->`", s)?;

  let mut alternatives = Vec::new();
  let mut rem = s;
  loop {
    let (alternative, s) = parse_alternative(rem)?;
    alternatives.push(alternative);
    let s = skip_inline_whitespace(s);
    if let (Some(_), s) = optional_char('|', s) {
      rem = s;
    } else {
      rem = end_of_line(s)?.1;
      break;
    }
  }

  Ok((
    Line {
      lhs: lhs.to_string(),
      alternatives,
    },
    rem,
  ))
}

fn parse_lines(s: &str) -> ParseResult<'_, Vec<Line>> {
  let mut lines = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_whitespace(rem);
    if rem.is_empty() {
      return Ok((lines, rem));
    }
    let (line, s) = parse_line(rem)?;
    lines.push(line);
    rem = s;
  }
}

/// Sorts lines into nonterminal rules and lexicon entries, then tags every
/// right-hand-side name as a terminal category or a nonterminal.
fn resolve(lines: Vec<Line>) -> Result<Grammar, GrammarError> {
  let start = match lines.first() {
    Some(line) => line.lhs.clone(),
    None => return Err(GrammarError::Empty),
  };

  let mut categories = HashSet::new();
  let mut nonterminals = HashSet::new();
  for line in lines.iter() {
    for alternative in line.alternatives.iter() {
      match alternative.as_slice() {
        [Item::Word(_)] => categories.insert(line.lhs.as_str()),
        items if items.iter().all(|i| matches!(i, Item::Name(_))) => {
          nonterminals.insert(line.lhs.as_str())
        }
        _ => {
          return Err(GrammarError::Syntax(format!(
            "a quoted word must be a whole alternative in rule for {}",
            line.lhs
          )));
        }
      };
    }
  }

  if let Some(name) = categories.intersection(&nonterminals).next() {
    return Err(GrammarError::Conflict(name.to_string()));
  }

  let mut rules = Vec::new();
  let mut lexicon = Vec::new();
  for line in lines.iter() {
    let mut words = Vec::new();
    for alternative in line.alternatives.iter() {
      match alternative.as_slice() {
        [Item::Word(w)] => words.push(w.clone()),
        items => {
          let rhs = items
            .iter()
            .map(|item| match item {
              Item::Name(n) if categories.contains(n.as_str()) => Symbol::terminal(n.as_str()),
              Item::Name(n) | Item::Word(n) => Symbol::nonterminal(n.as_str()),
            })
            .collect();
          rules.push(Rule::new(line.lhs.clone(), rhs));
        }
      }
    }
    if !words.is_empty() {
      lexicon.push((line.lhs.clone(), words));
    }
  }

  Grammar::new(start, rules, lexicon)
}
