use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::grammar::Grammar;
use crate::rules::Symbol;

/// "`symbol` derives exactly the tokens `start..end`"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
  pub start: usize,
  pub end: usize,
  pub symbol: Symbol,
}

impl Edge {
  pub fn new(start: usize, end: usize, symbol: Symbol) -> Self {
    Self { start, end, symbol }
  }

  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Display for Edge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.start, self.end, self.symbol)
  }
}

/// One way an edge was derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
  /// A terminal edge: the token at the edge's start is in the category's
  /// vocabulary.
  Lexical,
  /// A nonterminal edge built from `grammar.rule(rule)`, whose right-hand
  /// side symbols derive `children`, in order, tiling the edge's span.
  Rule { rule: usize, children: Vec<Edge> },
}

/// The memo table of every edge derivable from a token sequence, with every
/// derivation of each edge.
#[derive(Debug)]
pub struct Chart<'g> {
  grammar: &'g Grammar,
  tokens: Vec<String>,
  derivations: HashMap<Edge, Vec<Derivation>>,
  /// Edges in the order they were first derived, for stable output
  order: Vec<Edge>,
}

impl<'g> Chart<'g> {
  pub fn new(grammar: &'g Grammar, tokens: Vec<String>) -> Self {
    Self {
      grammar,
      tokens,
      derivations: HashMap::new(),
      order: Vec::new(),
    }
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  pub fn tokens(&self) -> &[String] {
    &self.tokens
  }

  /// Number of distinct edges
  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn has(&self, edge: &Edge) -> bool {
    self.derivations.contains_key(edge)
  }

  /// All recorded derivations of `edge`; empty if the edge doesn't exist.
  pub fn derivations(&self, edge: &Edge) -> &[Derivation] {
    self
      .derivations
      .get(edge)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn edges(&self) -> impl Iterator<Item = &Edge> {
    self.order.iter()
  }

  /// The edge for a complete parse, if the start symbol covers every token
  pub fn root(&self) -> Option<Edge> {
    let edge = Edge::new(
      0,
      self.tokens.len(),
      Symbol::nonterminal(self.grammar.start()),
    );
    // an empty sentence never parses: no rule has an empty right-hand side
    if !edge.is_empty() && self.has(&edge) {
      Some(edge)
    } else {
      None
    }
  }

  /// Records a derivation, returning whether it was new
  pub fn add(&mut self, edge: Edge, derivation: Derivation) -> bool {
    if let Some(existing) = self.derivations.get_mut(&edge) {
      if existing.contains(&derivation) {
        return false;
      }
      trace!(%edge, "additional derivation");
      existing.push(derivation);
    } else {
      trace!(%edge, "new edge");
      self.order.push(edge.clone());
      self.derivations.insert(edge, vec![derivation]);
    }
    true
  }

  /// Takes a rule's right-hand side and a search span, and returns every
  /// sequence of existing edges that derive the symbols in order and tile
  /// the span exactly, each edge non-empty.
  /// So for the situation:
  /// ```text
  /// g := '''
  ///   S -> S S | X
  ///   X -> "x"
  /// '''
  /// chart := parse(g, "x x x")
  /// chart.extend_out([S, S], start = 0, end = 3)
  /// ```
  /// you'd get
  ///
  /// ```text
  /// [[0..1: S, 1..3: S],
  ///  [0..2: S, 2..3: S]]
  /// ```
  fn extend_out(&self, rhs: &[Symbol], search_start: usize, search_end: usize) -> Vec<Vec<Edge>> {
    let Some((next, rest)) = rhs.split_first() else {
      // base case, we consumed the whole rule. it's only a match if we consumed the whole span too.
      return if search_start == search_end {
        vec![Vec::new()]
      } else {
        Vec::new()
      };
    };

    // every remaining symbol needs at least one token
    if search_end - search_start < rhs.len() {
      return Vec::new();
    }

    let mut sequences = Vec::new();
    for mid in search_start + 1..=search_end - rest.len() {
      let edge = Edge::new(search_start, mid, next.clone());
      if !self.has(&edge) {
        continue;
      }
      for mut seq in self.extend_out(rest, mid, search_end) {
        seq.insert(0, edge.clone());
        sequences.push(seq);
      }
    }
    sequences
  }

  /// Tries every rule (or only unit rules) over `start..end`, returning
  /// whether anything new was recorded
  fn complete_span(&mut self, start: usize, end: usize, unit_only: bool) -> bool {
    let grammar = self.grammar;
    let mut added = false;
    for (idx, rule) in grammar.rules().iter().enumerate() {
      if rule.len() > end - start || (unit_only && !rule.is_unit()) {
        continue;
      }
      for children in self.extend_out(&rule.rhs, start, end) {
        let edge = Edge::new(start, end, Symbol::nonterminal(rule.lhs.as_str()));
        added |= self.add(edge, Derivation::Rule { rule: idx, children });
      }
    }
    added
  }
}

/// Builds the chart for `input` bottom-up, by increasing span length.
///
/// Terminal edges come straight from the lexicon. A nonterminal edge over a
/// span is derived from rules whose symbols tile the span with edges already
/// in the chart. Rules with two or more symbols only use strictly shorter
/// spans, which are finished by the time we get here; unit rules use the
/// same span, so each span is revisited with just the unit rules until
/// nothing changes. That terminates even with unit cycles like `S -> S`,
/// since `add` never records the same derivation twice.
pub fn parse_chart<'g, S: AsRef<str>>(g: &'g Grammar, input: &[S]) -> Chart<'g> {
  let tokens = input
    .iter()
    .map(|t| t.as_ref().to_string())
    .collect::<Vec<_>>();
  let mut chart = Chart::new(g, tokens);
  let n = chart.tokens.len();

  for k in 0..n {
    for category in g.categories_of(&chart.tokens[k]) {
      chart.add(
        Edge::new(k, k + 1, Symbol::terminal(category.as_str())),
        Derivation::Lexical,
      );
    }
  }

  for len in 1..=n {
    for start in 0..=n - len {
      let end = start + len;
      let mut unit_only = false;
      while chart.complete_span(start, end, unit_only) {
        unit_only = true;
      }
    }
  }

  debug!(
    tokens = n,
    edges = chart.len(),
    parsed = chart.root().is_some(),
    "built chart"
  );

  chart
}

impl fmt::Display for Chart<'_> {
  /// One line per edge, then one indented line per rule derivation naming
  /// the production and the child edges it used.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut edges = self.order.iter().collect::<Vec<_>>();
    edges.sort_by_key(|e| (e.start, e.end));
    for edge in edges {
      write!(f, "{}", edge)?;
      for derivation in self.derivations(edge) {
        match derivation {
          Derivation::Lexical => write!(f, " ({})", self.tokens[edge.start])?,
          Derivation::Rule { rule, children } => {
            write!(f, "\n  {} (", self.grammar.rule(*rule))?;
            for (idx, child) in children.iter().enumerate() {
              if idx > 0 {
                write!(f, ", ")?;
              }
              write!(f, "{}", child)?;
            }
            write!(f, ")")?;
          }
        }
      }
      writeln!(f)?;
    }
    Ok(())
  }
}
