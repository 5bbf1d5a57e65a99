use std::collections::HashMap;
use std::fmt;
use std::iter;

use crate::chart::{Chart, Derivation, Edge};
use crate::syntree::{Constituent, SynTree, Word};

pub type Tree = SynTree<String, String>;

pub type Trees<'f> = Box<dyn Iterator<Item = Tree> + 'f>;
pub type Sequences<'f> = Box<dyn Iterator<Item = Vec<Tree>> + 'f>;

/// All parses of a sentence, packed into a chart. Trees are unpacked lazily.
#[derive(Debug)]
pub struct Forest<'g> {
  chart: Chart<'g>,
  root: Option<Edge>,
}

impl<'g> From<Chart<'g>> for Forest<'g> {
  fn from(chart: Chart<'g>) -> Self {
    let root = chart.root();
    Self { chart, root }
  }
}

impl<'g> Forest<'g> {
  pub fn chart(&self) -> &Chart<'g> {
    &self.chart
  }

  /// The start-symbol edge spanning the whole sentence, if there is a parse
  pub fn root(&self) -> Option<&Edge> {
    self.root.as_ref()
  }

  /// True when the sentence has no parse
  pub fn is_empty(&self) -> bool {
    self.root.is_none()
  }

  /// How many trees `trees()` will yield, counted from the chart without
  /// building them. Saturates at `usize::MAX`.
  pub fn tree_count(&self) -> usize {
    let mut memo = HashMap::new();
    self
      .root
      .as_ref()
      .map_or(0, |root| self.count_edge(root, &mut Vec::new(), &mut memo))
  }

  /// `path` holds the ancestors of `edge` over the same span, reached through
  /// unit derivations. Only counts with an empty path are memoized, since an
  /// edge below a longer rule can't meet any of its ancestors again.
  fn count_edge<'a>(
    &'a self,
    edge: &'a Edge,
    path: &mut Vec<&'a Edge>,
    memo: &mut HashMap<&'a Edge, usize>,
  ) -> usize {
    if path.is_empty() {
      if let Some(&count) = memo.get(edge) {
        return count;
      }
    }

    let mut count = 0usize;
    for derivation in self.chart.derivations(edge) {
      let trees = match derivation {
        Derivation::Lexical => 1,
        Derivation::Rule { children, .. } => match children.as_slice() {
          [child] => {
            if child == edge || path.contains(&child) {
              0
            } else {
              path.push(edge);
              let n = self.count_edge(child, path, memo);
              path.pop();
              n
            }
          }
          _ => children.iter().fold(1usize, |acc, child| {
            acc.saturating_mul(self.count_edge(child, &mut Vec::new(), memo))
          }),
        },
      };
      count = count.saturating_add(trees);
    }

    if path.is_empty() {
      memo.insert(edge, count);
    }
    count
  }

  /// Every parse tree, one per distinct derivation, in a stable order.
  /// Nothing is built until the iterator is advanced, and each call starts
  /// over from the first tree.
  ///
  /// Derivations through cyclic unit rules (`S -> S`) are skipped whenever
  /// they would revisit an edge already on the way down from the root, so
  /// the trees are finite and never repeat a node inside themselves.
  pub fn trees(&self) -> Trees<'_> {
    match self.root.as_ref() {
      Some(root) => self.make_trees(root, Vec::new()),
      None => Box::new(iter::empty()),
    }
  }

  /// Takes an edge and returns all possible trees it describes. `path` is
  /// the same as in `count_edge`.
  fn make_trees<'f>(&'f self, edge: &'f Edge, path: Vec<&'f Edge>) -> Trees<'f> {
    let cons = Constituent {
      value: edge.symbol.name().to_string(),
      span: (edge.start, edge.end),
    };

    Box::new(
      self
        .chart
        .derivations(edge)
        .iter()
        .flat_map(move |derivation| -> Trees<'f> {
          match derivation {
            Derivation::Lexical => {
              let word = Word {
                value: self.chart.tokens()[edge.start].clone(),
                span: cons.span,
              };
              Box::new(iter::once(SynTree::Leaf(cons.clone(), word)))
            }
            Derivation::Rule { children, .. } => {
              let cons = cons.clone();
              match children.as_slice() {
                [child] if child == edge || path.contains(&child) => Box::new(iter::empty()),
                [child] => {
                  let mut path = path.clone();
                  path.push(edge);
                  Box::new(
                    self
                      .make_trees(child, path)
                      .map(move |tree| SynTree::Branch(cons.clone(), vec![tree])),
                  )
                }
                _ => Box::new(
                  self
                    .sequences(children)
                    .map(move |children| SynTree::Branch(cons.clone(), children)),
                ),
              }
            }
          }
        }),
    )
  }

  /// Every combination of trees for a sequence of sibling edges, varying
  /// the rightmost sibling fastest
  fn sequences<'f>(&'f self, edges: &'f [Edge]) -> Sequences<'f> {
    match edges.split_first() {
      None => Box::new(iter::once(Vec::new())),
      Some((first, rest)) => Box::new(self.make_trees(first, Vec::new()).flat_map(move |head| {
        self.sequences(rest).map(move |mut seq| {
          seq.insert(0, head.clone());
          seq
        })
      })),
    }
  }
}

impl fmt::Display for Forest<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.root.as_ref() {
      Some(root) => writeln!(f, "{} ({} trees)", root, self.tree_count()),
      None => writeln!(f, "no parse"),
    }
  }
}
