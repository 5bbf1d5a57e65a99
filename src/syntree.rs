use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: (usize, usize),
}

impl<T> fmt::Display for Constituent<T>
where
  T: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Word<U> {
  pub value: U,
  pub span: (usize, usize),
}

impl<U> fmt::Display for Word<U>
where
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.value)
  }
}

/// A parse tree. Branches are labeled with a nonterminal and own their
/// children; leaves are labeled with a terminal category and hold the word
/// they cover. Spans are token offsets into the parsed sentence.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Vec<SynTree<T, U>>),
  Leaf(Constituent<T>, Word<U>),
}

impl<T, U> SynTree<T, U> {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(..))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(..))
  }

  pub fn get_leaf(&self) -> Option<(&Constituent<T>, &Word<U>)> {
    match self {
      Self::Leaf(c, w) => Some((c, w)),
      _ => None,
    }
  }

  pub fn get_branch(&self) -> Option<(&Constituent<T>, &Vec<SynTree<T, U>>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  pub fn constituent(&self) -> &Constituent<T> {
    match self {
      Self::Branch(c, _) | Self::Leaf(c, _) => c,
    }
  }

  pub fn label(&self) -> &T {
    &self.constituent().value
  }

  pub fn span(&self) -> (usize, usize) {
    self.constituent().span
  }

  /// Children in order. Always empty for leaves.
  pub fn children(&self) -> &[SynTree<T, U>] {
    match self {
      Self::Branch(_, cs) => cs,
      Self::Leaf(..) => &[],
    }
  }

  /// The word under a leaf. None for branches.
  pub fn token(&self) -> Option<&U> {
    self.get_leaf().map(|(_, w)| &w.value)
  }

  /// Every subtree, starting with this one, that satisfies `predicate`, in
  /// pre-order. Lazy; call again to restart.
  pub fn subtrees<P>(&self, predicate: P) -> Subtrees<'_, T, U, P>
  where
    P: FnMut(&SynTree<T, U>) -> bool,
  {
    Subtrees {
      stack: vec![self],
      predicate,
    }
  }

  /// The words at the leaves, left to right
  pub fn leaves(&self) -> impl Iterator<Item = &U> + '_ {
    self.subtrees(SynTree::is_leaf).filter_map(SynTree::token)
  }
}

pub struct Subtrees<'t, T, U, P> {
  stack: Vec<&'t SynTree<T, U>>,
  predicate: P,
}

impl<'t, T, U, P> Iterator for Subtrees<'t, T, U, P>
where
  P: FnMut(&SynTree<T, U>) -> bool,
{
  type Item = &'t SynTree<T, U>;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(tree) = self.stack.pop() {
      // reversed, so the leftmost child is popped first
      self.stack.extend(tree.children().iter().rev());
      if (self.predicate)(tree) {
        return Some(tree);
      }
    }
    None
  }
}

impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(c, w) => write!(f, "({} {})", c, w),
      Self::Branch(c, cs) => {
        write!(f, "({}", c)?;
        if cs.len() == 1 && cs[0].is_leaf() {
          write!(f, " {})", cs[0])
        } else {
          for t in cs.iter() {
            // TODO: is there a nice way to do this that doesn't allocate a String?
            let fmt = format!("{}", t);
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  type Tree = SynTree<&'static str, &'static str>;

  fn leaf(label: &'static str, word: &'static str, at: usize) -> Tree {
    SynTree::Leaf(
      Constituent {
        value: label,
        span: (at, at + 1),
      },
      Word {
        value: word,
        span: (at, at + 1),
      },
    )
  }

  fn branch(label: &'static str, children: Vec<Tree>) -> Tree {
    let span = (
      children.first().map_or(0, |c| c.span().0),
      children.last().map_or(0, |c| c.span().1),
    );
    SynTree::Branch(Constituent { value: label, span }, children)
  }

  /// holmes lit a pipe
  fn example() -> Tree {
    branch(
      "S",
      vec![
        branch("NP", vec![leaf("N", "holmes", 0)]),
        branch(
          "VP",
          vec![
            leaf("V", "lit", 1),
            branch("NP", vec![leaf("Det", "a", 2), leaf("N", "pipe", 3)]),
          ],
        ),
      ],
    )
  }

  #[test]
  fn test_accessors() {
    let tree = example();
    assert_eq!(*tree.label(), "S");
    assert_eq!(tree.span(), (0, 4));
    assert_eq!(tree.children().len(), 2);
    assert_eq!(tree.token(), None);

    let holmes = &tree.children()[0].children()[0];
    assert!(holmes.is_leaf());
    assert_eq!(holmes.token(), Some(&"holmes"));
    assert!(holmes.children().is_empty());
  }

  #[test]
  fn test_subtrees_preorder() {
    let tree = example();
    let labels = tree
      .subtrees(|_| true)
      .map(|t| *t.label())
      .collect::<Vec<_>>();
    assert_eq!(labels, vec!["S", "NP", "N", "VP", "V", "NP", "Det", "N"]);

    let nps = tree
      .subtrees(|t| *t.label() == "NP")
      .map(|t| t.span())
      .collect::<Vec<_>>();
    assert_eq!(nps, vec![(0, 1), (2, 4)]);

    // restartable
    assert_eq!(tree.subtrees(|t| *t.label() == "NP").count(), 2);
    assert_eq!(tree.subtrees(|t| *t.label() == "NP").count(), 2);
  }

  #[test]
  fn test_leaves() {
    let tree = example();
    let words = tree.leaves().copied().collect::<Vec<_>>();
    assert_eq!(words, vec!["holmes", "lit", "a", "pipe"]);
  }

  #[test]
  fn test_display() {
    let tree = branch("NP", vec![leaf("Det", "a", 2), leaf("N", "pipe", 3)]);
    assert_eq!(tree.to_string(), "(2..4: NP\n  (2..3: Det a)\n  (3..4: N pipe))");

    let tree = branch("NP", vec![leaf("N", "holmes", 0)]);
    assert_eq!(tree.to_string(), "(0..1: NP (0..1: N holmes))");
  }
}
