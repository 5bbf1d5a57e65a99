//! Noun phrase chunks: every subtree labeled as a noun phrase, nested ones
//! included, outer phrases before the phrases inside them.

use std::fmt;

use crate::syntree::SynTree;

/// The nonterminal that labels noun phrases in the built-in grammar
pub const NOUN_PHRASE: &str = "NP";

/// A borrowed view of one chunk subtree inside a parse tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'t> {
  tree: &'t SynTree<String, String>,
}

impl<'t> Chunk<'t> {
  pub fn tree(&self) -> &'t SynTree<String, String> {
    self.tree
  }

  pub fn span(&self) -> (usize, usize) {
    self.tree.span()
  }

  /// The words under the chunk, in sentence order
  pub fn words(&self) -> impl Iterator<Item = &'t str> + use<'t> {
    self.tree.leaves().map(String::as_str)
  }

  /// The surface phrase, words joined by single spaces
  pub fn text(&self) -> String {
    self.words().collect::<Vec<_>>().join(" ")
  }
}

impl fmt::Display for Chunk<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.text())
  }
}

/// Every subtree of `tree` labeled `label`, in pre-order.
pub fn extract_chunks<'t>(tree: &'t SynTree<String, String>, label: &str) -> Vec<Chunk<'t>> {
  tree
    .subtrees(|t| t.is_branch() && t.label() == label)
    .map(|tree| Chunk { tree })
    .collect()
}

pub fn noun_phrase_chunks(tree: &SynTree<String, String>) -> Vec<Chunk<'_>> {
  extract_chunks(tree, NOUN_PHRASE)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Grammar;

  fn chunk_texts(tree: &SynTree<String, String>) -> Vec<String> {
    noun_phrase_chunks(tree).iter().map(Chunk::text).collect()
  }

  #[test]
  fn test_single_chunk() {
    let g = Grammar::sentences();
    let trees = g.parse(&["holmes", "sat"]).unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(chunk_texts(&trees[0]), vec!["holmes"]);

    let chunks = noun_phrase_chunks(&trees[0]);
    assert_eq!(chunks[0].span(), (0, 1));
    assert_eq!(chunks[0].to_string(), "holmes");
    assert!(std::ptr::eq(chunks[0].tree(), &trees[0].children()[0]));
  }

  #[test]
  fn test_chunks_in_preorder() {
    let g = Grammar::sentences();
    let trees = g.parse(&["holmes", "lit", "a", "pipe"]).unwrap();
    assert!(
      trees
        .iter()
        .any(|t| chunk_texts(t) == vec!["holmes", "a pipe"])
    );
  }

  #[test]
  fn test_nested_chunks_included() {
    // NP -> AP NP puts "pipe" inside "red pipe", and both are chunks
    let g = Grammar::sentences();
    let trees = g.parse(&["holmes", "lit", "the", "red", "pipe"]).unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(chunk_texts(&trees[0]), vec!["holmes", "the red pipe", "pipe"]);
  }

  #[test]
  fn test_other_labels() {
    let g = Grammar::sentences();
    let trees = g.parse(&["holmes", "sat", "down"]).unwrap();
    assert_eq!(trees.len(), 1);
    let vps = extract_chunks(&trees[0], "VP")
      .iter()
      .map(Chunk::text)
      .collect::<Vec<_>>();
    assert_eq!(vps, vec!["sat down"]);
    // leaves are never chunks, even when their category matches
    assert!(extract_chunks(&trees[0], "N").is_empty());
  }
}
