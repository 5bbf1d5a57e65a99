use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Err, GrammarError};
use crate::grammars;
use crate::rules::{Rule, Symbol};
use crate::syntree::SynTree;

/// An immutable context-free grammar over part-of-speech categories.
///
/// Nonterminals expand through [`Rule`]s; terminal categories are bound to a
/// closed list of literal words (the lexicon). Rules and words are kept in
/// declaration order, which is the order parses come out in.
#[derive(Debug, Clone)]
pub struct Grammar {
  start: String,
  rules: Vec<Rule>,
  alternatives: HashMap<String, Vec<usize>>,
  lexicon: Vec<(String, Vec<String>)>,
  categories_by_word: HashMap<String, Vec<String>>,
}

impl Grammar {
  /// Builds a grammar from tagged rules and `(category, words)` lexicon
  /// entries. Entries for the same category are merged.
  pub fn new(
    start: impl Into<String>,
    rules: Vec<Rule>,
    lexicon: Vec<(String, Vec<String>)>,
  ) -> Result<Self, GrammarError> {
    let start = start.into();
    if rules.is_empty() {
      return Err(GrammarError::Empty);
    }

    let lexicon = Self::merge_lexicon(lexicon);
    if let Some((category, _)) = lexicon.iter().find(|(_, words)| words.is_empty()) {
      return Err(GrammarError::EmptyCategory(category.clone()));
    }

    let mut alternatives: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, rule) in rules.iter().enumerate() {
      if rule.is_empty() {
        return Err(GrammarError::EmptyRhs(rule.lhs.clone()));
      }
      alternatives.entry(rule.lhs.clone()).or_default().push(idx);
    }

    if let Some((category, _)) = lexicon.iter().find(|(c, _)| alternatives.contains_key(c)) {
      return Err(GrammarError::Conflict(category.clone()));
    }

    if !alternatives.contains_key(&start) {
      return Err(GrammarError::MissingStart(start));
    }

    for rule in rules.iter() {
      for symbol in rule.rhs.iter() {
        let declared = match symbol {
          Symbol::Nonterminal(name) => alternatives.contains_key(name),
          Symbol::Terminal(name) => lexicon.iter().any(|(c, _)| c == name),
        };
        if !declared {
          return Err(GrammarError::Undeclared {
            rule: rule.to_string(),
            symbol: symbol.to_string(),
          });
        }
      }
    }

    let mut categories_by_word: HashMap<String, Vec<String>> = HashMap::new();
    for (category, words) in lexicon.iter() {
      for word in words.iter() {
        categories_by_word
          .entry(word.clone())
          .or_default()
          .push(category.clone());
      }
    }

    debug!(
      start = %start,
      rules = rules.len(),
      categories = lexicon.len(),
      words = categories_by_word.len(),
      "built grammar"
    );

    Ok(Self {
      start,
      rules,
      alternatives,
      lexicon,
      categories_by_word,
    })
  }

  fn merge_lexicon(lexicon: Vec<(String, Vec<String>)>) -> Vec<(String, Vec<String>)> {
    let mut merged: Vec<(String, Vec<String>)> = Vec::new();
    for (category, words) in lexicon {
      let idx = match merged.iter().position(|(c, _)| *c == category) {
        Some(idx) => idx,
        None => {
          merged.push((category, Vec::new()));
          merged.len() - 1
        }
      };
      for word in words {
        if !merged[idx].1.contains(&word) {
          merged[idx].1.push(word);
        }
      }
    }
    merged
  }

  /// The grammar of simple English sentences that ships with the crate.
  pub fn sentences() -> Self {
    grammars::SENTENCES
      .parse()
      .expect("built-in sentence grammar is well-formed")
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Err> {
    let src = fs::read_to_string(path)?;
    Ok(src.parse()?)
  }

  pub fn start(&self) -> &str {
    &self.start
  }

  pub fn rules(&self) -> &[Rule] {
    &self.rules
  }

  /// The rule at `idx` in declaration order, as recorded in chart derivations
  pub fn rule(&self, idx: usize) -> &Rule {
    &self.rules[idx]
  }

  /// All alternatives of `nonterminal`, in declaration order. Empty for
  /// names that aren't nonterminals.
  pub fn productions_for<'g>(&'g self, nonterminal: &str) -> impl Iterator<Item = &'g Rule> + 'g {
    self
      .alternatives
      .get(nonterminal)
      .into_iter()
      .flatten()
      .map(move |&idx| &self.rules[idx])
  }

  /// Terminal categories that list `word`, in declaration order.
  pub fn categories_of(&self, word: &str) -> &[String] {
    self
      .categories_by_word
      .get(word)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn lexicon(&self) -> &[(String, Vec<String>)] {
    &self.lexicon
  }

  pub fn is_nonterminal(&self, name: &str) -> bool {
    self.alternatives.contains_key(name)
  }

  pub fn is_terminal(&self, name: &str) -> bool {
    self.lexicon.iter().any(|(c, _)| c == name)
  }

  /// Whether every node of `tree` is licensed by this grammar: leaves carry a
  /// word of their category, and branches have children matching one of
  /// their label's productions.
  pub fn licenses(&self, tree: &SynTree<String, String>) -> bool {
    match tree {
      SynTree::Leaf(cons, word) => self
        .categories_of(&word.value)
        .iter()
        .any(|c| *c == cons.value),
      SynTree::Branch(cons, children) => {
        let matches_rule = self.productions_for(&cons.value).any(|rule| {
          rule.len() == children.len()
            && rule.rhs.iter().zip(children.iter()).all(|(symbol, child)| {
              symbol.name() == child.label() && symbol.is_terminal() == child.is_leaf()
            })
        });
        matches_rule && children.iter().all(|c| self.licenses(c))
      }
    }
  }

  /// Nonterminal names, start first, then by first declaration.
  fn nonterminals(&self) -> Vec<&str> {
    let mut names = vec![self.start.as_str()];
    for rule in self.rules.iter() {
      if !names.contains(&rule.lhs.as_str()) {
        names.push(&rule.lhs);
      }
    }
    names
  }
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for name in self.nonterminals() {
      write!(f, "{} ->", name)?;
      for (idx, rule) in self.productions_for(name).enumerate() {
        if idx > 0 {
          write!(f, " |")?;
        }
        for symbol in rule.rhs.iter() {
          write!(f, " {}", symbol)?;
        }
      }
      writeln!(f)?;
    }

    for (category, words) in self.lexicon.iter() {
      write!(f, "{} ->", category)?;
      for (idx, word) in words.iter().enumerate() {
        if idx > 0 {
          write!(f, " |")?;
        }
        write!(f, " \"{}\"", word)?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntree::{Constituent, Word};

  fn lexicon(entries: &[(&str, &str)]) -> Vec<(String, Vec<String>)> {
    entries
      .iter()
      .map(|(c, ws)| (c.to_string(), ws.split_whitespace().map(String::from).collect()))
      .collect()
  }

  fn toy() -> Grammar {
    Grammar::new(
      "S",
      vec![
        Rule::new("S", vec![Symbol::nonterminal("NP"), Symbol::terminal("V")]),
        Rule::new("NP", vec![Symbol::terminal("N")]),
        Rule::new("NP", vec![Symbol::terminal("Det"), Symbol::terminal("N")]),
      ],
      lexicon(&[("N", "holmes pipe"), ("Det", "a"), ("V", "sat")]),
    )
    .unwrap()
  }

  #[test]
  fn test_productions_keep_declaration_order() {
    let g = toy();
    let alts = g
      .productions_for("NP")
      .map(|r| r.to_string())
      .collect::<Vec<_>>();
    assert_eq!(alts, vec!["NP -> N", "NP -> Det N"]);
    assert_eq!(g.productions_for("N").count(), 0);
    assert_eq!(g.productions_for("nope").count(), 0);
    assert_eq!(g.start(), "S");
    assert!(g.is_nonterminal("NP"));
    assert!(g.is_terminal("Det"));
    assert!(!g.is_terminal("NP"));
  }

  #[test]
  fn test_categories_of() {
    let g = Grammar::new(
      "S",
      vec![Rule::new("S", vec![Symbol::terminal("N")])],
      lexicon(&[("N", "walk walk"), ("V", "walk"), ("N", "day")]),
    )
    .unwrap();
    assert_eq!(g.categories_of("walk"), &["N".to_string(), "V".to_string()]);
    assert_eq!(g.categories_of("day"), &["N".to_string()]);
    assert!(g.categories_of("was").is_empty());
    assert_eq!(g.lexicon().len(), 2);
    assert_eq!(g.lexicon()[0].1, vec!["walk", "day"]);
  }

  #[test]
  fn test_malformed_grammars() {
    let s = |rhs: Vec<Symbol>| vec![Rule::new("S", rhs)];
    let words = || lexicon(&[("N", "holmes")]);

    assert_eq!(
      Grammar::new("S", Vec::new(), words()).unwrap_err(),
      GrammarError::Empty
    );
    assert_eq!(
      Grammar::new("S", s(Vec::new()), words()).unwrap_err(),
      GrammarError::EmptyRhs("S".to_string())
    );
    assert_eq!(
      Grammar::new("X", s(vec![Symbol::terminal("N")]), words()).unwrap_err(),
      GrammarError::MissingStart("X".to_string())
    );
    assert_eq!(
      Grammar::new("S", s(vec![Symbol::terminal("V")]), words()).unwrap_err(),
      GrammarError::Undeclared {
        rule: "S -> V".to_string(),
        symbol: "V".to_string()
      }
    );
    // N is a category, not a nonterminal
    assert!(matches!(
      Grammar::new("S", s(vec![Symbol::nonterminal("N")]), words()).unwrap_err(),
      GrammarError::Undeclared { .. }
    ));
    assert_eq!(
      Grammar::new("S", s(vec![Symbol::terminal("N")]), lexicon(&[("N", "")])).unwrap_err(),
      GrammarError::EmptyCategory("N".to_string())
    );
    assert_eq!(
      Grammar::new(
        "S",
        s(vec![Symbol::terminal("N")]),
        lexicon(&[("N", "holmes"), ("S", "s")])
      )
      .unwrap_err(),
      GrammarError::Conflict("S".to_string())
    );
  }

  #[test]
  fn test_unit_cycles_accepted() {
    let g = Grammar::new(
      "S",
      vec![
        Rule::new("S", vec![Symbol::nonterminal("A")]),
        Rule::new("A", vec![Symbol::nonterminal("B")]),
        Rule::new("B", vec![Symbol::nonterminal("A")]),
        Rule::new("B", vec![Symbol::terminal("N")]),
        Rule::new("S", vec![Symbol::nonterminal("S")]),
      ],
      lexicon(&[("N", "holmes")]),
    )
    .unwrap();
    assert_eq!(g.productions_for("S").count(), 2);
    assert_eq!(g.rule(4).to_string(), "S -> S");
  }

  #[test]
  fn test_licenses() {
    let g = toy();
    let leaf = |label: &str, word: &str, at: usize| {
      SynTree::Leaf(
        Constituent {
          value: label.to_string(),
          span: (at, at + 1),
        },
        Word {
          value: word.to_string(),
          span: (at, at + 1),
        },
      )
    };
    let branch = |label: &str, span: (usize, usize), children| {
      SynTree::Branch(
        Constituent {
          value: label.to_string(),
          span,
        },
        children,
      )
    };

    let good = branch(
      "S",
      (0, 2),
      vec![branch("NP", (0, 1), vec![leaf("N", "holmes", 0)]), leaf("V", "sat", 1)],
    );
    assert!(g.licenses(&good));

    let wrong_word = branch(
      "S",
      (0, 2),
      vec![branch("NP", (0, 1), vec![leaf("N", "sat", 0)]), leaf("V", "sat", 1)],
    );
    assert!(!g.licenses(&wrong_word));

    let wrong_shape = branch("S", (0, 1), vec![leaf("V", "sat", 0)]);
    assert!(!g.licenses(&wrong_shape));
  }

  #[test]
  fn test_builtin_grammar() {
    let g = Grammar::sentences();
    assert_eq!(g.start(), "S");
    for nt in ["S", "AP", "PP", "NP", "VP"] {
      assert!(g.is_nonterminal(nt), "{} should be a nonterminal", nt);
    }
    for t in ["Adj", "Adv", "Conj", "Det", "N", "P", "V"] {
      assert!(g.is_terminal(t), "{} should be a terminal category", t);
    }
    assert_eq!(g.productions_for("NP").count(), 5);
    assert_eq!(g.productions_for("VP").count(), 6);
    assert_eq!(g.categories_of("holmes"), &["N".to_string()]);
  }

  #[test]
  fn test_display_round_trips() {
    let g = Grammar::sentences();
    let reparsed: Grammar = g.to_string().parse().unwrap();
    assert_eq!(reparsed.start(), g.start());
    assert_eq!(reparsed.rules(), g.rules());
    assert_eq!(reparsed.lexicon(), g.lexicon());
  }
}
