use std::fmt;

/// A grammar symbol. Nonterminals expand through rules, terminals name a
/// part-of-speech category with a closed vocabulary. The two namespaces are
/// disjoint, so `Nonterminal("N")` and `Terminal("N")` are different symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
  Nonterminal(String),
  Terminal(String),
}

impl Symbol {
  pub fn nonterminal(name: impl Into<String>) -> Self {
    Self::Nonterminal(name.into())
  }

  pub fn terminal(name: impl Into<String>) -> Self {
    Self::Terminal(name.into())
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Nonterminal(s) => s,
      Self::Terminal(s) => s,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Terminal(_))
  }

  pub fn is_nonterminal(&self) -> bool {
    matches!(self, Self::Nonterminal(_))
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// One alternative of a nonterminal: `lhs -> rhs[0] rhs[1] ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub lhs: String,
  pub rhs: Vec<Symbol>,
}

impl Rule {
  pub fn new(lhs: impl Into<String>, rhs: Vec<Symbol>) -> Self {
    Self {
      lhs: lhs.into(),
      rhs,
    }
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// A rule with a single nonterminal on its right-hand side, which derives
  /// the same span as its left-hand side.
  pub fn is_unit(&self) -> bool {
    self.len() == 1 && self.rhs[0].is_nonterminal()
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for s in self.rhs.iter() {
      write!(f, " {}", s)?;
    }
    Ok(())
  }
}

#[test]
fn test_rule_display() {
  let rule = Rule::new(
    "NP",
    vec![Symbol::terminal("Det"), Symbol::nonterminal("AP"), Symbol::nonterminal("NP")],
  );
  assert_eq!(rule.to_string(), "NP -> Det AP NP");
  assert_eq!(rule.len(), 3);
  assert!(!rule.is_unit());
  assert!(Rule::new("NP", vec![Symbol::nonterminal("AP")]).is_unit());
  assert!(!Rule::new("NP", vec![Symbol::terminal("N")]).is_unit());
}
