//! Grammars that ship with the crate.

/// A small grammar of English sentences: nouns, determiners, adjective
/// phrases, prepositional phrases, verb phrases with adverbs, and
/// conjoined clauses. Its noun phrases are labeled `NP`.
pub const SENTENCES: &str = include_str!("../grammars/sentences.cfg");
