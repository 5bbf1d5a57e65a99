use regex::Regex;

/// Converts a sentence to the word tokens the parser expects: lower-cased,
/// split into words and punctuation, keeping only tokens with at least one
/// alphabetic character. Possessive and contracted endings become tokens of
/// their own, so `holmes's` is `holmes` `'s` and `didn't` is `did` `n't`.
pub fn preprocess(sentence: &str) -> Vec<String> {
  // words may carry inner apostrophes or hyphens; anything else is a token on its own
  regex_static!(TOKEN, r"\w+(?:['’\-]\w+)*|[^\w\s]+");

  let sentence = sentence.to_lowercase();
  TOKEN
    .find_iter(&sentence)
    .flat_map(|m| split_clitic(m.as_str()))
    .filter(|token| token.chars().any(char::is_alphabetic))
    .map(String::from)
    .collect()
}

/// Splits a trailing `'s 'm 'd 'll 're 've` or `n't` off a word
fn split_clitic(token: &str) -> Vec<&str> {
  regex_static!(CLITIC, r"^(.+?)(n['’]t|['’](?:s|m|d|ll|re|ve))$");

  match CLITIC.captures(token) {
    Some(caps) => caps.iter().skip(1).flatten().map(|m| m.as_str()).collect(),
    None => vec![token],
  }
}
