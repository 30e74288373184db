//! Concept resolution: from raw input text to recognised concept ids.

use std::collections::HashSet;

use crate::format::nol::Vocabulary;

/// Lower-case `input` and split it into maximal runs of `[a-z0-9']`.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let lowered = input.to_lowercase();
    lowered
        .split(|c: char| !is_token_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '\''
}

/// Concept ids of every known token, deduplicated in first-occurrence order.
#[must_use]
pub fn map_to_concepts(tokens: &[String], vocab: &Vocabulary) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .filter_map(|token| vocab.lookup(token))
        .filter(|entry| seen.insert(entry.concept_id.as_str()))
        .map(|entry| entry.concept_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::nol::ConceptEntry;

    fn vocab() -> Vocabulary {
        let mut v = Vocabulary::new();
        for (word, id) in [("hello", "c_hello"), ("hi", "c_hello"), ("dog", "c_dog")] {
            v.insert_word(
                word,
                ConceptEntry {
                    concept_id: id.into(),
                    synonyms: vec![],
                    category: String::new(),
                    sentiment: 0.0,
                },
            );
        }
        v
    }

    #[test]
    fn tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("Hello, WORLD! It's 9-ish."),
            vec!["hello", "world", "it's", "9", "ish"]
        );
        assert!(tokenize("  ?! ").is_empty());
    }

    #[test]
    fn non_ascii_letters_separate_tokens() {
        assert_eq!(tokenize("café au lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn concepts_are_deduplicated_in_order() {
        let tokens = tokenize("dog hi hello dog cat");
        assert_eq!(map_to_concepts(&tokens, &vocab()), vec!["c_dog", "c_hello"]);
    }
}
