//! Text normalization shared by every similarity strategy.

use std::collections::{BTreeSet, HashMap};

/// Lowercase, turn every non-alphanumeric char into a space, collapse whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words of already-normalized text.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}

pub fn token_set(normalized: &str) -> BTreeSet<&str> {
    tokens(normalized).collect()
}

/// Term frequencies of already-normalized text.
pub fn term_counts(normalized: &str) -> HashMap<&str, u64> {
    let mut counts = HashMap::new();
    for t in tokens(normalized) {
        *counts.entry(t).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Login  button: UNRESPONSIVE!! "), "login button unresponsive");
        assert_eq!(normalize("iOS/Safari (v17.2)"), "ios safari v17 2");
    }

    #[test]
    fn normalize_empty_and_symbols() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("--- !!! ..."), "");
    }

    #[test]
    fn counts_repeated_terms() {
        let n = normalize("tap tap login");
        let counts = term_counts(&n);
        assert_eq!(counts["tap"], 2);
        assert_eq!(counts["login"], 1);
    }
}
