use std::collections::{BTreeSet, HashMap};

/// Turns raw text into index terms. Documents and queries must go through the same analyzer.
pub trait Analyzer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits on Unicode whitespace and lowercases every token.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceAnalyzer;

impl Analyzer for WhitespaceAnalyzer {
    fn tokenize(&self, text: &str) -> Vec<String> { tokenize(text) }
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Word -> occurrence count within a single text.
pub fn count_words<A: Analyzer + ?Sized>(analyzer: &A, text: &str) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in analyzer.tokenize(text) {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

/// Query decomposition: duplicates collapse, order is irrelevant.
pub fn unique_words<A: Analyzer + ?Sized>(analyzer: &A, text: &str) -> BTreeSet<String> {
    analyzer.tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_whitespace() {
        let t = tokenize("  Big\tBen\nis  in LONDON ");
        assert_eq!(t, vec!["big", "ben", "is", "in", "london"]);
    }

    #[test]
    fn keeps_punctuation_attached() {
        // no stemming or punctuation stripping
        assert_eq!(tokenize("London, london"), vec!["london,", "london"]);
    }

    #[test]
    fn counts_per_text() {
        let counts = count_words(&WhitespaceAnalyzer, "milk Milk water MILK");
        assert_eq!(counts["milk"], 3);
        assert_eq!(counts["water"], 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn unique_words_collapse_duplicates() {
        let words = unique_words(&WhitespaceAnalyzer, "london Ben LONDON");
        assert_eq!(words.into_iter().collect::<Vec<_>>(), vec!["ben", "london"]);
        assert!(unique_words(&WhitespaceAnalyzer, " \t ").is_empty());
    }
}
