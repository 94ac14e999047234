// Word frequency for the word-cloud widget.
//
// Normalization: lower-case, drop every character that is neither a word
// character nor whitespace, split on whitespace runs, count. Punctuation is
// deleted rather than treated as a separator, so "don't" counts as "dont".

use std::collections::HashMap;

use serde::Serialize;
use stop_words::{get, LANGUAGE};

use super::is_word_char;

/// Normalized word -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WordFrequencyMap {
    counts: HashMap<String, usize>,
}

impl WordFrequencyMap {
    /// Occurrences of `word` (already normalized), 0 if absent.
    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of counted tokens.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// The `n` most frequent words, ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> =
            self.counts.iter().map(|(w, c)| (w.clone(), *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Like `top`, but skipping English stop words ("the", "and", ...).
    pub fn top_content_words(&self, n: usize) -> Vec<(String, usize)> {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        let mut ranked = self.top(self.counts.len());
        ranked.retain(|(w, _)| !stop_words.iter().any(|s| s == w));
        ranked.truncate(n);
        ranked
    }

    /// Each word's count relative to the most frequent word, in (0, 1].
    /// The word cloud scales font size linearly with this weight.
    pub fn cloud_weights(&self) -> HashMap<String, f64> {
        let max = self.counts.values().copied().max().unwrap_or(0);
        if max == 0 {
            return HashMap::new();
        }
        self.counts
            .iter()
            .map(|(w, c)| (w.clone(), *c as f64 / max as f64))
            .collect()
    }
}

/// Count normalized word occurrences in `text`.
pub fn frequency(text: &str) -> WordFrequencyMap {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    let mut counts = HashMap::new();
    for word in normalized.split_whitespace() {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    WordFrequencyMap { counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apostrophes_are_removed_not_split() {
        let freq = frequency("Don't stop");
        assert_eq!(freq.get("dont"), 1);
        assert_eq!(freq.get("don"), 0);
    }

    #[test]
    fn cloud_weights_relative_to_max() {
        let weights = frequency("a a a a b").cloud_weights();
        assert!((weights["a"] - 1.0).abs() < f64::EPSILON);
        assert!((weights["b"] - 0.25).abs() < f64::EPSILON);
    }
}
