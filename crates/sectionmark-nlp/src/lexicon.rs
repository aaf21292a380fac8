//! Corpus-wide word frequencies and weights.

use std::collections::HashMap;

use sectionmark_syntax::Symbol;

/// Lowest weight a word can have, so no word ever counts for nothing.
pub const WEIGHT_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct WordEmbedding {
    pub word: Symbol,
    pub frequency: u32,
    pub weight: f64,
}

/// Word → frequency and weight, shared by every document tokenized in one
/// analysis session.
///
/// Weights are only refreshed by [`recalculate_weights`](Self::recalculate_weights):
/// `1 - frequency / max_frequency`, but never below [`WEIGHT_FLOOR`].
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<Symbol, WordEmbedding>,
    max_frequency: u32,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word`, returning its shared symbol.
    pub fn add(&mut self, word: &str) -> Symbol {
        if let Some(entry) = self.entries.get_mut(word) {
            entry.frequency += 1;
            self.max_frequency = self.max_frequency.max(entry.frequency);
            return Symbol::clone(&entry.word);
        }

        let symbol = Symbol::from(word);
        self.entries.insert(
            Symbol::clone(&symbol),
            WordEmbedding {
                word: Symbol::clone(&symbol),
                frequency: 1,
                weight: 1.0,
            },
        );
        self.max_frequency = self.max_frequency.max(1);
        symbol
    }

    pub fn get(&self, word: &str) -> Option<&WordEmbedding> {
        self.entries.get(word)
    }

    pub fn frequency(&self, word: &str) -> u32 {
        self.get(word).map_or(0, |e| e.frequency)
    }

    /// Last calculated weight, 0 for unknown words.
    pub fn weight(&self, word: &str) -> f64 {
        self.get(word).map_or(0.0, |e| e.weight)
    }

    pub fn max_frequency(&self) -> u32 {
        self.max_frequency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.max_frequency = 0;
    }

    pub fn recalculate_weights(&mut self) {
        let max = f64::from(self.max_frequency.max(1));
        for entry in self.entries.values_mut() {
            entry.weight = (1.0 - f64::from(entry.frequency) / max).max(WEIGHT_FLOOR);
        }
        log::debug!(
            "Recalculated weights of {} words, max frequency {}",
            self.entries.len(),
            self.max_frequency
        );
    }

    /// The `n` most frequent words, ties broken alphabetically.
    pub fn leaderboard(&self, n: usize) -> Vec<&WordEmbedding> {
        let mut entries: Vec<&WordEmbedding> = self.entries.values().collect();
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.word.cmp(&b.word)));
        entries.truncate(n);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn lexicon_with(words: &[(&str, u32)]) -> Lexicon {
        let mut lexicon = Lexicon::new();
        for &(word, count) in words {
            for _ in 0..count {
                lexicon.add(word);
            }
        }
        lexicon
    }

    #[test]
    fn weights_follow_relative_frequency() {
        let mut lexicon = lexicon_with(&[("a5", 5), ("a3", 3), ("a2", 2)]);
        lexicon.recalculate_weights();

        assert_eq!(lexicon.max_frequency(), 5);
        assert_close(lexicon.weight("a5"), 0.01);
        assert_close(lexicon.weight("a3"), 0.4);
        assert_close(lexicon.weight("a2"), 0.6);
    }

    #[test]
    fn adding_returns_the_shared_symbol() {
        let mut lexicon = Lexicon::new();
        let first = lexicon.add("word");
        let second = lexicon.add("word");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(lexicon.frequency("word"), 2);
        assert_eq!(lexicon.len(), 1);
    }

    #[test]
    fn unknown_words_weigh_nothing() {
        let lexicon = Lexicon::new();
        assert_eq!(lexicon.weight("missing"), 0.0);
        assert_eq!(lexicon.frequency("missing"), 0);
    }

    #[test]
    fn leaderboard_orders_by_frequency() {
        let lexicon = lexicon_with(&[("beta", 2), ("alpha", 2), ("gamma", 5), ("delta", 1)]);

        let board = lexicon.leaderboard(3);
        let top: Vec<(&str, u32)> = board
            .iter()
            .map(|e| (&*e.word, e.frequency))
            .collect();

        assert_eq!(top, vec![("gamma", 5), ("alpha", 2), ("beta", 2)]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut lexicon = lexicon_with(&[("x1", 3)]);
        lexicon.clear();
        assert!(lexicon.is_empty());
        assert_eq!(lexicon.max_frequency(), 0);
    }
}
