//! Per-document word counts.
//!
//! Keys are the [`Symbol`]s handed out by the [`Lexicon`], so a word is stored
//! once no matter how many documents contain it.

use std::collections::HashMap;

use sectionmark_syntax::Symbol;

use crate::lexicon::Lexicon;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyList {
    words: HashMap<Symbol, u32>,
}

impl WordFrequencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: Symbol) {
        self.add_count(word, 1);
    }

    fn add_count(&mut self, word: Symbol, count: u32) {
        *self.words.entry(word).or_insert(0) += count;
    }

    pub fn frequency(&self, word: &str) -> u32 {
        self.words.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, u32)> {
        self.words.iter().map(|(word, &count)| (word, count))
    }

    /// Words by descending local frequency, ties alphabetical.
    pub fn sorted(&self) -> Vec<(&Symbol, u32)> {
        let mut words: Vec<_> = self.iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words
    }

    /// Sum of the lexicon weights of the distinct words in this list.
    pub fn weight(&self, lexicon: &Lexicon) -> f64 {
        self.words.keys().map(|word| lexicon.weight(word)).sum()
    }

    /// Every word of either list, with the larger frequency.
    pub fn union(&self, other: &WordFrequencyList) -> WordFrequencyList {
        let mut result = self.clone();
        for (word, &count) in &other.words {
            let slot = result.words.entry(Symbol::clone(word)).or_insert(0);
            *slot = (*slot).max(count);
        }
        result
    }

    /// Words present in both lists, with the smaller frequency.
    pub fn intersection(&self, other: &WordFrequencyList) -> WordFrequencyList {
        let mut result = WordFrequencyList::new();
        for (word, &count) in &self.words {
            if let Some(&other_count) = other.words.get(word) {
                result.add_count(Symbol::clone(word), count.min(other_count));
            }
        }
        result
    }

    /// Weight of the shared words relative to the weight of all words, in `0..=1`.
    pub fn similarity(&self, other: &WordFrequencyList, lexicon: &Lexicon) -> f64 {
        let union = self.union(other).weight(lexicon);
        if union <= 0.0 {
            return 0.0;
        }
        self.intersection(other).weight(lexicon) / union
    }
}
