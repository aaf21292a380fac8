use std::collections::HashSet;

/// Common English words that carry no meaning for similarity scoring.
const ENGLISH: &[&str] = &[
    "the", "of", "and", "to", "a", "in", "for", "is", "on", "that", "by", "this", "with", "i",
    "you", "it", "not", "or", "be", "are", "from", "at", "as", "your", "all", "have", "new",
    "more", "an", "was", "we", "will", "home", "can", "us", "about", "if", "page", "my", "has",
    "search", "free", "but", "our", "one", "other", "do", "no", "information", "time", "they",
    "site", "he", "up", "may", "what", "which", "their", "news", "out", "use", "any", "there",
    "see", "only", "so", "his", "when", "contact", "here", "business", "who", "web", "also",
    "now", "help", "get", "pm", "view", "online", "first", "am", "been", "would", "how",
    "were", "me", "services", "some", "these", "click", "its", "like", "service", "than",
    "find", "had", "into", "just", "over", "should", "them", "then", "such", "she", "her",
    "him", "those", "where", "while", "why", "very", "most", "must", "each", "both", "did",
    "does", "being", "because", "between", "after", "before", "could", "own", "same", "too",
];

/// Words the tokenizer skips. Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    words: HashSet<String>,
}

impl Blacklist {
    pub fn english() -> Self {
        Self::from_words(ENGLISH.iter().copied())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        if word.bytes().any(|b| b.is_ascii_uppercase()) {
            self.words.contains(&word.to_ascii_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
