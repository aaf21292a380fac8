//! # sectionmark-nlp
//!
//! Lightweight word statistics over notes parsed by `sectionmark-syntax`.
//!
//! A [`Tokenizer`] pulls bytes from a [`CharProvider`], counts every word in a
//! per-document [`WordFrequencyList`] and in a corpus-wide [`Lexicon`], and
//! collects `[label](url)` links on the way.
//!
//! ```
//! use sectionmark_nlp::{Lexicon, StringCharProvider, Tokenizer, WordFrequencyList};
//!
//! let mut lexicon = Lexicon::new();
//! let mut words = WordFrequencyList::new();
//! let links = Tokenizer::default().tokenize(
//!     &mut StringCharProvider::new("Parsers parse. See [notes](notes.md)."),
//!     &mut lexicon,
//!     &mut words,
//! );
//!
//! assert_eq!(words.frequency("parsers"), 1);
//! assert_eq!(links[0].url, "notes.md");
//! ```

pub mod blacklist;
pub mod char_provider;
pub mod lexicon;
pub mod stemmer;
pub mod tokenizer;
pub mod word_frequency_list;

pub use blacklist::Blacklist;
pub use char_provider::{CharProvider, NoteCharProvider, StringCharProvider};
pub use lexicon::{Lexicon, WEIGHT_FLOOR, WordEmbedding};
pub use stemmer::{IdentityStemmer, Stemmer};
pub use tokenizer::{Tokenizer, TokenizerOptions};
pub use word_frequency_list::WordFrequencyList;
