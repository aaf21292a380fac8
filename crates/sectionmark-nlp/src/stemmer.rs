/// Reduces a word to its stem. Real stemming algorithms live outside this
/// crate; callers plug theirs in through [`Tokenizer::with_stemmer`].
///
/// [`Tokenizer::with_stemmer`]: crate::tokenizer::Tokenizer::with_stemmer
pub trait Stemmer {
    fn stem(&self, word: &str) -> String;
}

/// Leaves every word as it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }
}
