//! Word tokenizer with markdown link extraction.
//!
//! Words and links are recognized in the same pass over the
//! [`CharProvider`]: the word buffer and the link state machine each see every
//! byte and never influence each other.

use sectionmark_syntax::Link;

use crate::blacklist::Blacklist;
use crate::char_provider::CharProvider;
use crate::lexicon::Lexicon;
use crate::stemmer::Stemmer;
use crate::word_frequency_list::WordFrequencyList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    pub lowercase: bool,
    pub use_blacklist: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            use_blacklist: true,
        }
    }
}

/// Bytes that end a word. `-` is handled separately.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\n'
            | b'\r'
            | b'\t'
            | b','
            | b'!'
            | b'?'
            | b'.'
            | b':'
            | b';'
            | b'#'
            | b'='
            | b'`'
            | b'('
            | b')'
            | b'['
            | b']'
            | b'*'
            | b'_'
            | b'"'
            | b'\''
            | b'~'
            | b'@'
            | b'$'
            | b'%'
            | b'^'
            | b'&'
            | b'+'
            | b'{'
            | b'}'
            | b'|'
            | b'\\'
            | b'<'
            | b'>'
            | b'/'
    ) || !b.is_ascii()
}

/// Where the link scanner is within `[label](url)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    Outside,
    /// Inside the label; counts open brackets.
    Label(u32),
    /// Just after the closing `]`.
    AfterLabel,
    /// Inside the url; counts unbalanced `(`.
    Url(u32),
}

#[derive(Debug)]
struct LinkScanner {
    state: LinkState,
    label: Vec<u8>,
    url: Vec<u8>,
}

impl LinkScanner {
    fn new() -> Self {
        Self {
            state: LinkState::Outside,
            label: Vec::new(),
            url: Vec::new(),
        }
    }

    fn open_label(&mut self) {
        self.label.clear();
        self.url.clear();
        self.state = LinkState::Label(1);
    }

    fn feed(&mut self, b: u8) -> Option<Link> {
        match (self.state, b) {
            (_, b'\n') if self.state != LinkState::Outside => {
                self.state = LinkState::Outside;
            }
            (LinkState::Outside, b'[') => self.open_label(),
            (LinkState::Outside, _) => {}
            (LinkState::Label(depth), b'[') => {
                self.label.push(b);
                self.state = LinkState::Label(depth + 1);
            }
            (LinkState::Label(1), b']') => self.state = LinkState::AfterLabel,
            (LinkState::Label(depth), b']') => {
                self.label.push(b);
                self.state = LinkState::Label(depth - 1);
            }
            (LinkState::Label(_), _) => self.label.push(b),
            (LinkState::AfterLabel, b'(') => self.state = LinkState::Url(0),
            (LinkState::AfterLabel, b'[') => self.open_label(),
            (LinkState::AfterLabel, _) => self.state = LinkState::Outside,
            (LinkState::Url(0), b')') => {
                self.state = LinkState::Outside;
                if !self.url.is_empty() {
                    return Some(Link::new(
                        String::from_utf8_lossy(&self.label),
                        String::from_utf8_lossy(&self.url),
                    ));
                }
            }
            (LinkState::Url(depth), b')') => {
                self.url.push(b);
                self.state = LinkState::Url(depth - 1);
            }
            (LinkState::Url(depth), b'(') => {
                self.url.push(b);
                self.state = LinkState::Url(depth + 1);
            }
            (LinkState::Url(_), _) => self.url.push(b),
        }
        None
    }
}

/// Splits text into words, counting them in a [`Lexicon`] and a
/// [`WordFrequencyList`].
///
/// Only words longer than one byte are kept. Every non-ASCII byte is a word
/// boundary. A `-` stays inside a word when another non-`-` byte follows it,
/// so `self-awareness` is one word while `--` splits.
pub struct Tokenizer {
    options: TokenizerOptions,
    blacklist: Blacklist,
    stemmer: Option<Box<dyn Stemmer>>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerOptions::default())
    }
}

impl Tokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Self {
            options,
            blacklist: Blacklist::english(),
            stemmer: None,
        }
    }

    pub fn with_stemmer(mut self, stemmer: Box<dyn Stemmer>) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    pub fn options(&self) -> TokenizerOptions {
        self.options
    }

    /// Tokenize everything `provider` yields, then refresh the lexicon's
    /// weights. Returns the `[label](url)` links found along the way.
    pub fn tokenize(
        &self,
        provider: &mut dyn CharProvider,
        lexicon: &mut Lexicon,
        list: &mut WordFrequencyList,
    ) -> Vec<Link> {
        let mut word = String::new();
        let mut links = Vec::new();
        let mut scanner = LinkScanner::new();

        while provider.has_next() {
            let Some(b) = provider.next() else {
                break;
            };

            if let Some(link) = scanner.feed(b) {
                links.push(link);
            }

            let keep_hyphen = b == b'-'
                && !word.is_empty()
                && provider.lookahead().is_some_and(|next| next != b'-');
            if keep_hyphen || !(b == b'-' || is_delimiter(b)) {
                word.push(char::from(b));
            } else {
                self.flush(&mut word, lexicon, list);
            }
        }
        self.flush(&mut word, lexicon, list);

        lexicon.recalculate_weights();
        log::trace!(
            "Tokenized {} distinct words and {} links",
            list.len(),
            links.len()
        );
        links
    }

    fn flush(&self, word: &mut String, lexicon: &mut Lexicon, list: &mut WordFrequencyList) {
        if word.len() > 1 {
            if self.options.lowercase {
                word.make_ascii_lowercase();
            }
            if !(self.options.use_blacklist && self.blacklist.contains(word)) {
                let symbol = match &self.stemmer {
                    Some(stemmer) => lexicon.add(&stemmer.stem(word)),
                    None => lexicon.add(word),
                };
                list.add(symbol);
            }
        }
        word.clear();
    }
}
