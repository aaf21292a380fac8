//! Pull-based byte sources for the [`Tokenizer`](crate::tokenizer::Tokenizer).
//!
//! The tokenizer works on bytes: every non-ASCII byte is a word boundary, so
//! there is no need to decode UTF-8 first.

use sectionmark_syntax::SectionNode;

/// A cursor over a sequence of bytes.
///
/// `next` advances and returns the new current byte, `get` repeats the
/// current byte, and `lookahead` peeks at the byte `next` would return.
pub trait CharProvider {
    fn has_next(&self) -> bool;
    fn get(&self) -> Option<u8>;
    fn lookahead(&self) -> Option<u8>;
    fn next(&mut self) -> Option<u8>;
}

/// Bytes of a single string.
pub struct StringCharProvider<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StringCharProvider<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }
}

impl CharProvider for StringCharProvider<'_> {
    fn has_next(&self) -> bool {
        self.pos < self.bytes.len()
    }

    fn get(&self) -> Option<u8> {
        self.pos.checked_sub(1).map(|i| self.bytes[i])
    }

    fn lookahead(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let b = self.lookahead()?;
        self.pos += 1;
        Some(b)
    }
}

/// A section seen as one text: name, delimiter, then the body lines joined
/// with `\n`. Nothing is copied; the provider walks the pieces in place.
pub struct NoteCharProvider<'a> {
    segments: Vec<&'a [u8]>,
    segment: usize,
    pos: usize,
    current: Option<u8>,
}

impl<'a> NoteCharProvider<'a> {
    pub fn new(section: &'a SectionNode, delimiter: &'a str) -> Self {
        let mut segments = vec![section.name().as_bytes(), delimiter.as_bytes()];
        for (i, line) in section.body.iter().enumerate() {
            if i > 0 {
                segments.push(b"\n");
            }
            segments.push(line.as_bytes());
        }
        Self {
            segments,
            segment: 0,
            pos: 0,
            current: None,
        }
    }

    /// Position of the next byte, skipping exhausted segments.
    fn next_position(&self) -> Option<(usize, usize)> {
        let (mut segment, mut pos) = (self.segment, self.pos);
        while let Some(bytes) = self.segments.get(segment) {
            if pos < bytes.len() {
                return Some((segment, pos));
            }
            segment += 1;
            pos = 0;
        }
        None
    }
}

impl CharProvider for NoteCharProvider<'_> {
    fn has_next(&self) -> bool {
        self.next_position().is_some()
    }

    fn get(&self) -> Option<u8> {
        self.current
    }

    fn lookahead(&self) -> Option<u8> {
        self.next_position()
            .map(|(segment, pos)| self.segments[segment][pos])
    }

    fn next(&mut self) -> Option<u8> {
        let (segment, pos) = self.next_position()?;
        self.segment = segment;
        self.pos = pos + 1;
        self.current = Some(self.segments[segment][pos]);
        self.current
    }
}
