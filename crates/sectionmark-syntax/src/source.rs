//! # Line Source
//!
//! Turns a file or an in-memory string into the ordered line buffer the
//! [`SectionLexer`] works on. Line terminators are not part of the stored
//! lines; the document remembers which terminator it used and whether the
//! last line had one, so the serializer can put them back.
//!
//! [`SectionLexer`]: crate::lexer::SectionLexer

use std::fs;
use std::path::Path;

use crate::error::SourceError;

/// Line terminator used when writing a document back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// An ordered sequence of text lines plus the byte size of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSource {
    lines: Vec<String>,
    line_ending: LineEnding,
    final_newline: bool,
    byte_size: usize,
}

impl LineSource {
    /// Split `text` into lines.
    ///
    /// The line ending is taken from the first line. In CRLF documents one
    /// trailing `\r` is removed from every terminated line; in LF documents a
    /// stray `\r` stays part of the line text, as does a `\r` ending an
    /// unterminated last line.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let line_ending = match text.split('\n').next() {
            Some(first) if first.ends_with('\r') && text.len() > first.len() => LineEnding::CrLf,
            _ => LineEnding::Lf,
        };

        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let final_newline = text.ends_with('\n');
        if final_newline {
            lines.pop();
        }
        if line_ending == LineEnding::CrLf {
            let terminated = if final_newline { lines.len() } else { lines.len() - 1 };
            for line in &mut lines[..terminated] {
                if line.ends_with('\r') {
                    line.pop();
                }
            }
        }

        Self {
            lines,
            line_ending,
            final_newline,
            byte_size: text.len(),
        }
    }

    /// Read and split a file.
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD; the rest of the file is
    /// kept.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "{} is not valid UTF-8 at byte {}, replacing invalid bytes",
                    path.display(),
                    e.utf8_error().valid_up_to()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Self::from_text(&text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Size of the original input in bytes, terminators included.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Whether the last line was terminated.
    pub fn final_newline(&self) -> bool {
        self.final_newline
    }

    /// Give up the line buffer, keeping the document framing.
    pub(crate) fn into_parts(self) -> (Vec<String>, SourceFraming) {
        let framing = SourceFraming {
            line_ending: self.line_ending,
            final_newline: self.final_newline,
            byte_size: self.byte_size,
        };
        (self.lines, framing)
    }
}

/// What is left of a [`LineSource`] once its lines have moved to the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceFraming {
    pub line_ending: LineEnding,
    pub final_newline: bool,
    pub byte_size: usize,
}
