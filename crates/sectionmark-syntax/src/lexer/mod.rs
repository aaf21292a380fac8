//! # Section Lexer
//!
//! Turns the line buffer of a [`LineSource`] into a flat, ordered sequence of
//! [`Lexeme`]s. The lexer only cares about section structure:
//!
//! - ATX headers (`# Title`, `## Note`) become a `SECTION` marker followed by
//!   alternating `WHITESPACES`/`TEXT` runs, with an optional embedded
//!   `<!-- Metadata: ... -->` comment lexed into property lexemes.
//! - Post-declared headers (a text line underlined with `===` or `---`) are
//!   found with one line of lookahead and become `SECTION=`/`SECTION-`
//!   followed by the name `LINE`.
//! - Everything else is an opaque `LINE` + `BR` pair, or a lone `BR` for an
//!   empty line.
//!
//! A line starting with three backticks toggles code-block mode; inside a code
//! block no header or metadata recognition happens.
//!
//! ```
//! use sectionmark_syntax::lexeme::LexemeKind;
//! use sectionmark_syntax::lexer::SectionLexer;
//!
//! let mut lexer = SectionLexer::from_text("# Hello\nworld\n");
//! let kinds: Vec<LexemeKind> = lexer.tokenize().unwrap().iter().map(|l| l.kind).collect();
//!
//! assert_eq!(kinds, vec![
//!     LexemeKind::BeginDoc,
//!     LexemeKind::Section,
//!     LexemeKind::Whitespaces,
//!     LexemeKind::Text,
//!     LexemeKind::Br,
//!     LexemeKind::Line,
//!     LexemeKind::Br,
//!     LexemeKind::EndDoc,
//! ]);
//! ```
//!
//! ## Ownership
//!
//! The lexer owns the lines. Lexemes only hold [`TextSpan`]s into them. When the
//! parser turns a whole-line lexeme into body content it calls
//! [`SectionLexer::claim_line`], which moves the line out and leaves an empty
//! slot behind, so no line is ever copied twice.
//!
//! [`LineSource`]: crate::source::LineSource

mod metadata;

use std::path::Path;

use crate::error::SyntaxError;
use crate::lexeme::{Lexeme, LexemeKind, TextSpan, WHOLE_LINE};
use crate::source::{LineEnding, LineSource, SourceFraming};

const CODE_FENCE: &str = "```";

pub struct SectionLexer {
    lines: Vec<Option<String>>,
    framing: SourceFraming,
    lexemes: Vec<Lexeme>,
    in_code_block: bool,
}

impl SectionLexer {
    pub fn new(source: LineSource) -> Self {
        let (lines, framing) = source.into_parts();
        Self {
            lines: lines.into_iter().map(Some).collect(),
            framing,
            lexemes: Vec::new(),
            in_code_block: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(LineSource::from_text(text))
    }

    /// Lexer over a file's lines.
    ///
    /// A missing or unreadable file gives a lexer with no lines, so
    /// [`tokenize`](Self::tokenize) returns an empty sequence. Use
    /// [`LineSource::from_path`] to get the error instead.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match LineSource::from_path(path) {
            Ok(source) => Self::new(source),
            Err(e) => {
                log::warn!("Cannot read {}: {e}", path.display());
                Self::new(LineSource::default())
            }
        }
    }

    /// Lex the whole buffer.
    ///
    /// Calling this again re-lexes from scratch, so repeated calls give the
    /// same result as long as no line has been claimed in between.
    pub fn tokenize(&mut self) -> Result<&[Lexeme], SyntaxError> {
        self.lexemes.clear();
        self.in_code_block = false;

        let line_count = narrow(self.lines.len(), "line count")?;
        self.lexemes.push(Lexeme::BEGIN_DOC);
        let mut offset = 0;
        while offset < line_count {
            offset += self.lex_line(offset)?;
        }

        if self.lexemes.len() == 1 {
            self.lexemes.clear();
        } else {
            self.lexemes.push(Lexeme::END_DOC);
        }

        log::debug!(
            "Lexed {line_count} lines ({} bytes) into {} lexemes",
            self.framing.byte_size,
            self.lexemes.len()
        );
        Ok(&self.lexemes)
    }

    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    /// Text of a lexeme span. Claimed lines read as empty.
    pub fn text(&self, span: TextSpan) -> &str {
        let Some(Some(line)) = self.lines.get(span.line as usize) else {
            return "";
        };
        if span.is_whole_line() {
            return line;
        }
        let start = span.start as usize;
        line.get(start..start + span.len as usize).unwrap_or("")
    }

    /// Move a whole line out of the buffer.
    ///
    /// Returns `None` if the line does not exist or was already claimed.
    pub fn claim_line(&mut self, line: u32) -> Option<String> {
        self.lines.get_mut(line as usize)?.take()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn byte_size(&self) -> usize {
        self.framing.byte_size
    }

    pub fn line_ending(&self) -> LineEnding {
        self.framing.line_ending
    }

    pub fn final_newline(&self) -> bool {
        self.framing.final_newline
    }

    /// One lexeme per line, prefixed with its index.
    pub fn dump(&self) -> String {
        self.lexemes
            .iter()
            .enumerate()
            .map(|(i, lexeme)| format!("#{i} {lexeme}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lex the line at `offset`, returning how many lines were consumed.
    fn lex_line(&mut self, offset: u32) -> Result<u32, SyntaxError> {
        let text = line_at(&self.lines, offset);
        narrow(text.len(), "line length")?;
        let out = &mut self.lexemes;

        if text.starts_with(CODE_FENCE) {
            self.in_code_block = !self.in_code_block;
            out.extend([Lexeme::line(offset), Lexeme::BR]);
            return Ok(1);
        }
        if self.in_code_block {
            out.extend([Lexeme::line(offset), Lexeme::BR]);
            return Ok(1);
        }
        if text.is_empty() {
            out.push(Lexeme::BR);
            return Ok(1);
        }

        if let Some(hashes) = atx_hashes(text) {
            HeaderLexer::new(text, offset, out).lex(hashes);
            out.push(Lexeme::BR);
            return Ok(1);
        }

        if is_post_declared_name(text) {
            let next = line_at(&self.lines, offset + 1);
            if let Some(underline_char) = underline_char(next) {
                out.extend([
                    Lexeme::post_declared(underline_char, TextSpan::whole_line(offset + 1)),
                    Lexeme::line(offset),
                    Lexeme::BR,
                ]);
                return Ok(2);
            }
        }

        out.extend([Lexeme::line(offset), Lexeme::BR]);
        Ok(1)
    }
}

fn line_at(lines: &[Option<String>], offset: u32) -> &str {
    lines
        .get(offset as usize)
        .and_then(Option::as_deref)
        .unwrap_or("")
}

fn narrow(value: usize, what: &'static str) -> Result<u32, SyntaxError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v != WHOLE_LINE)
        .ok_or(SyntaxError::CapacityExceeded { what, value })
}

/// Number of leading `#` if the line is an ATX header.
fn atx_hashes(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let hashes = bytes.iter().take_while(|&&b| b == b'#').count();
    if hashes == 0 {
        return None;
    }
    match bytes.get(hashes) {
        None => Some(hashes),
        Some(b) if b.is_ascii_whitespace() => Some(hashes),
        Some(_) => None,
    }
}

/// A line that may be underlined into a post-declared header.
fn is_post_declared_name(text: &str) -> bool {
    text.len() >= 2 && !text.as_bytes()[0].is_ascii_whitespace()
}

/// `=` or `-` if the line consists only of that character, at least twice.
fn underline_char(text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    let first = *bytes.first()?;
    (bytes.len() >= 2 && (first == b'=' || first == b'-') && bytes.iter().all(|&b| b == first))
        .then_some(first)
}

/// Byte cursor over a single ATX header line.
struct HeaderLexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    out: &'a mut Vec<Lexeme>,
}

impl<'a> HeaderLexer<'a> {
    fn new(text: &'a str, line: u32, out: &'a mut Vec<Lexeme>) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            line,
            out,
        }
    }

    fn lex(mut self, hashes: usize) {
        self.out.push(Lexeme::section((hashes - 1) as u32));
        self.pos = hashes;

        while !self.at_end() {
            if self.current().is_ascii_whitespace() {
                let start = self.pos;
                self.skip_whitespace();
                self.emit(LexemeKind::Whitespaces, start);
            } else if let Some(open) = metadata::open_len(self.rest()) {
                self.lex_metadata(open);
            } else {
                self.lex_text_run();
            }
        }
    }

    fn lex_text_run(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while !self.at_end()
            && !self.current().is_ascii_whitespace()
            && metadata::open_len(self.rest()).is_none()
        {
            self.pos += 1;
        }
        self.emit(LexemeKind::Text, start);
    }

    fn lex_metadata(&mut self, open: usize) {
        let start = self.pos;
        self.pos += open;
        self.emit(LexemeKind::MetaBegin, start);

        loop {
            self.skip_whitespace();
            if self.at_end() {
                return;
            }
            if self.rest().starts_with(metadata::COMMENT_CLOSE) {
                self.pos += metadata::COMMENT_CLOSE.len();
                self.out.push(Lexeme::HTML_COMMENT_END);
                return;
            }
            if !self.lex_property() {
                self.lex_meta_text();
                return;
            }
        }
    }

    /// `name ws* : ws* value ws* ;?`. Emits nothing and returns false when
    /// the input at the cursor is not a property.
    fn lex_property(&mut self) -> bool {
        let Some((property, name_len)) = metadata::property_name(&self.text[self.pos..]) else {
            return false;
        };
        let mut colon = self.pos + name_len;
        while colon < self.bytes.len() && self.bytes[colon].is_ascii_whitespace() {
            colon += 1;
        }
        if self.bytes.get(colon) != Some(&b':') {
            return false;
        }

        let name_start = self.pos;
        self.pos += name_len;
        self.emit(LexemeKind::MetaProperty(property), name_start);
        self.pos = colon + 1;
        self.out.push(Lexeme::META_NAMEVALUE_DELIMITER);

        self.skip_whitespace();
        let value_start = self.pos;
        while !self.at_end()
            && self.current() != b';'
            && !self.rest().starts_with(metadata::COMMENT_CLOSE)
        {
            self.pos += 1;
        }
        let mut value_end = self.pos;
        while value_end > value_start && self.bytes[value_end - 1].is_ascii_whitespace() {
            value_end -= 1;
        }
        if value_end > value_start {
            self.out.push(Lexeme::with_text(
                LexemeKind::MetaPropertyValue,
                self.span(value_start, value_end),
            ));
        }

        if !self.at_end() && self.current() == b';' {
            self.pos += 1;
            self.out.push(Lexeme::META_PROPERTY_DELIMITER);
        }
        true
    }

    /// Give up on properties: the rest of the comment becomes `META_TEXT`.
    fn lex_meta_text(&mut self) {
        let start = self.pos;
        match self.text[start..].find("-->") {
            Some(found) => {
                self.pos = start + found;
                if found > 0 {
                    self.emit(LexemeKind::MetaText, start);
                }
                self.pos += metadata::COMMENT_CLOSE.len();
                self.out.push(Lexeme::HTML_COMMENT_END);
            }
            None => {
                self.pos = self.bytes.len();
                self.emit(LexemeKind::MetaText, start);
            }
        }
    }

    fn emit(&mut self, kind: LexemeKind, start: usize) {
        let span = self.span(start, self.pos);
        self.out.push(Lexeme::with_text(kind, span));
    }

    fn span(&self, start: usize, end: usize) -> TextSpan {
        TextSpan::new(self.line, start as u32, (end - start) as u32)
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.current().is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn current(&self) -> u8 {
        self.bytes[self.pos]
    }

    fn rest(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexeme::{Payload, Property};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(text: &str) -> Vec<LexemeKind> {
        let mut lexer = SectionLexer::from_text(text);
        lexer.tokenize().unwrap().iter().map(|l| l.kind).collect()
    }

    #[test]
    fn empty_input_gives_no_lexemes() {
        assert_eq!(kinds(""), vec![]);
    }

    #[test]
    fn missing_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut lexer = SectionLexer::from_path(dir.path().join("nope.md"));
        assert!(lexer.tokenize().unwrap().is_empty());
    }

    #[test]
    fn every_line_produces_a_lexeme() {
        use LexemeKind::*;
        assert_eq!(
            kinds("a\n\nb\n"),
            vec![BeginDoc, Line, Br, Br, Line, Br, EndDoc]
        );
    }

    #[rstest]
    #[case("# Title", Some(1))]
    #[case("### Deep", Some(3))]
    #[case("#", Some(1))]
    #[case("##\tTabbed", Some(2))]
    #[case("#hashtag", None)]
    #[case("plain", None)]
    fn detects_atx_headers(#[case] line: &str, #[case] expected: Option<usize>) {
        assert_eq!(atx_hashes(line), expected);
    }

    #[test]
    fn atx_depth_is_hash_count_minus_one() {
        let mut lexer = SectionLexer::from_text("# A\n## B\n### C\n");
        let depths: Vec<u32> = lexer
            .tokenize()
            .unwrap()
            .iter()
            .filter_map(Lexeme::depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn header_runs_keep_exact_text() {
        let mut lexer = SectionLexer::from_text("##  Two  words");
        lexer.tokenize().unwrap();
        let runs: Vec<&str> = lexer
            .lexemes()
            .iter()
            .filter_map(Lexeme::span)
            .map(|span| lexer.text(span))
            .collect();
        assert_eq!(runs, vec!["  ", "Two", "  ", "words"]);
    }

    #[test]
    fn code_blocks_suppress_headers() {
        use LexemeKind::*;
        assert_eq!(
            kinds("```\n# not a header\n```\n# Header\n"),
            vec![
                BeginDoc, Line, Br, Line, Br, Line, Br, Section, Whitespaces, Text, Br, EndDoc
            ]
        );
    }

    #[test]
    fn post_declared_headers_use_lookahead() {
        use LexemeKind::*;
        assert_eq!(
            kinds("Outline Name\n========\nO text.\n\nFirst Section\n-------------\nN1 text.\n"),
            vec![
                BeginDoc,
                SectionEquals,
                Line,
                Br,
                Line,
                Br,
                Br,
                SectionHyphens,
                Line,
                Br,
                Line,
                Br,
                EndDoc
            ]
        );
    }

    #[test]
    fn post_declared_marker_spans_the_underline() {
        let mut lexer = SectionLexer::from_text("Name\n=====\n");
        lexer.tokenize().unwrap();
        let marker = lexer.lexemes()[1];
        assert_eq!(marker.payload, Payload::Text(TextSpan::whole_line(1)));
        assert_eq!(lexer.text(marker.span().unwrap()), "=====");
    }

    #[rstest]
    #[case("\n====\n")]
    #[case(" indented\n----\n")]
    #[case("x\n----\n")]
    #[case("text\n=\n")]
    #[case("text\n==-\n")]
    fn ambiguous_underlines_stay_lines(#[case] text: &str) {
        assert!(!kinds(text).iter().any(|k| matches!(
            k,
            LexemeKind::SectionEquals | LexemeKind::SectionHyphens
        )));
    }

    #[test]
    fn metadata_comment_is_lexed_into_properties() {
        let mut lexer = SectionLexer::from_text("# Outline Name <!-- Metadata: scope: 1y2m3d4h5m; -->\n");
        lexer.tokenize().unwrap();
        insta::assert_snapshot!(lexer.dump(), @r"
        #0 BEGIN_DOC
        #1 SECTION depth=0
        #2 WHITESPACES 0:1+1
        #3 TEXT 0:2+7
        #4 WHITESPACES 0:9+1
        #5 TEXT 0:10+4
        #6 WHITESPACES 0:14+1
        #7 META_BEGIN 0:15+14
        #8 META_PROPERTY_scope 0:30+5
        #9 META_NAMEVALUE_DELIMITER
        #10 META_PROPERTY_VALUE 0:37+10
        #11 META_PROPERTY_DELIMITER
        #12 HTML_COMMENT_END
        #13 BR
        #14 END_DOC
        ");
    }

    #[test]
    fn property_values_are_trimmed() {
        let mut lexer =
            SectionLexer::from_text("# N <!-- Metadata: type:   Outline  ; reads: 4 -->");
        lexer.tokenize().unwrap();
        let values: Vec<&str> = lexer
            .lexemes()
            .iter()
            .filter(|l| l.kind == LexemeKind::MetaPropertyValue)
            .filter_map(Lexeme::span)
            .map(|span| lexer.text(span))
            .collect();
        assert_eq!(values, vec!["Outline", "4"]);
    }

    #[test]
    fn malformed_metadata_degrades_to_comment_text() {
        let mut lexer = SectionLexer::from_text(
            "# N <!-- Metadata: type: Note; colour: red; reads: 3; --> \nbody\n",
        );
        lexer.tokenize().unwrap();

        let kinds: Vec<LexemeKind> = lexer.lexemes().iter().map(|l| l.kind).collect();
        assert!(kinds.contains(&LexemeKind::MetaProperty(Property::Type)));
        assert!(!kinds.contains(&LexemeKind::MetaProperty(Property::Reads)));

        let meta_text = lexer
            .lexemes()
            .iter()
            .find(|l| l.kind == LexemeKind::MetaText)
            .and_then(Lexeme::span)
            .unwrap();
        assert_eq!(lexer.text(meta_text), "colour: red; reads: 3; ");

        // The rest of the document is unaffected.
        assert_eq!(
            &kinds[kinds.len() - 6..],
            &[
                LexemeKind::HtmlCommentEnd,
                LexemeKind::Whitespaces,
                LexemeKind::Br,
                LexemeKind::Line,
                LexemeKind::Br,
                LexemeKind::EndDoc
            ][..]
        );
    }

    #[test]
    fn unterminated_metadata_runs_to_end_of_line() {
        use LexemeKind::*;
        assert_eq!(
            kinds("# N <!-- Metadata: reads: 1; ???"),
            vec![
                BeginDoc,
                Section,
                Whitespaces,
                Text,
                Whitespaces,
                MetaBegin,
                MetaProperty(Property::Reads),
                MetaNameValueDelimiter,
                MetaPropertyValue,
                MetaPropertyDelimiter,
                MetaText,
                Br,
                EndDoc
            ]
        );
    }

    #[test]
    fn plain_html_comment_is_name_text() {
        use LexemeKind::*;
        assert_eq!(
            kinds("# N <!-- note -->"),
            vec![
                BeginDoc,
                Section,
                Whitespaces,
                Text,
                Whitespaces,
                Text,
                Whitespaces,
                Text,
                Whitespaces,
                Text,
                Br,
                EndDoc
            ]
        );
    }

    #[test]
    fn claimed_lines_read_as_empty() {
        let mut lexer = SectionLexer::from_text("# T\nbody\n");
        lexer.tokenize().unwrap();

        assert_eq!(lexer.claim_line(1), Some("body".to_string()));
        assert_eq!(lexer.claim_line(1), None);
        assert_eq!(lexer.text(TextSpan::whole_line(1)), "");
    }

    #[test]
    fn tokenize_is_repeatable() {
        let mut lexer = SectionLexer::from_text("# T\n\ntext\n```\n# code\n```\n");
        let first = lexer.tokenize().unwrap().to_vec();
        let second = lexer.tokenize().unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn framing_is_exposed() {
        let lexer = SectionLexer::from_text("a\r\nb");
        assert_eq!(lexer.line_count(), 2);
        assert_eq!(lexer.byte_size(), 4);
        assert_eq!(lexer.line_ending(), LineEnding::CrLf);
        assert!(!lexer.final_newline());
    }

    #[test]
    fn narrow_rejects_sentinel() {
        assert_eq!(narrow(12, "line length").unwrap(), 12);
        assert!(matches!(
            narrow(WHOLE_LINE as usize, "line length"),
            Err(SyntaxError::CapacityExceeded { what: "line length", .. })
        ));
    }
}
