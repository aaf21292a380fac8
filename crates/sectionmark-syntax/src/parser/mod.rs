//! # Section Parser
//!
//! Recursive descent over the lexeme sequence:
//!
//! ```text
//! Document := BEGIN_DOC Preamble? Section* END_DOC
//! Section  := SECTION_marker Name Metadata? BR Body
//! Body     := (LINE BR | BR)*
//! ```
//!
//! Only the grammar is recursive. Sections and body lines are collected by
//! plain loops, so stack use does not grow with document length, and the
//! output is a flat `Vec<SectionNode>` with depths rather than a tree.
//!
//! Depths are normalised while parsing: the first real section is the outline
//! (depth 0) whatever its marker says, and every later section is a note with
//! depth of at least 1.
//!
//! ```
//! use sectionmark_syntax::lexer::SectionLexer;
//! use sectionmark_syntax::parser::SectionParser;
//! use sectionmark_syntax::symbol_table::SymbolTable;
//!
//! let mut symbols = SymbolTable::new();
//! let lexer = SectionLexer::from_text("# Outline\nintro\n## Note\nbody\n");
//! let document = SectionParser::new(lexer, &mut symbols).parse().unwrap();
//!
//! let names: Vec<&str> = document.iter().map(|s| s.name()).collect();
//! assert_eq!(names, vec!["Outline", "Note"]);
//! assert_eq!(document.sections[1].depth, 1);
//! ```

pub mod values;

use crate::ast::{HeaderStyle, SectionDocument, SectionMetadata, SectionNode};
use crate::error::SyntaxError;
use crate::lexeme::{Lexeme, LexemeKind, Property};
use crate::lexer::SectionLexer;
use crate::symbol_table::SymbolTable;
use values::PropertyValue;

pub struct SectionParser<'s> {
    lexer: SectionLexer,
    symbols: &'s mut SymbolTable,
    pos: usize,
    has_metadata: bool,
}

impl<'s> SectionParser<'s> {
    pub fn new(lexer: SectionLexer, symbols: &'s mut SymbolTable) -> Self {
        Self {
            lexer,
            symbols,
            pos: 0,
            has_metadata: false,
        }
    }

    /// Lex the source and build the section list.
    pub fn parse(mut self) -> Result<SectionDocument, SyntaxError> {
        self.lexer.tokenize()?;

        let mut sections = Vec::new();
        if self.eat(LexemeKind::BeginDoc) {
            if !self.at_section() && !self.at(LexemeKind::EndDoc) {
                sections.push(SectionNode::preamble(self.body()));
            }
            while self.at_section() {
                let is_first = sections.iter().all(SectionNode::is_preamble);
                sections.push(self.section(is_first));
            }
            self.eat(LexemeKind::EndDoc);
        }

        log::debug!(
            "Parsed {} sections from {} lexemes",
            sections.len(),
            self.lexer.lexemes().len()
        );

        Ok(SectionDocument {
            sections,
            has_metadata: self.has_metadata,
            line_ending: self.lexer.line_ending(),
            final_newline: self.lexer.final_newline(),
        })
    }

    fn section(&mut self, is_first: bool) -> SectionNode {
        let Some(marker) = self.bump() else {
            return SectionNode::preamble(Vec::new());
        };
        let marker_depth = marker.depth().unwrap_or(0);
        let depth = if is_first { 0 } else { marker_depth.max(1) };

        let (text, metadata, style) = match marker.kind {
            LexemeKind::Section => self.atx_header(marker_depth + 1),
            _ => self.post_declared_header(marker),
        };

        SectionNode {
            depth,
            text: Some(text),
            metadata,
            body: self.body(),
            style,
        }
    }

    /// Name runs and metadata up to the closing `BR`.
    fn atx_header(&mut self, hashes: u32) -> (String, SectionMetadata, HeaderStyle) {
        let mut raw = String::new();
        let mut metadata = SectionMetadata::default();

        while let Some(lexeme) = self.current() {
            match lexeme.kind {
                LexemeKind::Whitespaces | LexemeKind::Text => {
                    if let Some(span) = lexeme.span() {
                        raw.push_str(self.lexer.text(span));
                    }
                    self.bump();
                }
                LexemeKind::MetaBegin => {
                    self.bump();
                    self.metadata_block(&mut metadata);
                }
                LexemeKind::Br => {
                    self.bump();
                    break;
                }
                _ => break,
            }
        }
        if !metadata.is_empty() {
            self.has_metadata = true;
        }

        let name = raw.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let leading = raw[..raw.len() - name.len()].to_string();
        let name = name.trim_end_matches(|c: char| c.is_ascii_whitespace());
        let trailing = raw[leading.len() + name.len()..].to_string();

        let (name, trailing_hashes) = match strip_trailing_hashes(name, hashes) {
            Some(stem) => (stem, true),
            None => (name, false),
        };

        let style = HeaderStyle::Atx {
            hashes,
            trailing_hashes,
            leading,
            trailing,
        };
        (name.to_string(), metadata, style)
    }

    /// `SECTION=`/`SECTION-` followed by the name `LINE` and its `BR`.
    fn post_declared_header(&mut self, marker: Lexeme) -> (String, SectionMetadata, HeaderStyle) {
        let (underline, width) = match marker.span() {
            Some(span) => {
                let text = self.lexer.text(span);
                (text.as_bytes().first().copied().unwrap_or(b'='), text.len() as u32)
            }
            None => (b'=', 2),
        };

        let mut name = String::new();
        if let Some(lexeme) = self.current().filter(|l| l.kind == LexemeKind::Line) {
            self.bump();
            if let Some(span) = lexeme.span() {
                name = self.lexer.claim_line(span.line).unwrap_or_default();
            }
            self.eat(LexemeKind::Br);
        }

        let style = HeaderStyle::PostDeclared { underline, width };
        (name, SectionMetadata::default(), style)
    }

    /// Properties up to `HTML_COMMENT_END`. Values that do not convert are
    /// dropped one by one; the rest of the block still applies.
    fn metadata_block(&mut self, metadata: &mut SectionMetadata) {
        while let Some(lexeme) = self.current() {
            match lexeme.kind {
                LexemeKind::MetaProperty(property) => {
                    self.bump();
                    self.eat(LexemeKind::MetaNameValueDelimiter);
                    self.property_value(property, metadata);
                    self.eat(LexemeKind::MetaPropertyDelimiter);
                }
                LexemeKind::MetaText => {
                    if let Some(span) = lexeme.span() {
                        log::trace!("Ignoring metadata text {:?}", self.lexer.text(span));
                    }
                    self.bump();
                }
                LexemeKind::HtmlCommentEnd => {
                    self.bump();
                    return;
                }
                _ => return,
            }
        }
    }

    fn property_value(&mut self, property: Property, metadata: &mut SectionMetadata) {
        let Some(lexeme) = self.current().filter(|l| l.kind == LexemeKind::MetaPropertyValue)
        else {
            log::debug!("Dropping metadata property {} without a value", property.name());
            return;
        };
        self.bump();
        let raw = lexeme.span().map(|span| self.lexer.text(span)).unwrap_or("");

        match values::convert(property, raw, self.symbols) {
            Some(value) => apply(metadata, property, value),
            None => log::debug!(
                "Dropping metadata property {} with malformed value {raw:?}",
                property.name()
            ),
        }
    }

    /// `(LINE BR | BR)*`
    fn body(&mut self) -> Vec<String> {
        let mut body = Vec::new();
        while let Some(lexeme) = self.current() {
            match lexeme.kind {
                LexemeKind::Line => {
                    self.bump();
                    let line = lexeme
                        .span()
                        .and_then(|span| self.lexer.claim_line(span.line))
                        .unwrap_or_default();
                    body.push(line);
                    self.eat(LexemeKind::Br);
                }
                LexemeKind::Br => {
                    self.bump();
                    body.push(String::new());
                }
                _ => break,
            }
        }
        body
    }

    fn current(&self) -> Option<Lexeme> {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Option<Lexeme> {
        self.lexer.lexemes().get(self.pos + n).copied()
    }

    fn at(&self, kind: LexemeKind) -> bool {
        self.current().is_some_and(|l| l.kind == kind)
    }

    fn at_section(&self) -> bool {
        self.current().is_some_and(|l| l.is_section())
    }

    fn eat(&mut self, kind: LexemeKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.current()?;
        self.pos += 1;
        Some(lexeme)
    }
}

fn apply(metadata: &mut SectionMetadata, property: Property, value: PropertyValue) {
    match value {
        PropertyValue::Label(label) => metadata.set_type(label),
        PropertyValue::Timestamp(timestamp) => metadata.set_timestamp(property, timestamp),
        PropertyValue::Count(count) => metadata.set_count(property, count),
        PropertyValue::Level(level) => metadata.set_level(property, level),
        PropertyValue::Tags { tags, separators } => {
            metadata.set_tags_with_separators(tags, separators)
        }
        PropertyValue::Links(links) => metadata.set_links(links),
        PropertyValue::Scope(scope) => metadata.set_scope(scope),
    }
}

/// `Name ##` for a `##` header: the closing run must match the opening run
/// exactly and follow a space and some text.
fn strip_trailing_hashes(name: &str, hashes: u32) -> Option<&str> {
    let closing = "#".repeat(hashes as usize);
    let stem = name.strip_suffix(closing.as_str())?.strip_suffix(' ')?;
    if stem.ends_with('#') || stem.trim().is_empty() {
        return None;
    }
    Some(stem)
}
