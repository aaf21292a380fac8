//! # Lexemes
//!
//! A [`Lexeme`] is a small `Copy` value: a [`LexemeKind`] plus an optional
//! payload. Text-bearing lexemes carry a [`TextSpan`] pointing back into the
//! lexer's line buffer, ATX section markers carry their depth, and the fixed
//! structural lexemes (`BEGIN_DOC`, `BR`, ...) carry nothing and are plain
//! constants on [`Lexeme`], so no lexeme table has to be allocated or shared.

use std::fmt;

/// `len` value meaning "the whole line at `line`".
pub const WHOLE_LINE: u32 = u32::MAX;

/// Position of a lexeme's text in the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    /// Line index.
    pub line: u32,
    /// Byte offset of the first byte within the line.
    pub start: u32,
    /// Length in bytes, or [`WHOLE_LINE`].
    pub len: u32,
}

impl TextSpan {
    pub const fn new(line: u32, start: u32, len: u32) -> Self {
        Self { line, start, len }
    }

    pub const fn whole_line(line: u32) -> Self {
        Self {
            line,
            start: 0,
            len: WHOLE_LINE,
        }
    }

    pub fn is_whole_line(self) -> bool {
        self.len == WHOLE_LINE
    }
}

/// The closed vocabulary of metadata property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Type,
    Created,
    Reads,
    Read,
    Revision,
    Modified,
    Importance,
    Urgency,
    Progress,
    Tags,
    Links,
    Deadline,
    Scope,
}

impl Property {
    pub const ALL: [Property; 13] = [
        Property::Type,
        Property::Created,
        Property::Reads,
        Property::Read,
        Property::Revision,
        Property::Modified,
        Property::Importance,
        Property::Urgency,
        Property::Progress,
        Property::Tags,
        Property::Links,
        Property::Deadline,
        Property::Scope,
    ];

    /// The name as written in a metadata comment.
    pub fn name(self) -> &'static str {
        match self {
            Property::Type => "type",
            Property::Created => "created",
            Property::Reads => "reads",
            Property::Read => "read",
            Property::Revision => "revision",
            Property::Modified => "modified",
            Property::Importance => "importance",
            Property::Urgency => "urgency",
            Property::Progress => "progress",
            Property::Tags => "tags",
            Property::Links => "links",
            Property::Deadline => "deadline",
            Property::Scope => "scope",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    BeginDoc,
    EndDoc,
    /// ATX section marker (`#`, `##`, ...).
    Section,
    /// Post-declared section underlined with `=`.
    SectionEquals,
    /// Post-declared section underlined with `-`.
    SectionHyphens,
    Text,
    /// A whole line kept verbatim.
    Line,
    Whitespaces,
    Br,
    MetaBegin,
    /// Unparseable remainder of a metadata comment.
    MetaText,
    /// `;` between properties.
    MetaPropertyDelimiter,
    /// `:` between a property name and its value.
    MetaNameValueDelimiter,
    MetaProperty(Property),
    MetaPropertyValue,
    HtmlCommentEnd,
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LexemeKind::BeginDoc => "BEGIN_DOC",
            LexemeKind::EndDoc => "END_DOC",
            LexemeKind::Section => "SECTION",
            LexemeKind::SectionEquals => "SECTION=",
            LexemeKind::SectionHyphens => "SECTION-",
            LexemeKind::Text => "TEXT",
            LexemeKind::Line => "LINE",
            LexemeKind::Whitespaces => "WHITESPACES",
            LexemeKind::Br => "BR",
            LexemeKind::MetaBegin => "META_BEGIN",
            LexemeKind::MetaText => "META_TEXT",
            LexemeKind::MetaPropertyDelimiter => "META_PROPERTY_DELIMITER",
            LexemeKind::MetaNameValueDelimiter => "META_NAMEVALUE_DELIMITER",
            LexemeKind::MetaProperty(property) => {
                return write!(f, "META_PROPERTY_{}", property.name());
            }
            LexemeKind::MetaPropertyValue => "META_PROPERTY_VALUE",
            LexemeKind::HtmlCommentEnd => "HTML_COMMENT_END",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    None,
    Depth(u32),
    Text(TextSpan),
}

/// A single typed token produced by the section lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub payload: Payload,
}

impl Lexeme {
    pub const BEGIN_DOC: Lexeme = Lexeme::fixed(LexemeKind::BeginDoc);
    pub const END_DOC: Lexeme = Lexeme::fixed(LexemeKind::EndDoc);
    pub const BR: Lexeme = Lexeme::fixed(LexemeKind::Br);
    pub const META_PROPERTY_DELIMITER: Lexeme = Lexeme::fixed(LexemeKind::MetaPropertyDelimiter);
    pub const META_NAMEVALUE_DELIMITER: Lexeme =
        Lexeme::fixed(LexemeKind::MetaNameValueDelimiter);
    pub const HTML_COMMENT_END: Lexeme = Lexeme::fixed(LexemeKind::HtmlCommentEnd);

    const fn fixed(kind: LexemeKind) -> Self {
        Self {
            kind,
            payload: Payload::None,
        }
    }

    pub const fn section(depth: u32) -> Self {
        Self {
            kind: LexemeKind::Section,
            payload: Payload::Depth(depth),
        }
    }

    /// Post-declared section marker; `underline` spans the `===`/`---` line.
    pub const fn post_declared(underline_char: u8, underline: TextSpan) -> Self {
        let kind = if underline_char == b'=' {
            LexemeKind::SectionEquals
        } else {
            LexemeKind::SectionHyphens
        };
        Self {
            kind,
            payload: Payload::Text(underline),
        }
    }

    pub const fn with_text(kind: LexemeKind, span: TextSpan) -> Self {
        Self {
            kind,
            payload: Payload::Text(span),
        }
    }

    pub const fn line(line: u32) -> Self {
        Self::with_text(LexemeKind::Line, TextSpan::whole_line(line))
    }

    pub fn span(&self) -> Option<TextSpan> {
        match self.payload {
            Payload::Text(span) => Some(span),
            _ => None,
        }
    }

    /// Depth announced by a section marker.
    pub fn depth(&self) -> Option<u32> {
        match (self.kind, self.payload) {
            (LexemeKind::Section, Payload::Depth(depth)) => Some(depth),
            (LexemeKind::SectionEquals, _) => Some(0),
            (LexemeKind::SectionHyphens, _) => Some(1),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(
            self.kind,
            LexemeKind::Section | LexemeKind::SectionEquals | LexemeKind::SectionHyphens
        )
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload {
            Payload::None => write!(f, "{}", self.kind),
            Payload::Depth(depth) => write!(f, "{} depth={depth}", self.kind),
            Payload::Text(span) if span.is_whole_line() => {
                write!(f, "{} {}:*", self.kind, span.line)
            }
            Payload::Text(span) => {
                write!(f, "{} {}:{}+{}", self.kind, span.line, span.start, span.len)
            }
        }
    }
}
