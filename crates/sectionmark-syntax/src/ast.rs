//! # Section AST
//!
//! The parser's output: a flat list of [`SectionNode`]s, each with a depth.
//! Nesting is implied (a section is a child of the nearest preceding section
//! with a smaller depth) and only materialised on demand by
//! [`OutlineTree`](crate::outline::OutlineTree).

use std::fmt;
use std::mem;

use chrono::NaiveDateTime;

use crate::lexeme::Property;
use crate::source::LineEnding;
use crate::symbol_table::Symbol;

/// Depth of the synthetic section holding content before the first header.
pub const PREAMBLE: u32 = u32::MAX;

/// Format of every timestamp in metadata comments.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between tags that were not read from text.
pub const TAG_SEPARATOR: &str = ",";

/// A `[name](url)` relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Parse `[label](url)`, splitting at the first `](`.
    pub fn parse(s: &str) -> Option<Self> {
        let inner = s.trim().strip_prefix('[')?.strip_suffix(')')?;
        let (name, url) = inner.split_once("](")?;
        Some(Self::new(name, url))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({})", self.name, self.url)
    }
}

/// Relative duration written as `<y>y<mo>m<d>d<h>h<mi>m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeScope {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl TimeScope {
    /// Parse the compact form. All five components are required, in order.
    ///
    /// ```
    /// use sectionmark_syntax::ast::TimeScope;
    ///
    /// let scope = TimeScope::parse("1y2m3d4h5m").unwrap();
    /// assert_eq!(scope.relative_secs(), 36993900);
    /// assert_eq!(scope.to_string(), "1y2m3d4h5m");
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let mut rest = s.trim();
        let mut next = |unit: char| -> Option<u32> {
            let digits = rest.find(|c: char| !c.is_ascii_digit())?;
            if digits == 0 || !rest[digits..].starts_with(unit) {
                return None;
            }
            let value = rest[..digits].parse().ok()?;
            rest = &rest[digits + unit.len_utf8()..];
            Some(value)
        };
        let scope = Self {
            years: next('y')?,
            months: next('m')?,
            days: next('d')?,
            hours: next('h')?,
            minutes: next('m')?,
        };
        rest.is_empty().then_some(scope)
    }

    /// Length in seconds, with 30-day months and 365-day years.
    pub fn relative_secs(&self) -> u64 {
        const MINUTE: u64 = 60;
        const HOUR: u64 = 60 * MINUTE;
        const DAY: u64 = 24 * HOUR;
        u64::from(self.minutes) * MINUTE
            + u64::from(self.hours) * HOUR
            + u64::from(self.days) * DAY
            + u64::from(self.months) * 30 * DAY
            + u64::from(self.years) * 365 * DAY
    }
}

impl fmt::Display for TimeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}y{}m{}d{}h{}m",
            self.years, self.months, self.days, self.hours, self.minutes
        )
    }
}

/// Typed values from a section's metadata comment.
///
/// Every field is optional; [`properties`](Self::properties) records which
/// ones were set and in what order, so the comment can be written back the way
/// it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMetadata {
    pub type_label: Option<Symbol>,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub read: Option<NaiveDateTime>,
    pub reads: Option<u32>,
    pub revision: Option<u32>,
    pub importance: Option<i8>,
    pub urgency: Option<i8>,
    pub progress: Option<i8>,
    pub tags: Vec<Symbol>,
    pub links: Vec<Link>,
    pub deadline: Option<NaiveDateTime>,
    pub scope: Option<TimeScope>,
    order: Vec<Property>,
    /// Text between consecutive tags as read, e.g. `,` or `, `.
    tag_separators: Vec<String>,
}

impl SectionMetadata {
    /// Properties that hold a value, in the order they were set.
    pub fn properties(&self) -> &[Property] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// First tag, the section's default classification.
    pub fn primary_tag(&self) -> Option<&Symbol> {
        self.tags.first()
    }

    pub fn set_type(&mut self, label: Symbol) {
        self.type_label = Some(label);
        self.touch(Property::Type);
    }

    /// Set one of the timestamp properties. Other properties are ignored.
    pub fn set_timestamp(&mut self, property: Property, value: NaiveDateTime) {
        let slot = match property {
            Property::Created => &mut self.created,
            Property::Modified => &mut self.modified,
            Property::Read => &mut self.read,
            Property::Deadline => &mut self.deadline,
            _ => return,
        };
        *slot = Some(value);
        self.touch(property);
    }

    /// Set `reads` or `revision`.
    pub fn set_count(&mut self, property: Property, value: u32) {
        let slot = match property {
            Property::Reads => &mut self.reads,
            Property::Revision => &mut self.revision,
            _ => return,
        };
        *slot = Some(value);
        self.touch(property);
    }

    /// Set `importance`, `urgency` or `progress`.
    pub fn set_level(&mut self, property: Property, value: i8) {
        let slot = match property {
            Property::Importance => &mut self.importance,
            Property::Urgency => &mut self.urgency,
            Property::Progress => &mut self.progress,
            _ => return,
        };
        *slot = Some(value);
        self.touch(property);
    }

    pub fn set_tags(&mut self, tags: Vec<Symbol>) {
        self.set_tags_with_separators(tags, Vec::new());
    }

    /// Set tags keeping the separator written between each pair, so they are
    /// serialized the way they were read.
    pub fn set_tags_with_separators(&mut self, tags: Vec<Symbol>, separators: Vec<String>) {
        self.tags = tags;
        self.tag_separators = separators;
        self.touch(Property::Tags);
    }

    /// Separator written after tag `index`; `,` unless another was read.
    pub fn tag_separator(&self, index: usize) -> &str {
        self.tag_separators
            .get(index)
            .map_or(TAG_SEPARATOR, String::as_str)
    }

    pub fn set_links(&mut self, links: Vec<Link>) {
        self.links = links;
        self.touch(Property::Links);
    }

    pub fn set_scope(&mut self, scope: TimeScope) {
        self.scope = Some(scope);
        self.touch(Property::Scope);
    }

    fn touch(&mut self, property: Property) {
        if !self.order.contains(&property) {
            self.order.push(property);
        }
    }
}

/// How a section header was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Content before the first header; there is no header line.
    Preamble,
    /// `## Name`, optionally closed with a matching `##` run.
    Atx {
        hashes: u32,
        trailing_hashes: bool,
        /// Whitespace between the hashes and the name.
        leading: String,
        /// Whitespace after the name (and closing hashes).
        trailing: String,
    },
    /// Name line followed by a line of `=` or `-`.
    PostDeclared { underline: u8, width: u32 },
}

/// One logical section: a header plus the raw lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNode {
    /// 0 for the outline section, >= 1 for notes, [`PREAMBLE`] for the preamble.
    pub depth: u32,
    /// Header name; `None` only for the preamble.
    pub text: Option<String>,
    pub metadata: SectionMetadata,
    pub body: Vec<String>,
    pub style: HeaderStyle,
}

impl SectionNode {
    /// A new ATX section with the conventional `#` count for `depth`.
    pub fn new(depth: u32, name: impl Into<String>) -> Self {
        Self {
            depth,
            text: Some(name.into()),
            metadata: SectionMetadata::default(),
            body: Vec::new(),
            style: HeaderStyle::Atx {
                hashes: depth.saturating_add(1),
                trailing_hashes: false,
                leading: " ".to_string(),
                trailing: String::new(),
            },
        }
    }

    pub fn preamble(body: Vec<String>) -> Self {
        Self {
            depth: PREAMBLE,
            text: None,
            metadata: SectionMetadata::default(),
            body,
            style: HeaderStyle::Preamble,
        }
    }

    pub fn is_preamble(&self) -> bool {
        self.depth == PREAMBLE
    }

    /// Header name, or `""` for the preamble.
    pub fn name(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Written as a name line underlined with `=`/`-`.
    pub fn is_post_declared(&self) -> bool {
        matches!(self.style, HeaderStyle::PostDeclared { .. })
    }

    /// Written as `## Name ##`.
    pub fn is_trailing_hashes(&self) -> bool {
        matches!(
            self.style,
            HeaderStyle::Atx {
                trailing_hashes: true,
                ..
            }
        )
    }

    /// Hand the body over to the caller, leaving this section without one.
    pub fn take_body(&mut self) -> Vec<String> {
        mem::take(&mut self.body)
    }

    /// Body lines joined with `\n`.
    pub fn description(&self) -> String {
        self.body.join("\n")
    }
}

/// Parser output for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDocument {
    pub sections: Vec<SectionNode>,
    /// Whether any section carried a non-empty metadata block.
    pub has_metadata: bool,
    pub line_ending: LineEnding,
    pub final_newline: bool,
}

impl SectionDocument {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionNode> {
        self.sections.iter()
    }

    pub fn preamble(&self) -> Option<&SectionNode> {
        self.sections.first().filter(|s| s.is_preamble())
    }

    /// The depth-0 section that titles the document.
    pub fn outline_section(&self) -> Option<&SectionNode> {
        self.sections.iter().find(|s| !s.is_preamble())
    }

    /// The sections that are not the preamble or the outline section.
    pub fn notes(&self) -> impl Iterator<Item = &SectionNode> {
        self.sections.iter().filter(|s| !s.is_preamble()).skip(1)
    }
}

impl<'a> IntoIterator for &'a SectionDocument {
    type Item = &'a SectionNode;
    type IntoIter = std::slice::Iter<'a, SectionNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
