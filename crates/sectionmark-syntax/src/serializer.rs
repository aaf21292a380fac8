//! # Serializer
//!
//! Writes a [`SectionDocument`] back to Markdown. For a document that went
//! through [`parse`](crate::parse) without edits the output is byte-identical
//! to the input, as long as its metadata comments use the canonical
//! `<!-- Metadata: name: value; ... -->` spelling:
//!
//! ```
//! use sectionmark_syntax::{parse, serialize};
//!
//! let text = "Outline Name\n========\nO text.\n\nFirst Section\n-------------\nN1 text.\n";
//! assert_eq!(serialize(&parse(text).unwrap()), text);
//! ```
//!
//! Header style, hash counts, underline widths and the whitespace around a
//! header name all come from [`HeaderStyle`]; metadata is regenerated from the
//! typed values in the order the properties were read.

use crate::ast::{HeaderStyle, SectionDocument, SectionMetadata, SectionNode, TIMESTAMP_FORMAT};
use crate::lexeme::Property;

pub fn serialize(document: &SectionDocument) -> String {
    let mut lines = Vec::new();
    for section in document {
        write_section(section, &mut lines);
    }

    let eol = document.line_ending.as_str();
    let mut out = lines.join(eol);
    if document.final_newline && !lines.is_empty() {
        out.push_str(eol);
    }
    out
}

/// The `<!-- Metadata: ... -->` comment for `metadata`, or `None` if it has
/// no properties.
pub fn metadata_comment(metadata: &SectionMetadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    let mut comment = String::from("<!-- Metadata:");
    for &property in metadata.properties() {
        if let Some(value) = render_value(metadata, property) {
            comment.push_str(&format!(" {}: {value};", property.name()));
        }
    }
    comment.push_str(" -->");
    Some(comment)
}

fn write_section(section: &SectionNode, lines: &mut Vec<String>) {
    match &section.style {
        HeaderStyle::Preamble => {}
        HeaderStyle::Atx {
            hashes,
            trailing_hashes,
            leading,
            trailing,
        } => {
            let closing = "#".repeat(*hashes as usize);
            let mut line = closing.clone();
            line.push_str(leading);
            line.push_str(section.name());
            if *trailing_hashes {
                line.push(' ');
                line.push_str(&closing);
            }
            line.push_str(trailing);
            if let Some(comment) = metadata_comment(&section.metadata) {
                if trailing.is_empty() {
                    line.push(' ');
                }
                line.push_str(&comment);
            }
            lines.push(line);
        }
        HeaderStyle::PostDeclared { underline, width } => {
            lines.push(section.name().to_string());
            lines.push(char::from(*underline).to_string().repeat(*width as usize));
        }
    }
    lines.extend(section.body.iter().cloned());
}

fn render_value(metadata: &SectionMetadata, property: Property) -> Option<String> {
    let timestamp = |value: &Option<chrono::NaiveDateTime>| {
        value.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
    };
    match property {
        Property::Type => metadata.type_label.as_deref().map(str::to_string),
        Property::Created => timestamp(&metadata.created),
        Property::Modified => timestamp(&metadata.modified),
        Property::Read => timestamp(&metadata.read),
        Property::Deadline => timestamp(&metadata.deadline),
        Property::Reads => metadata.reads.map(|n| n.to_string()),
        Property::Revision => metadata.revision.map(|n| n.to_string()),
        Property::Importance => metadata.importance.map(|n| format!("{n}/5")),
        Property::Urgency => metadata.urgency.map(|n| format!("{n}/5")),
        Property::Progress => metadata.progress.map(|n| format!("{n}%")),
        Property::Tags => (!metadata.tags.is_empty()).then(|| {
            let mut out = String::new();
            for (i, tag) in metadata.tags.iter().enumerate() {
                if i > 0 {
                    out.push_str(metadata.tag_separator(i - 1));
                }
                out.push_str(tag);
            }
            out
        }),
        Property::Links => (!metadata.links.is_empty()).then(|| {
            metadata
                .links
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        }),
        Property::Scope => metadata.scope.map(|s| s.to_string()),
    }
}
