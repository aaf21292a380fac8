//! Conversion of raw property values into typed metadata.
//!
//! Each function returns `None` when the value does not have the expected
//! shape; the caller then drops that one property.

use chrono::NaiveDateTime;

use crate::ast::{Link, TIMESTAMP_FORMAT, TimeScope};
use crate::lexeme::Property;
use crate::symbol_table::{Symbol, SymbolTable};

/// A value converted according to its property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Label(Symbol),
    Timestamp(NaiveDateTime),
    Count(u32),
    Level(i8),
    Tags {
        tags: Vec<Symbol>,
        /// Text between each pair of tags, exactly as written.
        separators: Vec<String>,
    },
    Links(Vec<Link>),
    Scope(TimeScope),
}

pub fn convert(property: Property, raw: &str, symbols: &mut SymbolTable) -> Option<PropertyValue> {
    match property {
        Property::Type => label(raw, symbols).map(PropertyValue::Label),
        Property::Created | Property::Modified | Property::Read | Property::Deadline => {
            timestamp(raw).map(PropertyValue::Timestamp)
        }
        Property::Reads | Property::Revision => raw.trim().parse().ok().map(PropertyValue::Count),
        Property::Importance | Property::Urgency => fraction(raw).map(PropertyValue::Level),
        Property::Progress => percent(raw).map(PropertyValue::Level),
        Property::Tags => {
            tags(raw, symbols).map(|(tags, separators)| PropertyValue::Tags { tags, separators })
        }
        Property::Links => links(raw).map(PropertyValue::Links),
        Property::Scope => TimeScope::parse(raw).map(PropertyValue::Scope),
    }
}

pub fn timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

fn label(raw: &str, symbols: &mut SymbolTable) -> Option<Symbol> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| symbols.intern(raw))
}

/// `n/5`, keeping the numerator. A bare `n` is accepted too.
fn fraction(raw: &str) -> Option<i8> {
    let raw = raw.trim();
    let numerator = match raw.split_once('/') {
        Some((numerator, denominator)) => {
            denominator.trim().parse::<i8>().ok()?;
            numerator
        }
        None => raw,
    };
    numerator.trim().parse().ok()
}

/// `n%`, keeping `n`. A bare `n` is accepted too.
fn percent(raw: &str) -> Option<i8> {
    let raw = raw.trim();
    raw.strip_suffix('%').unwrap_or(raw).trim().parse().ok()
}

/// Comma separated tags, trimmed. Also returns the text between each pair of
/// tags so the list can be written back unchanged.
fn tags(raw: &str, symbols: &mut SymbolTable) -> Option<(Vec<Symbol>, Vec<String>)> {
    let mut tags = Vec::new();
    let mut separators = Vec::new();
    let mut previous_end = None;
    let mut offset = 0;
    for segment in raw.split([',', ';']) {
        let tag = segment.trim();
        if !tag.is_empty() {
            let start = offset + (segment.len() - segment.trim_start().len());
            if let Some(end) = previous_end {
                separators.push(raw[end..start].to_string());
            }
            previous_end = Some(start + tag.len());
            tags.push(symbols.intern(tag));
        }
        offset += segment.len() + 1;
    }
    (!tags.is_empty()).then_some((tags, separators))
}

/// Comma separated `[label](url)` pairs. One malformed pair drops them all.
fn links(raw: &str) -> Option<Vec<Link>> {
    let mut links = Vec::new();
    let mut rest = raw.trim();
    while !rest.is_empty() {
        let end = rest.find(")").map(|i| i + 1)?;
        let mut candidate = &rest[..end];
        let mut consumed = end;
        // A `)` inside the url: extend to the `)` right before the next separator.
        while let Some(more) = rest[consumed..].find(')') {
            let tail = rest[consumed..].trim_start();
            if tail.is_empty() || tail.starts_with(',') {
                break;
            }
            consumed += more + 1;
            candidate = &rest[..consumed];
        }
        links.push(Link::parse(candidate)?);
        rest = rest[consumed..].trim_start();
        rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    }
    (!links.is_empty()).then_some(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn timestamps() {
        assert_eq!(
            timestamp("2010-11-12 13:14:15"),
            Some(at(2010, 11, 12, 13, 14, 15))
        );
        assert_eq!(timestamp("2010-11-12"), None);
        assert_eq!(timestamp("yesterday"), None);
    }

    #[rstest]
    #[case("3/5", Some(3))]
    #[case(" 0/5 ", Some(0))]
    #[case("4", Some(4))]
    #[case("x/5", None)]
    #[case("3/five", None)]
    fn fractions(#[case] raw: &str, #[case] expected: Option<i8>) {
        assert_eq!(fraction(raw), expected);
    }

    #[rstest]
    #[case("50%", Some(50))]
    #[case("100", Some(100))]
    #[case("half%", None)]
    fn percents(#[case] raw: &str, #[case] expected: Option<i8>) {
        assert_eq!(percent(raw), expected);
    }

    #[test]
    fn tags_are_trimmed_and_interned() {
        let mut symbols = SymbolTable::new();
        let (parsed, separators) = tags("important,  to   do , , idea", &mut symbols).unwrap();

        let names: Vec<&str> = parsed.iter().map(|t| &**t).collect();
        assert_eq!(names, vec!["important", "to   do", "idea"]);
        assert_eq!(separators, vec![",  ", " , , "]);
        assert_eq!(symbols.len(), 3);
        assert!(tags(" , ", &mut symbols).is_none());
    }

    #[test]
    fn bare_comma_separators() {
        let mut symbols = SymbolTable::new();
        let (parsed, separators) = tags("important,later", &mut symbols).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(separators, vec![","]);
    }

    #[test]
    fn links_keep_order() {
        let parsed = links("[opposite of](./x.md),[is a](./y.md#a-z)").unwrap();
        assert_eq!(
            parsed,
            vec![
                Link::new("opposite of", "./x.md"),
                Link::new("is a", "./y.md#a-z"),
            ]
        );
    }

    #[test]
    fn links_allow_commas_in_labels() {
        let parsed = links("[this, that](a.md), [other](b.md)").unwrap();
        assert_eq!(
            parsed,
            vec![Link::new("this, that", "a.md"), Link::new("other", "b.md")]
        );
    }

    #[test]
    fn links_allow_parentheses_in_urls() {
        let parsed = links("[wiki](https://en.wikipedia.org/wiki/Rust_(language))").unwrap();
        assert_eq!(
            parsed,
            vec![Link::new(
                "wiki",
                "https://en.wikipedia.org/wiki/Rust_(language)"
            )]
        );
    }

    #[test]
    fn malformed_links_drop_the_property() {
        assert_eq!(links("[ok](a.md), not a link"), None);
        assert_eq!(links(""), None);
    }

    #[test]
    fn convert_dispatches_by_property() {
        let mut symbols = SymbolTable::new();
        assert_eq!(
            convert(Property::Reads, "7", &mut symbols),
            Some(PropertyValue::Count(7))
        );
        assert_eq!(convert(Property::Revision, "-1", &mut symbols), None);
        assert_eq!(
            convert(Property::Type, "Outline", &mut symbols),
            Some(PropertyValue::Label("Outline".into()))
        );
        assert_eq!(
            convert(Property::Scope, "0y0m1d0h0m", &mut symbols),
            Some(PropertyValue::Scope(TimeScope {
                days: 1,
                ..Default::default()
            }))
        );
    }
}
