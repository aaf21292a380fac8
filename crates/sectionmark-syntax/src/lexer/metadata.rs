//! Recognition of `<!-- Metadata: name: value; ... -->` comments inside
//! header lines.
//!
//! Property names are matched with a [Logos] automaton so `reads` wins over
//! `read` by longest match. A name only counts when it is followed by `:` or
//! whitespace, which keeps `readme:` from being taken as `read`.
//!
//! [Logos]: https://docs.rs/logos

use logos::Logos;

use crate::lexeme::Property;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyToken {
    #[token("type")]
    Type,
    #[token("created")]
    Created,
    #[token("reads")]
    Reads,
    #[token("read")]
    Read,
    #[token("revision")]
    Revision,
    #[token("modified")]
    Modified,
    #[token("importance")]
    Importance,
    #[token("urgency")]
    Urgency,
    #[token("progress")]
    Progress,
    #[token("tags")]
    Tags,
    #[token("links")]
    Links,
    #[token("deadline")]
    Deadline,
    #[token("scope")]
    Scope,
}

impl PropertyToken {
    fn property(self) -> Property {
        match self {
            PropertyToken::Type => Property::Type,
            PropertyToken::Created => Property::Created,
            PropertyToken::Reads => Property::Reads,
            PropertyToken::Read => Property::Read,
            PropertyToken::Revision => Property::Revision,
            PropertyToken::Modified => Property::Modified,
            PropertyToken::Importance => Property::Importance,
            PropertyToken::Urgency => Property::Urgency,
            PropertyToken::Progress => Property::Progress,
            PropertyToken::Tags => Property::Tags,
            PropertyToken::Links => Property::Links,
            PropertyToken::Deadline => Property::Deadline,
            PropertyToken::Scope => Property::Scope,
        }
    }
}

const COMMENT_OPEN: &[u8] = b"<!--";
pub(super) const COMMENT_CLOSE: &[u8] = b"-->";
const METADATA_TAG: &[u8] = b"metadata:";

/// Length of the `<!-- Metadata:` opener at the start of `rest`, if any.
///
/// Whitespace is allowed between `<!--` and the tag, and the tag itself is
/// matched case-insensitively.
pub(super) fn open_len(rest: &[u8]) -> Option<usize> {
    let after = rest.strip_prefix(COMMENT_OPEN)?;
    let ws = after.iter().take_while(|b| b.is_ascii_whitespace()).count();
    let tag = after.get(ws..ws + METADATA_TAG.len())?;
    tag.eq_ignore_ascii_case(METADATA_TAG)
        .then_some(COMMENT_OPEN.len() + ws + METADATA_TAG.len())
}

/// Match a property name at the start of `rest`, returning it with its length.
pub(super) fn property_name(rest: &str) -> Option<(Property, usize)> {
    let mut lexer = PropertyToken::lexer(rest);
    let token = lexer.next()?.ok()?;
    let len = lexer.span().end;
    match rest.as_bytes().get(len) {
        Some(&b) if b == b':' || b.is_ascii_whitespace() => Some((token.property(), len)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<!-- Metadata: type: Note; -->", Some(14))]
    #[case("<!--Metadata:", Some(13))]
    #[case("<!--   METADATA: x", Some(16))]
    #[case("<!-- just a comment -->", None)]
    #[case("<!-- Meta", None)]
    #[case("<!", None)]
    fn recognises_opener(#[case] input: &str, #[case] expected: Option<usize>) {
        assert_eq!(open_len(input.as_bytes()), expected);
    }

    #[rstest]
    #[case("reads: 3", Some((Property::Reads, 5)))]
    #[case("read: 2017-01-01 10:00:00", Some((Property::Read, 4)))]
    #[case("scope : 1y0m0d0h0m", Some((Property::Scope, 5)))]
    #[case("readme: x", None)]
    #[case("colour: red", None)]
    #[case("tags", None)]
    fn matches_property_names(#[case] input: &str, #[case] expected: Option<(Property, usize)>) {
        assert_eq!(property_name(input), expected);
    }

    #[test]
    fn every_property_name_round_trips() {
        for property in Property::ALL {
            let input = format!("{}: value", property.name());
            assert_eq!(
                property_name(&input),
                Some((property, property.name().len()))
            );
        }
    }
}
