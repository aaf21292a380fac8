use pretty_assertions::assert_eq;
use rstest::rstest;
use sectionmark_syntax::{OutlineTree, Property, parse, serialize};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.md"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}

#[rstest]
#[case("outline")]
#[case("post_declared")]
#[case("trailing_hashes")]
#[case("api_blueprint")]
#[case("code_blocks")]
#[case("bare_comma_tags")]
fn fixture_round_trips(#[case] name: &str) {
    let text = fixture(name);
    let document = parse(&text).unwrap();
    assert_eq!(serialize(&document), text);
}

#[test]
fn outline_fixture_structure() {
    let document = parse(&fixture("outline")).unwrap();

    let names: Vec<&str> = document.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec!["Thinking Notebook", "Ideas", "Parser rewrite", "Reading list"]
    );
    assert!(document.has_metadata);

    let tree = OutlineTree::build(&document.sections);
    assert_eq!(tree.children(0), &[1, 3]);
    assert_eq!(tree.parent(2), Some(1));

    let task = &document.sections[2].metadata;
    assert_eq!(task.type_label.as_deref(), Some("Task"));
    assert_eq!(task.scope.map(|s| s.relative_secs()), Some(30 * 86400));
    assert_eq!(task.links[1].url, "./ideas.md#parser");
    assert_eq!(
        task.properties(),
        &[Property::Type, Property::Deadline, Property::Scope, Property::Links]
    );
}

#[test]
fn post_declared_fixture_structure() {
    let document = parse(&fixture("post_declared")).unwrap();

    let depths: Vec<u32> = document.iter().map(|s| s.depth).collect();
    assert_eq!(depths, vec![0, 1, 1]);
    assert!(document.iter().all(|s| s.is_post_declared()));
    assert_eq!(document.sections[2].body, vec!["N2 text."]);
}

#[test]
fn api_blueprint_fixture_has_preamble() {
    let document = parse(&fixture("api_blueprint")).unwrap();

    let preamble = document.preamble().unwrap();
    assert_eq!(
        preamble.body,
        vec!["FORMAT: 1A", "HOST: https://api.example.com/", ""]
    );
    assert_eq!(document.outline_section().map(|s| s.name()), Some("Notes API"));
    assert_eq!(document.notes().count(), 2);
}

#[test]
fn code_blocks_fixture_ignores_fenced_headers() {
    let document = parse(&fixture("code_blocks")).unwrap();

    let names: Vec<&str> = document.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Snippets", "Rust"]);
}

#[test]
fn bare_comma_tags_fixture_structure() {
    let document = parse(&fixture("bare_comma_tags")).unwrap();

    let tags: Vec<Vec<&str>> = document
        .iter()
        .map(|s| s.metadata.tags.iter().map(|t| &**t).collect())
        .collect();
    assert_eq!(
        tags,
        vec![
            vec!["personal", "2018"],
            vec!["important", "later"],
            vec!["errands", "home", "weekly"],
        ]
    );
}
