//! Behavioural guarantees of the document model, exercised through the
//! public API only.

use agora_engine::content::{
    self, ContentError, DocumentNode, Element, Mark, ValidationOptions, accept, extract, load,
    render, store, validate,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

/// A chain of `depth - 1` paragraphs around one text leaf, as editor JSON
fn nested(depth: usize, leaf: &str) -> Value {
    let mut node = DocumentNode::text(leaf);
    for _ in 1..depth {
        node = DocumentNode::paragraph(vec![node]);
    }
    node.to_value()
}

#[test]
fn test_store_then_load_is_identity() {
    // Given a document mixing every kind, unknown marks and attributes
    let value = json!({
        "type": "doc",
        "attrs": { "version": 3 },
        "content": [
            { "type": "heading", "attrs": { "level": 2 }, "content": [{ "type": "text", "text": "Title" }] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "a " },
                { "type": "text", "text": "link", "marks": [
                    { "type": "link", "attrs": { "href": "https://example.org" } },
                    { "type": "italic" }
                ] }
            ] },
            { "type": "horizontalRule" },
            {}
        ]
    });
    let document = validate(&value).unwrap();

    // When it goes through storage
    let loaded = load(&store(&document)).unwrap();

    // Then it comes back field for field, in order
    assert_eq!(loaded, document);
    assert_eq!(loaded.to_value(), document.to_value());
}

#[test]
fn test_extract_is_deterministic() {
    let document = validate(&json!({
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "two" }] }
        ]
    }))
    .unwrap();

    let first = extract(&document);
    let second = extract(&document);

    assert_eq!(first, "onetwo");
    assert_eq!(first, second);
}

#[test]
fn test_extract_concatenates_children_without_separator() {
    let first = DocumentNode::text("Hello, ");
    let second = DocumentNode::marked_text("world", vec![Mark::bold()]);
    let paragraph = DocumentNode::paragraph(vec![first.clone(), second.clone()]);

    assert_eq!(extract(&paragraph), extract(&first) + &extract(&second));
}

#[test]
fn test_empty_paragraph_needs_content() {
    let options = ValidationOptions::default();

    let empty = json!({ "type": "paragraph", "content": [] });
    assert_eq!(extract(&validate(&empty).unwrap()), "");
    assert!(matches!(
        accept(&empty, &options),
        Err(ContentError::EmptyContent)
    ));

    let hello = json!({ "type": "text", "text": "hello" });
    assert_eq!(accept(&hello, &options).unwrap().raw_text, "hello");
}

#[test]
fn test_first_mark_is_outermost() {
    let document = validate(&json!({
        "type": "text",
        "text": "x",
        "marks": [{ "type": "bold" }, { "type": "italic" }]
    }))
    .unwrap();

    let rendered = render(&document);

    assert_eq!(
        rendered,
        Element::Bold(Box::new(Element::Italic(Box::new(Element::Span(
            "x".to_string()
        )))))
    );
    assert_eq!(rendered.to_html(), "<b><i><span>x</span></i></b>");
}

#[test]
fn test_unknown_kind_renders_as_block() {
    let document = validate(&json!({
        "type": "blockquote",
        "content": [{ "type": "text", "text": "q" }]
    }))
    .unwrap();

    assert_eq!(
        render(&document),
        Element::Block(vec![Element::Span("q".to_string())])
    );
    assert_eq!(extract(&document), "q");
}

#[test]
fn test_depth_1000_validates_extracts_and_renders() {
    // Given a paragraph chain 1000 levels deep
    let value = nested(1000, "deepest");

    // When taking it through every traversal
    let document = validate(&value).unwrap();
    let text = extract(&document);
    let html = content::render_html(&document);

    // Then nothing overflowed or got truncated
    assert_eq!(document.depth(), 1000);
    assert_eq!(text, "deepest");
    assert_eq!(html.matches("deepest").count(), 1);
    assert_eq!(html.matches("<p>").count(), 999);
    assert_eq!(html.matches("</p>").count(), 999);
}

#[test]
fn test_schema_violation_reports_path() {
    let error = validate(&json!({
        "type": "doc",
        "content": [{ "type": "paragraph", "content": [{ "type": "text", "marks": [{}] }] }]
    }))
    .unwrap_err();

    let first = error.first().unwrap();
    assert_eq!(first.path, "/content/0/content/0/marks/0");
    assert!(error.to_string().starts_with("invalid document"));
}
