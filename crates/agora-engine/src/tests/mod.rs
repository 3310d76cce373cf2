use crate::content::{DocumentNode, Mark};
use tempfile::TempDir;

/// Create a temporary forum data directory
pub fn create_test_data_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// A chain of `depth - 1` paragraphs around a single text leaf
pub fn nested_paragraphs(depth: usize, leaf: &str) -> DocumentNode {
    let mut node = DocumentNode::text(leaf);
    for _ in 1..depth {
        node = DocumentNode::paragraph(vec![node]);
    }
    node
}

/// A small document touching every node kind and mark
pub fn sample_document() -> DocumentNode {
    DocumentNode::container(
        Some("doc"),
        vec![
            DocumentNode::heading(vec![DocumentNode::text("Welcome")]),
            DocumentNode::paragraph(vec![
                DocumentNode::text("This is "),
                DocumentNode::marked_text("very", vec![Mark::bold(), Mark::italic()]),
                DocumentNode::text(" "),
                DocumentNode::marked_text("old", vec![Mark::strike()]),
                DocumentNode::text(" news."),
            ]),
            DocumentNode::container(
                Some("bulletList"),
                vec![DocumentNode::container(
                    Some("listItem"),
                    vec![DocumentNode::paragraph(vec![DocumentNode::text("item")])],
                )],
            ),
        ],
    )
}

/// Run `test` on a thread with a 64 MiB stack
pub fn with_large_stack(test: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(test)
        .unwrap()
        .join()
        .unwrap();
}
