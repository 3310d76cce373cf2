use super::node::DocumentNode;

/// Flatten a document to its plain text.
///
/// A node with non-empty text contributes that text and nothing else;
/// otherwise its children are concatenated in order with no separator.
/// Total and pure: the same tree always yields the same string.
pub fn extract(node: &DocumentNode) -> String {
    let mut out = String::new();
    let mut stack = vec![node];

    while let Some(node) = stack.pop() {
        match node.text_content() {
            Some(text) if !text.is_empty() => out.push_str(text),
            _ => stack.extend(node.children().iter().rev()),
        }
    }

    out
}

/// Shorten extracted text for listings.
///
/// Cuts at `max_chars` characters (never inside a UTF-8 sequence) and marks
/// the cut with an ellipsis. Text that already fits is returned unchanged.
pub fn preview(raw_text: &str, max_chars: usize) -> String {
    match raw_text.char_indices().nth(max_chars) {
        None => raw_text.to_string(),
        Some((cut, _)) => {
            let mut short = raw_text[..cut].trim_end().to_string();
            short.push('…');
            short
        }
    }
}
