use agora_engine::content::Element;
use agora_engine::forum::Comment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;

/// Lay out a rendered document as terminal lines.
///
/// Each paragraph, heading or block starts a new line; marks become
/// text modifiers. Headings are bold and underlined.
pub fn element_lines(element: &Element, indent: &str) -> Vec<Line<'static>> {
    enum Step<'e> {
        Visit(&'e Element, Modifier),
        EndBlock,
    }

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut steps = vec![Step::Visit(element, Modifier::empty())];

    while let Some(step) = steps.pop() {
        match step {
            Step::EndBlock => flush(&mut lines, &mut current, indent),
            Step::Visit(element, modifier) => match element {
                Element::Span(text) => {
                    current.push(Span::styled(
                        text.clone(),
                        Style::default().add_modifier(modifier),
                    ));
                }
                Element::Bold(inner) => steps.push(Step::Visit(inner, modifier | Modifier::BOLD)),
                Element::Italic(inner) => {
                    steps.push(Step::Visit(inner, modifier | Modifier::ITALIC))
                }
                Element::Strike(inner) => {
                    steps.push(Step::Visit(inner, modifier | Modifier::CROSSED_OUT))
                }
                Element::Paragraph(children) | Element::Block(children) | Element::Heading(children) => {
                    let modifier = if matches!(element, Element::Heading(_)) {
                        modifier | Modifier::BOLD | Modifier::UNDERLINED
                    } else {
                        modifier
                    };
                    flush(&mut lines, &mut current, indent);
                    steps.push(Step::EndBlock);
                    steps.extend(
                        children
                            .iter()
                            .rev()
                            .map(|child| Step::Visit(child, modifier)),
                    );
                }
            },
        }
    }
    flush(&mut lines, &mut current, indent);

    lines
}

fn flush(lines: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>, indent: &str) {
    if current.is_empty() {
        return;
    }
    let mut spans = Vec::with_capacity(current.len() + 1);
    if !indent.is_empty() {
        spans.push(Span::raw(indent.to_string()));
    }
    spans.append(current);
    lines.push(Line::from(spans));
}

/// How many replies deep each comment sits. Top-level comments are 0;
/// replies to a comment that is not in `comments` count as top level.
pub fn reply_depths(comments: &[Comment]) -> HashMap<String, usize> {
    let parents: HashMap<&str, Option<&str>> = comments
        .iter()
        .map(|comment| (comment.id.as_str(), comment.parent_comment_id.as_deref()))
        .collect();

    comments
        .iter()
        .map(|comment| {
            let mut depth = 0;
            let mut cursor = comment.parent_comment_id.as_deref();
            // Bounded by the number of comments so a parent cycle cannot spin
            while let Some(parent) = cursor
                && depth < comments.len()
                && let Some(next) = parents.get(parent)
            {
                depth += 1;
                cursor = *next;
            }
            (comment.id.clone(), depth)
        })
        .collect()
}
