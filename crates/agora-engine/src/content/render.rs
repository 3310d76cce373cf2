use std::slice;

use super::node::{DocumentNode, Mark, MarkKind};

/// Presentation tree produced from a document.
///
/// Front ends map these primitives onto their own widgets; [`Element::to_html`]
/// is the web mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Paragraph(Vec<Element>),
    Heading(Vec<Element>),
    /// Generic block for unrecognized node kinds.
    Block(Vec<Element>),
    Span(String),
    Bold(Box<Element>),
    Italic(Box<Element>),
    Strike(Box<Element>),
}

impl Element {
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Paragraph(children) | Element::Heading(children) | Element::Block(children) => {
                children
            }
            Element::Bold(inner) | Element::Italic(inner) | Element::Strike(inner) => {
                slice::from_ref(&**inner)
            }
            Element::Span(_) => &[],
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Element::Paragraph(_) => "p",
            Element::Heading(_) => "h1",
            Element::Block(_) => "div",
            Element::Span(_) => "span",
            Element::Bold(_) => "b",
            Element::Italic(_) => "i",
            Element::Strike(_) => "del",
        }
    }

    /// Serialize to HTML, escaping all text.
    pub fn to_html(&self) -> String {
        enum Step<'e> {
            Open(&'e Element),
            Close(&'static str),
        }

        let mut html = String::new();
        let mut steps = vec![Step::Open(self)];

        while let Some(step) = steps.pop() {
            match step {
                Step::Close(tag) => {
                    html.push_str("</");
                    html.push_str(tag);
                    html.push('>');
                }
                Step::Open(element) => {
                    let tag = element.tag();
                    html.push('<');
                    html.push_str(tag);
                    html.push('>');
                    steps.push(Step::Close(tag));
                    match element {
                        Element::Span(text) => html.push_str(&html_escape::encode_text(text)),
                        _ => steps.extend(element.children().iter().rev().map(Step::Open)),
                    }
                }
            }
        }

        html
    }
}

/// Map a document onto presentation primitives.
///
/// Paragraphs, headings and text have dedicated elements; every other kind
/// (including a missing one) becomes a generic block around its children.
pub fn render(node: &DocumentNode) -> Element {
    node.fold(|node, children| match node {
        DocumentNode::Paragraph { .. } => Element::Paragraph(children),
        DocumentNode::Heading { .. } => Element::Heading(children),
        DocumentNode::Text { text, marks, .. } => {
            let span = Element::Span(text.clone());
            if marks.is_empty() {
                span
            } else {
                apply_marks(marks, span)
            }
        }
        DocumentNode::Generic { .. } => Element::Block(children),
    })
}

pub fn render_html(node: &DocumentNode) -> String {
    render(node).to_html()
}

/// Wrap `inner` in the elements for `marks`.
///
/// The first mark becomes the outermost wrapper and the last one the
/// innermost. Marks we do not render are skipped; the content they
/// annotate is kept.
pub fn apply_marks(marks: &[Mark], inner: Element) -> Element {
    marks.iter().rev().fold(inner, |element, mark| match mark.kind {
        MarkKind::Bold => Element::Bold(Box::new(element)),
        MarkKind::Italic => Element::Italic(Box::new(element)),
        MarkKind::Strike => Element::Strike(Box::new(element)),
        MarkKind::Other(_) => element,
    })
}
