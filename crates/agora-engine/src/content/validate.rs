//! Structural validation of untrusted document JSON.
//!
//! Every field of a node is optional; only type mismatches are rejected.
//! Traversal runs on an explicit stack so hostile nesting depth cannot
//! exhaust the call stack.

use serde_json::Value;
use std::fmt::{self, Write};
use std::iter::Enumerate;
use std::slice;

use super::node::{Attrs, DocumentNode, Mark, MarkKind, NodeKind};

/// Stop collecting after this many problems; the input is clearly broken.
pub const MAX_REPORTED_VIOLATIONS: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Maximum nesting depth, counting the root as 1. `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl ValidationOptions {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViolationKind {
    #[error("expected a node object, found {0}")]
    NotAnObject(&'static str),
    #[error("`{field}` must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected a mark object, found {0}")]
    MarkNotAnObject(&'static str),
    #[error("mark has no `type`")]
    MissingMarkType,
}

/// A single schema problem, located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.kind)
    }
}

/// Input does not have the recursive document shape.
///
/// Always holds at least one violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document: {}", summarize(.violations))]
pub struct SchemaViolation {
    violations: Vec<Violation>,
}

impl SchemaViolation {
    fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// Why [`validate_with`] refused a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    /// Well-formed, but nested deeper than the caller allows.
    #[error("document nests deeper than the limit of {max_depth}")]
    TooDeep { max_depth: usize },
}

fn summarize(violations: &[Violation]) -> String {
    match violations {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Check `value` against the document schema and build the typed tree.
///
/// Accepts any nesting depth. Reports every violation found (up to
/// [`MAX_REPORTED_VIOLATIONS`]) rather than stopping at the first one.
/// Fields that have no meaning for a recognized kind (`text` on a
/// paragraph, `content` on a text node) are checked, then dropped from the
/// typed tree.
pub fn validate(value: &Value) -> Result<DocumentNode, SchemaViolation> {
    let mut violations = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut current = Frame::open(value, None, &stack, &mut violations);

    loop {
        if violations.len() >= MAX_REPORTED_VIOLATIONS {
            violations.truncate(MAX_REPORTED_VIOLATIONS);
            return Err(SchemaViolation::new(violations));
        }

        if let Some((index, child)) = current.pending.next() {
            stack.push(current);
            current = Frame::open(child, Some(index), &stack, &mut violations);
            continue;
        }

        let node = current.finish();
        match stack.pop() {
            Some(mut parent) => {
                parent.children.push(node);
                current = parent;
            }
            None if violations.is_empty() => {
                log::debug!("validated document of depth {}", node.depth());
                return Ok(node);
            }
            None => return Err(SchemaViolation::new(violations)),
        }
    }
}

/// [`validate`] with caller limits applied first.
///
/// A depth limit breach is its own error, separate from schema problems.
/// `max_depth` counts the root as 1, so a limit of 0 refuses everything.
pub fn validate_with(
    value: &Value,
    options: &ValidationOptions,
) -> Result<DocumentNode, ValidationError> {
    if let Some(max_depth) = options.max_depth
        && exceeds_depth(value, max_depth)
    {
        log::debug!("document refused: deeper than {max_depth}");
        return Err(ValidationError::TooDeep { max_depth });
    }
    Ok(validate(value)?)
}

/// Whether any node sits below `max_depth`. Only follows `content` arrays;
/// their shape is left to [`validate`].
fn exceeds_depth(value: &Value, max_depth: usize) -> bool {
    let mut pending = vec![(value, 1usize)];
    while let Some((node, depth)) = pending.pop() {
        if depth > max_depth {
            return true;
        }
        if let Some(children) = node.get("content").and_then(Value::as_array) {
            pending.extend(children.iter().map(|child| (child, depth + 1)));
        }
    }
    false
}

/// Fields of a node other than its children, already type-checked.
#[derive(Default)]
struct Header {
    kind: Option<String>,
    text: Option<String>,
    marks: Vec<Mark>,
    attrs: Attrs,
}

struct Frame<'a> {
    index: Option<usize>,
    header: Header,
    pending: Enumerate<slice::Iter<'a, Value>>,
    children: Vec<DocumentNode>,
}

impl<'a> Frame<'a> {
    /// Read the non-recursive part of `value`, recording problems.
    fn open(
        value: &'a Value,
        index: Option<usize>,
        ancestors: &[Frame<'a>],
        violations: &mut Vec<Violation>,
    ) -> Self {
        let mut frame = Frame {
            index,
            header: Header::default(),
            pending: <&[Value]>::default().iter().enumerate(),
            children: Vec::new(),
        };

        let Some(object) = value.as_object() else {
            violations.push(Violation {
                path: pointer(ancestors, index),
                kind: ViolationKind::NotAnObject(json_type(value)),
            });
            return frame;
        };

        let mut report = |suffix: &str, kind: ViolationKind| {
            violations.push(Violation {
                path: format!("{}{suffix}", pointer(ancestors, index)),
                kind,
            });
        };

        match object.get("type") {
            None => {}
            Some(Value::String(kind)) => frame.header.kind = Some(kind.clone()),
            Some(other) => report("/type", wrong_type("type", "a string", other)),
        }

        match object.get("text") {
            None => {}
            Some(Value::String(text)) => frame.header.text = Some(text.clone()),
            Some(other) => report("/text", wrong_type("text", "a string", other)),
        }

        match object.get("attrs") {
            None => {}
            Some(Value::Object(attrs)) => frame.header.attrs = attrs.clone(),
            Some(other) => report("/attrs", wrong_type("attrs", "an object", other)),
        }

        match object.get("marks") {
            None => {}
            Some(Value::Array(items)) => {
                frame.header.marks = read_marks(items, &mut report);
            }
            Some(other) => report("/marks", wrong_type("marks", "an array", other)),
        }

        match object.get("content") {
            None => {}
            Some(Value::Array(items)) => {
                frame.pending = items.iter().enumerate();
                frame.children.reserve(items.len());
            }
            Some(other) => report("/content", wrong_type("content", "an array", other)),
        }

        frame
    }

    fn finish(self) -> DocumentNode {
        let Header {
            kind,
            text,
            marks,
            attrs,
        } = self.header;
        let children = self.children;

        match NodeKind::classify(kind.as_deref()) {
            NodeKind::Paragraph => DocumentNode::Paragraph { children, attrs },
            NodeKind::Heading => DocumentNode::Heading { children, attrs },
            NodeKind::Text => DocumentNode::Text {
                text: text.unwrap_or_default(),
                marks,
                attrs,
            },
            NodeKind::Generic => DocumentNode::Generic {
                kind,
                text,
                children,
                attrs,
            },
        }
    }
}

fn read_marks(items: &[Value], report: &mut impl FnMut(&str, ViolationKind)) -> Vec<Mark> {
    let mut marks = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            report(
                &format!("/marks/{i}"),
                ViolationKind::MarkNotAnObject(json_type(item)),
            );
            continue;
        };

        let kind = match object.get("type") {
            Some(Value::String(name)) => Some(MarkKind::from_type(name)),
            None => {
                report(&format!("/marks/{i}"), ViolationKind::MissingMarkType);
                None
            }
            Some(other) => {
                report(
                    &format!("/marks/{i}/type"),
                    wrong_type("type", "a string", other),
                );
                None
            }
        };

        let attrs = match object.get("attrs") {
            None => Some(Attrs::new()),
            Some(Value::Object(attrs)) => Some(attrs.clone()),
            Some(other) => {
                report(
                    &format!("/marks/{i}/attrs"),
                    wrong_type("attrs", "an object", other),
                );
                None
            }
        };

        if let (Some(kind), Some(attrs)) = (kind, attrs) {
            marks.push(Mark { kind, attrs });
        }
    }
    marks
}

/// JSON pointer of the node at `index` below `ancestors`.
fn pointer(ancestors: &[Frame<'_>], index: Option<usize>) -> String {
    let mut path = String::new();
    for i in ancestors.iter().filter_map(|frame| frame.index).chain(index) {
        // Writing to a String cannot fail.
        let _ = write!(path, "/content/{i}");
    }
    path
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> ViolationKind {
    ViolationKind::WrongType {
        field,
        expected,
        found: json_type(found),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
