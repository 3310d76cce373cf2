use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::slice;

use super::validate::validate;

/// Opaque auxiliary attributes carried by nodes and marks.
///
/// Never interpreted by the content model; passed through unchanged.
pub type Attrs = Map<String, Value>;

/// Inline formatting kinds understood by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    Strike,
    /// Any mark the editor emits that we do not render (links, code, ...).
    Other(String),
}

impl MarkKind {
    pub fn from_type(name: &str) -> Self {
        match name {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "strike" => MarkKind::Strike,
            other => MarkKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Strike => "strike",
            MarkKind::Other(name) => name,
        }
    }
}

/// An inline formatting annotation attached to a text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub kind: MarkKind,
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn bold() -> Self {
        Self::new(MarkKind::Bold)
    }

    pub fn italic() -> Self {
        Self::new(MarkKind::Italic)
    }

    pub fn strike() -> Self {
        Self::new(MarkKind::Strike)
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".into(), Value::String(self.kind.as_str().to_string()));
        if !self.attrs.is_empty() {
            object.insert("attrs".into(), Value::Object(self.attrs.clone()));
        }
        Value::Object(object)
    }
}

/// The node kinds the content model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Paragraph,
    Text,
    Heading,
    /// Absent or unrecognized `type`.
    Generic,
}

impl NodeKind {
    pub fn classify(type_name: Option<&str>) -> Self {
        match type_name {
            Some("paragraph") => NodeKind::Paragraph,
            Some("text") => NodeKind::Text,
            Some("heading") => NodeKind::Heading,
            _ => NodeKind::Generic,
        }
    }
}

/// One node of a rich-text document tree.
///
/// Each variant only carries the fields that mean something for it, so a
/// heading with marks or a text node with children cannot be built. Nodes
/// exclusively own their children; trees are never mutated after
/// construction.
///
/// The JSON wire form is the editor's: `type`, `content`, `marks`, `text`
/// and `attrs`, all optional.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Paragraph {
        children: Vec<DocumentNode>,
        attrs: Attrs,
    },
    Text {
        text: String,
        marks: Vec<Mark>,
        attrs: Attrs,
    },
    Heading {
        children: Vec<DocumentNode>,
        attrs: Attrs,
    },
    /// Fallback container for absent or unrecognized kinds.
    ///
    /// `kind` is kept verbatim so the node serializes back to what the
    /// editor sent; it is never one of the recognized kinds.
    Generic {
        kind: Option<String>,
        text: Option<String>,
        children: Vec<DocumentNode>,
        attrs: Attrs,
    },
}

impl DocumentNode {
    pub fn paragraph(children: Vec<DocumentNode>) -> Self {
        DocumentNode::Paragraph {
            children,
            attrs: Attrs::new(),
        }
    }

    pub fn heading(children: Vec<DocumentNode>) -> Self {
        DocumentNode::Heading {
            children,
            attrs: Attrs::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::marked_text(text, Vec::new())
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        DocumentNode::Text {
            text: text.into(),
            marks,
            attrs: Attrs::new(),
        }
    }

    /// Build a container of an arbitrary kind.
    ///
    /// Recognized kind names produce the matching variant, so the result is
    /// the same tree validation would produce for that input.
    pub fn container(kind: Option<&str>, children: Vec<DocumentNode>) -> Self {
        match NodeKind::classify(kind) {
            NodeKind::Paragraph => Self::paragraph(children),
            NodeKind::Heading => Self::heading(children),
            NodeKind::Text => Self::text(""),
            NodeKind::Generic => DocumentNode::Generic {
                kind: kind.map(str::to_string),
                text: None,
                children,
                attrs: Attrs::new(),
            },
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        match self {
            DocumentNode::Paragraph { .. } => NodeKind::Paragraph,
            DocumentNode::Text { .. } => NodeKind::Text,
            DocumentNode::Heading { .. } => NodeKind::Heading,
            DocumentNode::Generic { .. } => NodeKind::Generic,
        }
    }

    /// The `type` string this node serializes with, if any.
    pub fn kind_name(&self) -> Option<&str> {
        match self {
            DocumentNode::Paragraph { .. } => Some("paragraph"),
            DocumentNode::Text { .. } => Some("text"),
            DocumentNode::Heading { .. } => Some("heading"),
            DocumentNode::Generic { kind, .. } => kind.as_deref(),
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            DocumentNode::Text { text, .. } => Some(text),
            DocumentNode::Generic { text, .. } => text.as_deref(),
            _ => None,
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Paragraph { children, .. }
            | DocumentNode::Heading { children, .. }
            | DocumentNode::Generic { children, .. } => children,
            DocumentNode::Text { .. } => &[],
        }
    }

    pub fn marks(&self) -> &[Mark] {
        match self {
            DocumentNode::Text { marks, .. } => marks,
            _ => &[],
        }
    }

    pub fn attrs(&self) -> &Attrs {
        match self {
            DocumentNode::Paragraph { attrs, .. }
            | DocumentNode::Text { attrs, .. }
            | DocumentNode::Heading { attrs, .. }
            | DocumentNode::Generic { attrs, .. } => attrs,
        }
    }

    /// Number of nodes on the longest root-to-leaf path (a lone node is 1).
    pub fn depth(&self) -> usize {
        self.fold(|_, child_depths: Vec<usize>| {
            1 + child_depths.into_iter().max().unwrap_or(0)
        })
    }

    /// Post-order fold over the tree.
    ///
    /// `combine` receives each node together with the folded values of its
    /// children, in order. Uses a heap-allocated work stack, so depth is
    /// bounded by memory rather than by the call stack.
    pub fn fold<T>(&self, mut combine: impl FnMut(&DocumentNode, Vec<T>) -> T) -> T {
        let mut stack: Vec<FoldFrame<'_, T>> = Vec::new();
        let mut current = FoldFrame::new(self);
        loop {
            if let Some(child) = current.pending.next() {
                stack.push(std::mem::replace(&mut current, FoldFrame::new(child)));
                continue;
            }
            let value = combine(current.node, current.done);
            match stack.pop() {
                Some(mut parent) => {
                    parent.done.push(value);
                    current = parent;
                }
                None => return value,
            }
        }
    }

    /// Convert to the editor's JSON shape.
    pub fn to_value(&self) -> Value {
        self.fold(|node, content: Vec<Value>| {
            let mut object = Map::new();
            if let Some(kind) = node.kind_name() {
                object.insert("type".into(), Value::String(kind.to_string()));
            }
            if !node.attrs().is_empty() {
                object.insert("attrs".into(), Value::Object(node.attrs().clone()));
            }
            if !node.marks().is_empty() {
                let marks = node.marks().iter().map(Mark::to_value).collect();
                object.insert("marks".into(), Value::Array(marks));
            }
            if let Some(text) = node.text_content() {
                object.insert("text".into(), Value::String(text.to_string()));
            }
            if !content.is_empty() {
                object.insert("content".into(), Value::Array(content));
            }
            Value::Object(object)
        })
    }
}

struct FoldFrame<'n, T> {
    node: &'n DocumentNode,
    pending: slice::Iter<'n, DocumentNode>,
    done: Vec<T>,
}

impl<'n, T> FoldFrame<'n, T> {
    fn new(node: &'n DocumentNode) -> Self {
        Self {
            node,
            pending: node.children().iter(),
            done: Vec::with_capacity(node.children().len()),
        }
    }
}

impl Serialize for DocumentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validate(&value).map_err(serde::de::Error::custom)
    }
}
