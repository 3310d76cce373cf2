//! Rich-text document model shared by posts and comments.
//!
//! Documents arrive as editor JSON, are checked once by [`validate`], and
//! from then on travel as typed [`DocumentNode`] trees. [`extract`] derives
//! the plain-text projection stored next to a document; [`render`] maps a
//! tree onto presentation primitives. All traversals use explicit stacks.

pub mod codec;
pub mod extract;
pub mod node;
pub mod render;
pub mod validate;

pub use codec::{Blob, load, parse_json, store};
pub use extract::{extract, preview};
pub use node::{Attrs, DocumentNode, Mark, MarkKind, NodeKind};
pub use render::{Element, apply_marks, render, render_html};
pub use validate::{
    SchemaViolation, ValidationError, ValidationOptions, Violation, ViolationKind, validate,
    validate_with,
};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error("content nests deeper than the limit of {max_depth}")]
    TooDeep { max_depth: usize },
    #[error("content required")]
    EmptyContent,
    #[error("malformed document JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<ValidationError> for ContentError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::Schema(violation) => ContentError::Schema(violation),
            ValidationError::TooDeep { max_depth } => ContentError::TooDeep { max_depth },
        }
    }
}

/// A document that passed the boundary checks, with its text projection.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedContent {
    pub document: DocumentNode,
    pub raw_text: String,
}

/// Boundary check for submitted content.
///
/// Validates the shape, then rejects documents with no extractable text.
pub fn accept(value: &Value, options: &ValidationOptions) -> Result<AcceptedContent, ContentError> {
    let document = validate_with(value, options)?;
    let raw_text = extract(&document);
    if raw_text.is_empty() {
        return Err(ContentError::EmptyContent);
    }
    log::debug!("accepted document with {} bytes of text", raw_text.len());
    Ok(AcceptedContent { document, raw_text })
}
