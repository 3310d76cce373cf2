use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::DocumentNode;
use super::validate::validate;
use super::ContentError;

/// Serialized form of a document as handed to storage.
///
/// Compact editor JSON. Storage treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blob(String);

impl Blob {
    pub fn from_json(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

pub fn store(node: &DocumentNode) -> Blob {
    Blob(node.to_value().to_string())
}

/// Rebuild a document from storage; `load(&store(t)) == t`.
///
/// The blob goes back through validation, so a corrupted row surfaces as
/// an error instead of a malformed tree.
pub fn load(blob: &Blob) -> Result<DocumentNode, ContentError> {
    let value = parse_json(blob.as_str())?;
    Ok(validate(&value)?)
}

/// Parse JSON text without serde_json's default nesting limit of 128.
///
/// Stored documents may nest deeper than that. Parsing still recurses on
/// the call stack, so this is for our own rows and local files; request
/// bodies should go through the HTTP layer's bounded parser.
pub fn parse_json(json: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}
