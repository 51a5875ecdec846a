//! # Rich-Text Documents
//!
//! A document is a tree of [`DocumentNode`]s: text leaves and tagged
//! elements with classes, an inline style and children. Trees come from
//! Rust construction, JSON, HTML fragments or Markdown, and all print the
//! same way.
//!
//! ```
//! use papelito::document::{DocumentNode, Element};
//! use papelito::encoder::Encoder;
//!
//! // Rust construction
//! let doc: DocumentNode = Element::new("h1").text("Groceries").into();
//!
//! // JSON
//! let same = DocumentNode::from_json(r#"{"tag": "h1", "children": [{"text": "Groceries"}]}"#)?;
//! assert_eq!(doc, same);
//!
//! let mut job = Encoder::new();
//! job.document(&doc);
//! assert_eq!(job.buffer()[..3], [0x1D, 0x21, 0x33]);
//! # Ok::<(), papelito::PapelitoError>(())
//! ```

pub mod html;
pub mod markdown;
pub mod render;
pub mod types;

pub use types::*;

use serde::Deserialize;

use crate::error::PapelitoError;

/// A JSON document is one node, or a list of top-level nodes.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Node(DocumentNode),
    Nodes(Vec<DocumentNode>),
}

impl DocumentNode {
    /// Parse a JSON document. A top-level array becomes the children of a
    /// `div` that prints nothing itself.
    pub fn from_json(json: &str) -> Result<Self, PapelitoError> {
        let doc: JsonDocument = serde_json::from_str(json)
            .map_err(|e| PapelitoError::Document(format!("Invalid JSON document: {}", e)))?;
        Ok(match doc {
            JsonDocument::Node(node) => node,
            JsonDocument::Nodes(children) => DocumentNode::Element(Element {
                children,
                ..Element::new("div")
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_array() {
        let doc = DocumentNode::from_json(r#"[{"tag": "p", "children": [{"text": "a"}]}, {"text": "b"}]"#)
            .unwrap();
        let expected: DocumentNode = Element::new("div")
            .child(Element::new("p").text("a"))
            .text("b")
            .into();
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DocumentNode::from_json(r#"{"tag": 5}"#).unwrap_err();
        assert!(matches!(err, PapelitoError::Document(_)));
    }

    #[test]
    fn test_from_json_heading_text_is_not_a_text_leaf() {
        let err = DocumentNode::from_json(r#"{"tag": "h1", "text": "T"}"#).unwrap_err();
        assert!(matches!(err, PapelitoError::Document(_)));
    }
}
