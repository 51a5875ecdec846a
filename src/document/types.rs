//! Node types for rich-text documents.
//!
//! All types derive `Serialize + Deserialize` so the same tree works for
//! Rust construction and JSON input.

use serde::{Deserialize, Deserializer, Serialize};

use crate::protocol::text::Alignment;

/// Class marking a block as centered.
pub const CLASS_ALIGN_CENTER: &str = "ql-align-center";

/// Class marking a block as right-aligned.
pub const CLASS_ALIGN_RIGHT: &str = "ql-align-right";

/// Inline style property that turns on white-on-black printing.
pub const STYLE_HIGHLIGHT: &str = "background-color";

/// Custom deserializer for `class`: accepts `"a b"` or `["a", "b"]`.
pub(crate) fn deserialize_class_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ClassValue {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match ClassValue::deserialize(deserializer)? {
        ClassValue::Joined(s) => s.split_whitespace().map(str::to_owned).collect(),
        ClassValue::List(list) => list,
    })
}

// ============================================================================
// ELEMENT KIND
// ============================================================================

/// What an element does when printed, resolved once from its tag name.
///
/// Tag names are matched case-insensitively. Anything unrecognized keeps its
/// (lowercased) name in [`ElementKind::Other`] and prints its children with
/// no formatting of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    /// `b`, `strong`
    Bold,
    /// `u`, printed with a 2-dot underline
    Underline,
    /// `i`, `em`; thermal fonts have no italic, so a 1-dot underline stands in
    Italic,
    H1,
    H2,
    H3,
    /// `p`
    Paragraph,
    /// `br`
    LineBreak,
    /// `mark`
    Mark,
    Other(String),
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "b" | "strong" => ElementKind::Bold,
            "u" => ElementKind::Underline,
            "i" | "em" => ElementKind::Italic,
            "h1" => ElementKind::H1,
            "h2" => ElementKind::H2,
            "h3" => ElementKind::H3,
            "p" => ElementKind::Paragraph,
            "br" => ElementKind::LineBreak,
            "mark" => ElementKind::Mark,
            _ => ElementKind::Other(tag),
        }
    }

    /// Canonical tag name.
    pub fn tag_name(&self) -> &str {
        match self {
            ElementKind::Bold => "strong",
            ElementKind::Underline => "u",
            ElementKind::Italic => "em",
            ElementKind::H1 => "h1",
            ElementKind::H2 => "h2",
            ElementKind::H3 => "h3",
            ElementKind::Paragraph => "p",
            ElementKind::LineBreak => "br",
            ElementKind::Mark => "mark",
            ElementKind::Other(name) => name,
        }
    }

    /// Character size multiplier for headings.
    pub fn heading_size(&self) -> Option<u8> {
        match self {
            ElementKind::H1 => Some(4),
            ElementKind::H2 => Some(3),
            ElementKind::H3 => Some(2),
            _ => None,
        }
    }

    /// Blocks end with a newline and honor alignment classes.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            ElementKind::H1 | ElementKind::H2 | ElementKind::H3 | ElementKind::Paragraph
        )
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        ElementKind::from_tag(&tag)
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        ElementKind::from_tag(tag)
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.tag_name().to_string()
    }
}

// ============================================================================
// NODES
// ============================================================================

/// One node of a document tree.
///
/// JSON form: `{"text": "..."}` for text, or
/// `{"tag": "p", "class": "...", "style": "...", "children": [...]}`.
/// Unknown keys are rejected in both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentNode {
    Text { text: String },
    Element(Element),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Text(TextRepr),
    Element(Element),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TextRepr {
    text: String,
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match NodeRepr::deserialize(deserializer)? {
            NodeRepr::Text(TextRepr { text }) => DocumentNode::Text { text },
            NodeRepr::Element(element) => DocumentNode::Element(element),
        })
    }
}

impl DocumentNode {
    pub fn text(s: impl Into<String>) -> Self {
        DocumentNode::Text { text: s.into() }
    }
}

impl From<Element> for DocumentNode {
    fn from(element: Element) -> Self {
        DocumentNode::Element(element)
    }
}

/// A tagged node with classes, inline style and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Element {
    pub tag: ElementKind,
    #[serde(
        default,
        rename = "class",
        deserialize_with = "deserialize_class_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub style: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl Element {
    pub fn new(tag: impl Into<ElementKind>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            style: String::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn child(mut self, node: impl Into<DocumentNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Shorthand for `child(DocumentNode::text(s))`.
    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(DocumentNode::text(s))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Printed white on black: `mark`, or any element with a background color.
    pub fn is_highlighted(&self) -> bool {
        self.tag == ElementKind::Mark
            || self.style.to_ascii_lowercase().contains(STYLE_HIGHLIGHT)
    }

    /// Alignment requested by a block's class list. Center wins over right.
    pub fn alignment(&self) -> Option<Alignment> {
        if !self.tag.is_block() {
            return None;
        }
        if self.has_class(CLASS_ALIGN_CENTER) {
            Some(Alignment::Center)
        } else if self.has_class(CLASS_ALIGN_RIGHT) {
            Some(Alignment::Right)
        } else {
            None
        }
    }
}
