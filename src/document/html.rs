//! HTML fragment to document tree.
//!
//! Rich-text editors hand over HTML fragments such as
//! `<p class="ql-align-center"><strong>Hi</strong></p>`. Every element keeps
//! its tag, its `class` tokens and its `style` attribute; text nodes are kept
//! verbatim, entities decoded. Comments are dropped.
//!
//! Parsing never fails: malformed markup is repaired the way browsers repair
//! it.

use scraper::{ElementRef, Html, Node};

use super::types::{DocumentNode, Element};

/// Parse an HTML fragment into a root `div` holding its top-level nodes.
pub fn parse(html: &str) -> DocumentNode {
    let fragment = Html::parse_fragment(html);
    DocumentNode::Element(Element {
        children: convert_children(fragment.root_element()),
        ..Element::new("div")
    })
}

fn convert_children(parent: ElementRef<'_>) -> Vec<DocumentNode> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(DocumentNode::text(&**text)),
            Node::Element(_) => ElementRef::wrap(child).map(convert_element),
            _ => None,
        })
        .collect()
}

fn convert_element(node: ElementRef<'_>) -> DocumentNode {
    let value = node.value();
    let mut element = Element::new(value.name());
    element.classes = value.classes().map(str::to_owned).collect();
    if let Some(style) = value.attr("style") {
        element.style = style.to_string();
    }
    element.children = convert_children(node);
    element.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{CLASS_ALIGN_CENTER, ElementKind};
    use crate::encoder::Encoder;

    fn root_children(node: DocumentNode) -> Vec<DocumentNode> {
        match node {
            DocumentNode::Element(root) => root.children,
            DocumentNode::Text { .. } => panic!("expected root element"),
        }
    }

    fn printed(html: &str) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.document(&parse(html));
        enc.take()
    }

    #[test]
    fn test_paragraph_tree() {
        let children = root_children(parse("<p>hello <b>world</b></p>"));
        let expected: DocumentNode = Element::new("p")
            .text("hello ")
            .child(Element::new("b").text("world"))
            .into();
        assert_eq!(children, vec![expected]);
    }

    #[test]
    fn test_class_and_style_carried() {
        let children = root_children(parse(
            r#"<p class="ql-align-center extra"><span style="background-color: rgb(0, 0, 0);">x</span></p>"#,
        ));
        let DocumentNode::Element(p) = &children[0] else {
            panic!("expected element");
        };
        assert_eq!(p.classes, vec![CLASS_ALIGN_CENTER.to_string(), "extra".to_string()]);
        let DocumentNode::Element(span) = &p.children[0] else {
            panic!("expected element");
        };
        assert_eq!(span.tag, ElementKind::Other("span".into()));
        assert!(span.is_highlighted());
    }

    #[test]
    fn test_uppercase_tags() {
        assert_eq!(printed("<P><STRONG>x</STRONG></P>"), b"\x1B\x45\x01x\x1B\x45\x00\n");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(printed("<p>fish &amp; chips</p>"), b"fish & chips\n");
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(printed("<p>a<!-- note -->b</p>"), b"ab\n");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(printed("<p>line1<br>line2</p>"), b"line1\nline2\n");
    }

    #[test]
    fn test_bare_text() {
        assert_eq!(printed("just text"), b"just text");
    }

    #[test]
    fn test_empty_input() {
        assert!(root_children(parse("")).is_empty());
    }
}
