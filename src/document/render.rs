//! Depth-first walk of a document tree into encoder calls.
//!
//! Every formatting "on" is paired with its "off" around the recursive call,
//! so nesting is balanced at any depth. Highlighting wraps outermost, around
//! the element's own formatting and alignment.

use super::types::{DocumentNode, Element, ElementKind};
use crate::encoder::Encoder;

/// Render one node and its subtree.
pub fn render(node: &DocumentNode, enc: &mut Encoder) {
    match node {
        DocumentNode::Text { text } => {
            enc.text(text);
        }
        DocumentNode::Element(element) => render_element(element, enc),
    }
}

fn render_children(element: &Element, enc: &mut Encoder) {
    for child in &element.children {
        render(child, enc);
    }
}

fn render_element(element: &Element, enc: &mut Encoder) {
    let highlighted = element.is_highlighted();
    if highlighted {
        enc.invert_on();
    }

    match &element.tag {
        ElementKind::Bold => {
            enc.bold_on();
            render_children(element, enc);
            enc.bold_off();
        }
        ElementKind::Underline => {
            enc.double_underline_on();
            render_children(element, enc);
            enc.double_underline_off();
        }
        ElementKind::Italic => {
            enc.underline_on();
            render_children(element, enc);
            enc.underline_off();
        }
        ElementKind::H1 | ElementKind::H2 | ElementKind::H3 => {
            let size = element.tag.heading_size().unwrap_or(1);
            aligned(element, enc, |enc| {
                enc.set_size(size).bold_on();
                render_children(element, enc);
                enc.bold_off().reset_size().text("\n");
            });
        }
        ElementKind::Paragraph => {
            aligned(element, enc, |enc| {
                render_children(element, enc);
                enc.text("\n");
            });
        }
        ElementKind::LineBreak => {
            enc.text("\n");
        }
        ElementKind::Mark | ElementKind::Other(_) => render_children(element, enc),
    }

    if highlighted {
        enc.invert_off();
    }
}

/// Wrap `body` in the element's alignment, returning to left afterwards.
fn aligned<F>(element: &Element, enc: &mut Encoder, body: F)
where
    F: FnOnce(&mut Encoder),
{
    match element.alignment() {
        Some(alignment) => {
            enc.align(alignment);
            body(enc);
            enc.align_left();
        }
        None => body(enc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{CLASS_ALIGN_CENTER, CLASS_ALIGN_RIGHT};

    fn bytes(node: impl Into<DocumentNode>) -> Vec<u8> {
        let mut enc = Encoder::new();
        render(&node.into(), &mut enc);
        enc.take()
    }

    fn p(child: impl Into<DocumentNode>) -> Element {
        Element::new("p").child(child)
    }

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(bytes(Element::new("p").text("hello")), b"hello\n");
    }

    #[test]
    fn test_bold() {
        assert_eq!(
            bytes(p(Element::new("strong").text("bold"))),
            b"\x1B\x45\x01bold\x1B\x45\x00\n"
        );
    }

    #[test]
    fn test_italic_is_single_underline() {
        assert_eq!(
            bytes(p(Element::new("em").text("it"))),
            b"\x1B\x2D\x01it\x1B\x2D\x00\n"
        );
    }

    #[test]
    fn test_u_is_double_underline() {
        assert_eq!(
            bytes(p(Element::new("u").text("underlined"))),
            b"\x1B\x2D\x02underlined\x1B\x2D\x00\n"
        );
    }

    #[test]
    fn test_mark_inverts() {
        assert_eq!(
            bytes(p(Element::new("mark").text("highlight"))),
            b"\x1D\x42\x01highlight\x1D\x42\x00\n"
        );
    }

    #[test]
    fn test_background_color_span_inverts() {
        let span = Element::new("span")
            .style("background-color: rgb(0, 0, 0);")
            .text("inverted");
        assert_eq!(bytes(p(span)), b"\x1D\x42\x01inverted\x1D\x42\x00\n");
    }

    #[test]
    fn test_invert_wraps_outermost() {
        let strong = Element::new("strong")
            .style("background-color: rgb(0, 0, 0);")
            .text("both");
        assert_eq!(
            bytes(p(strong)),
            b"\x1D\x42\x01\x1B\x45\x01both\x1B\x45\x00\x1D\x42\x00\n"
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            bytes(Element::new("h1").text("Title")),
            b"\x1D\x21\x33\x1B\x45\x01Title\x1B\x45\x00\x1D\x21\x00\n"
        );
        assert_eq!(
            bytes(Element::new("h2").text("Sub")),
            b"\x1D\x21\x22\x1B\x45\x01Sub\x1B\x45\x00\x1D\x21\x00\n"
        );
        assert_eq!(
            bytes(Element::new("h3").text("Small")),
            b"\x1D\x21\x11\x1B\x45\x01Small\x1B\x45\x00\x1D\x21\x00\n"
        );
    }

    #[test]
    fn test_br() {
        let para = Element::new("p")
            .text("line1")
            .child(Element::new("br"))
            .text("line2");
        assert_eq!(bytes(para), b"line1\nline2\n");
    }

    #[test]
    fn test_center_alignment() {
        let para = Element::new("p").class(CLASS_ALIGN_CENTER).text("centered");
        let out = bytes(para);
        assert_eq!(out, b"\x1B\x61\x01centered\n\x1B\x61\x00");
        assert_eq!(out.windows(3).filter(|w| *w == b"\x1B\x61\x01").count(), 1);
    }

    #[test]
    fn test_right_alignment() {
        let para = Element::new("p").class(CLASS_ALIGN_RIGHT).text("right");
        assert_eq!(bytes(para), b"\x1B\x61\x02right\n\x1B\x61\x00");
    }

    #[test]
    fn test_aligned_heading() {
        let h = Element::new("h2").class(CLASS_ALIGN_CENTER).text("T");
        assert_eq!(
            bytes(h),
            b"\x1B\x61\x01\x1D\x21\x22\x1B\x45\x01T\x1B\x45\x00\x1D\x21\x00\n\x1B\x61\x00"
        );
    }

    #[test]
    fn test_nested_formatting() {
        let nested = Element::new("strong").child(Element::new("u").text("bold underline"));
        assert_eq!(
            bytes(p(nested)),
            b"\x1B\x45\x01\x1B\x2D\x02bold underline\x1B\x2D\x00\x1B\x45\x00\n"
        );
    }

    #[test]
    fn test_unknown_element_passes_through() {
        let div = Element::new("div").child(Element::new("span").text("x"));
        assert_eq!(bytes(div), b"x");
    }

    #[test]
    fn test_text_is_cp1252() {
        assert_eq!(bytes(Element::new("p").text("Sautéed")), b"Saut\xE9ed\n");
    }
}
