//! Markdown to document tree.
//!
//! | Markdown | Node |
//! |----------|------|
//! | paragraph | `p` |
//! | `#`, `##`, `###` (deeper clamps to `###`) | `h1`, `h2`, `h3` |
//! | `**strong**` / `*em*` | `strong` / `em` |
//! | hard break | `br` |
//! | soft break | a space |
//! | `` `code` ``, links | their text |
//! | list item | `p` starting with `* ` or `N. ` |
//!
//! Heading attributes carry classes, so `# Title {.ql-align-center}` prints
//! centered.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::types::{DocumentNode, Element, ElementKind};

/// Parse Markdown into a root `div` holding the document's blocks.
pub fn parse(markdown: &str) -> DocumentNode {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(tag_end) => builder.end(tag_end),
            Event::Text(text) | Event::Code(text) => builder.push_text(&text),
            Event::SoftBreak => builder.push_text(" "),
            Event::HardBreak => builder.push_node(Element::new(ElementKind::LineBreak).into()),
            _ => {}
        }
    }
    builder.finish()
}

/// Where an open element came from; list items are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Root,
    Block,
    Inline,
    Item,
}

/// Internal state for turning the flat event stream into a tree.
struct TreeBuilder {
    stack: Vec<(Element, Origin)>,
    /// One entry per Start event: whether it opened an element.
    opened: Vec<bool>,
    /// `None` for bullet lists, the next number for ordered lists.
    lists: Vec<Option<u64>>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![(Element::new("div"), Origin::Root)],
            opened: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn top_origin(&self) -> Origin {
        self.stack.last().map_or(Origin::Root, |(_, origin)| *origin)
    }

    fn open(&mut self, element: Element, origin: Origin) {
        self.stack.push((element, origin));
        self.opened.push(true);
    }

    fn skip(&mut self) {
        self.opened.push(false);
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some((element, _)) = self.stack.pop() {
            self.push_node(element.into());
        }
    }

    fn push_node(&mut self, node: DocumentNode) {
        if let Some((parent, _)) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn push_text(&mut self, text: &str) {
        let Some((parent, _)) = self.stack.last_mut() else {
            return;
        };
        match parent.children.last_mut() {
            Some(DocumentNode::Text { text: last }) => last.push_str(text),
            _ => parent.children.push(DocumentNode::text(text)),
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {
                // Loose list items wrap their text in a paragraph; the item
                // already is one.
                if self.top_origin() == Origin::Item {
                    self.skip();
                } else {
                    self.open(Element::new(ElementKind::Paragraph), Origin::Block);
                }
            }
            Tag::Heading { level, classes, .. } => {
                let kind = match level {
                    HeadingLevel::H1 => ElementKind::H1,
                    HeadingLevel::H2 => ElementKind::H2,
                    _ => ElementKind::H3,
                };
                let mut heading = Element::new(kind);
                heading.classes = classes.iter().map(|c| c.to_string()).collect();
                self.open(heading, Origin::Block);
            }
            Tag::Strong => self.open(Element::new(ElementKind::Bold), Origin::Inline),
            Tag::Emphasis => self.open(Element::new(ElementKind::Italic), Origin::Inline),
            Tag::CodeBlock(_) => self.open(Element::new(ElementKind::Paragraph), Origin::Block),
            Tag::List(start) => {
                self.lists.push(start);
                self.skip();
            }
            Tag::Item => {
                // A nested list ends the parent item's line.
                if self.top_origin() == Origin::Item {
                    self.close();
                    if let Some(slot) = self.opened.iter_mut().rev().find(|o| **o) {
                        *slot = false;
                    }
                }

                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "* ".to_string(),
                };
                let item = Element::new(ElementKind::Paragraph).text(format!("{}{}", "  ".repeat(depth), marker));
                self.open(item, Origin::Item);
            }
            _ => self.skip(),
        }
    }

    fn end(&mut self, tag_end: TagEnd) {
        if let TagEnd::CodeBlock = tag_end {
            self.trim_trailing_newline();
        }
        if let TagEnd::List(_) = tag_end {
            self.lists.pop();
        }
        if self.opened.pop().unwrap_or(false) {
            self.close();
        }
    }

    /// Code block text ends with a newline the paragraph adds again.
    fn trim_trailing_newline(&mut self) {
        if let Some((block, _)) = self.stack.last_mut() {
            if let Some(DocumentNode::Text { text }) = block.children.last_mut() {
                if text.ends_with('\n') {
                    text.pop();
                }
            }
        }
    }

    fn finish(mut self) -> DocumentNode {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .map(|(root, _)| root.into())
            .unwrap_or_else(|| Element::new("div").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::CLASS_ALIGN_CENTER;
    use crate::encoder::Encoder;

    fn root_children(node: DocumentNode) -> Vec<DocumentNode> {
        match node {
            DocumentNode::Element(root) => root.children,
            DocumentNode::Text { .. } => panic!("expected root element"),
        }
    }

    fn printed(markdown: &str) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.document(&parse(markdown));
        enc.take()
    }

    #[test]
    fn test_paragraph() {
        let children = root_children(parse("Hello world"));
        assert_eq!(
            children,
            vec![Element::new("p").text("Hello world").into()]
        );
    }

    #[test]
    fn test_soft_break_is_space() {
        assert_eq!(printed("one\ntwo"), b"one two\n");
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(printed("one  \ntwo"), b"one\ntwo\n");
    }

    #[test]
    fn test_headings_clamp_to_h3() {
        let children = root_children(parse("# A\n\n#### D"));
        assert_eq!(
            children,
            vec![
                Element::new("h1").text("A").into(),
                Element::new("h3").text("D").into(),
            ]
        );
    }

    #[test]
    fn test_heading_attribute_class() {
        let children = root_children(parse("# Title {.ql-align-center}"));
        assert_eq!(
            children,
            vec![Element::new("h1").class(CLASS_ALIGN_CENTER).text("Title").into()]
        );
    }

    #[test]
    fn test_strong_and_emphasis() {
        assert_eq!(
            printed("**bold** and *it*"),
            b"\x1B\x45\x01bold\x1B\x45\x00 and \x1B\x2D\x01it\x1B\x2D\x00\n"
        );
    }

    #[test]
    fn test_inline_code_is_text() {
        assert_eq!(printed("run `ls` now"), b"run ls now\n");
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(printed("- eggs\n- milk"), b"* eggs\n* milk\n");
    }

    #[test]
    fn test_ordered_list_numbers() {
        assert_eq!(printed("3. three\n4. four"), b"3. three\n4. four\n");
    }

    #[test]
    fn test_loose_list_items_stay_single_paragraphs() {
        assert_eq!(printed("- a\n\n- b"), b"* a\n* b\n");
    }

    #[test]
    fn test_nested_list_is_flattened() {
        assert_eq!(printed("- a\n  - b\n- c"), b"* a\n  * b\n* c\n");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(printed("```\nx = 1\n```"), b"x = 1\n");
    }

    #[test]
    fn test_empty_input() {
        assert!(root_children(parse("")).is_empty());
    }
}
