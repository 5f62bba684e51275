//! A minimal in-memory node tree.

use std::fmt::Write;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A node of the headless document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(ElementNode),
    /// A text node.
    Text(String),
    /// A comment.
    Comment(String),
}

impl Node {
    /// Creates a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the element if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => escape(text, false, out),
            Self::Comment(comment) => {
                let _ = write!(out, "<!--{comment}-->");
            }
            Self::Element(element) => element.write_html(out),
        }
    }

    pub(crate) fn write_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Comment(_) => {}
            Self::Element(element) => {
                for child in &element.children {
                    child.write_text(out);
                }
            }
        }
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl ElementNode {
    /// Creates an empty element. The tag is lowercased.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Reads an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Adds or replaces an attribute.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name, value.to_string()));
        }
    }

    /// Whether the `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Replaces every child with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::text(text));
        }
    }

    /// Concatenated descendant text.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_text(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"");
            escape(value, true, out);
            out.push('"');
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        if RAW_TEXT_ELEMENTS.contains(&self.tag.as_str()) {
            for child in &self.children {
                child.write_text(out);
            }
        } else {
            if matches!(self.tag.as_str(), "pre" | "textarea" | "listing")
                && matches!(self.children.first(), Some(Node::Text(text)) if text.starts_with('\n'))
            {
                out.push('\n');
            }
            for child in &self.children {
                child.write_html(out);
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Serializes a list of nodes.
#[must_use]
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Concatenated text of a list of nodes.
#[must_use]
pub fn text_of(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_text(&mut out);
    }
    out
}

/// Visits every element in pre-order, passing its position among elements.
///
/// An element's descendants are visited before the element itself is handed
/// to `visit`, so `visit` may replace its children without shifting the
/// positions of later elements.
pub(crate) fn walk_elements(
    nodes: &mut [Node],
    next: &mut usize,
    visit: &mut dyn FnMut(usize, &mut ElementNode),
) {
    for node in nodes {
        if let Node::Element(element) = node {
            let position = *next;
            *next += 1;
            walk_elements(&mut element.children, next, visit);
            visit(position, element);
        }
    }
}

/// Every element in pre-order.
pub(crate) fn elements(nodes: &[Node]) -> Vec<&ElementNode> {
    fn collect<'a>(nodes: &'a [Node], found: &mut Vec<&'a ElementNode>) {
        for node in nodes {
            if let Node::Element(element) = node {
                found.push(element);
                collect(&element.children, found);
            }
        }
    }

    let mut found = Vec::new();
    collect(nodes, &mut found);
    found
}

fn escape(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_elements() {
        let mut div = ElementNode::new("DIV");
        div.set_attribute("class", "a \"b\"");
        div.push(Node::text("1 < 2"));
        div.push(Node::Element(ElementNode::new("br")));
        assert_eq!(
            to_html(&[Node::Element(div)]),
            r#"<div class="a &quot;b&quot;">1 &lt; 2<br></div>"#
        );
    }

    #[test]
    fn raw_text_and_comments_are_not_escaped() {
        let mut style = ElementNode::new("style");
        style.push(Node::text("a > b { color: red }"));
        let nodes = [Node::Element(style), Node::Comment(" x ".to_string())];
        assert_eq!(to_html(&nodes), "<style>a > b { color: red }</style><!-- x -->");
        assert_eq!(text_of(&nodes), "a > b { color: red }");
    }

    #[test]
    fn walk_visits_descendants_before_parent() {
        let mut outer = ElementNode::new("div");
        outer.push(Node::Element(ElementNode::new("span")));
        let mut nodes = vec![Node::Element(outer), Node::Element(ElementNode::new("p"))];

        let mut seen = Vec::new();
        walk_elements(&mut nodes, &mut 0, &mut |position, element| {
            seen.push((position, element.tag().to_string()));
        });
        assert_eq!(seen, [(1, "span".to_string()), (0, "div".to_string()), (2, "p".to_string())]);
        assert_eq!(elements(&nodes).len(), 3);
    }

    #[test]
    fn set_text_replaces_children() {
        let mut div = ElementNode::new("div");
        div.push(Node::Element(ElementNode::new("span")));
        div.set_text("Hello");
        assert_eq!(div.children(), &[Node::text("Hello")]);
        assert_eq!(div.text_content(), "Hello");
    }
}
