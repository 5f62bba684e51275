//! Fragment parsing and selector matching, delegated to `html5ever` through
//! `scraper`.
//!
//! Markup is parsed the way a browser parses `innerHTML` in a `<body>`
//! context, so implied end tags, raw-text elements and character references
//! follow the HTML standard. The result is converted into the owned [`Node`]
//! tree the headless roots mutate.

use elementa_core::ElementError;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{self, ElementNode, Node};

/// Parses `markup` into a list of top-level nodes.
#[must_use]
pub fn parse_fragment(markup: &str) -> Vec<Node> {
    let parsed = Html::parse_fragment(markup);
    let mut nodes = Vec::new();
    convert_children(parsed.root_element(), &mut nodes);
    nodes
}

fn convert_children(parent: ElementRef<'_>, out: &mut Vec<Node>) {
    for child in parent.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let text: &str = text;
                out.push(Node::text(text));
            }
            scraper::Node::Comment(comment) => {
                let comment: &str = comment;
                out.push(Node::Comment(comment.to_string()));
            }
            scraper::Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    out.push(Node::Element(convert_element(element)));
                }
            }
            _ => {}
        }
    }
}

fn convert_element(source: ElementRef<'_>) -> ElementNode {
    let mut element = ElementNode::new(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attribute(name, value);
    }
    let mut children = Vec::new();
    convert_children(source, &mut children);
    for child in children {
        element.push(child);
    }
    element
}

/// Pre-order positions of the elements in `nodes` that match `selector`.
///
/// Positions count elements only, in the order [`dom::walk_elements`] visits
/// them.
pub(crate) fn matching_positions(
    nodes: &[Node],
    selector: &str,
) -> Result<Vec<usize>, ElementError> {
    let compiled = Selector::parse(selector)
        .map_err(|err| ElementError::Dom(format!("invalid selector `{selector}`: {err}")))?;
    let parsed = Html::parse_fragment(&dom::to_html(nodes));

    Ok(parsed
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .skip(1)
        .enumerate()
        .filter(|(_, element)| compiled.matches(element))
        .map(|(position, _)| position)
        .collect())
}
