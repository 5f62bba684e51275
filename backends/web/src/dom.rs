use elementa_core::{ElementError, RenderRoot};
use wasm_bindgen::JsCast;
use web_sys::{DocumentFragment, Element, HtmlElement, Node, NodeList, ShadowRoot};

use crate::error::dom_error;

/// Render root of a browser element: its shadow root, or the element itself.
#[derive(Debug, Clone)]
pub enum WebRoot {
    /// An attached shadow root.
    Shadow(ShadowRoot),
    /// The element, when shadow isolation is disabled.
    Light(HtmlElement),
}

impl WebRoot {
    /// The root as a DOM node.
    #[must_use]
    pub fn node(&self) -> &Node {
        match self {
            Self::Shadow(root) => root,
            Self::Light(element) => element,
        }
    }

    /// Runs `querySelectorAll` on the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser rejects the selector.
    pub fn query_selector_all(&self, selector: &str) -> Result<NodeList, ElementError> {
        match self {
            Self::Shadow(root) => root.query_selector_all(selector),
            Self::Light(element) => element.query_selector_all(selector),
        }
        .map_err(dom_error)
    }

    fn for_each_element(
        &self,
        selector: &str,
        mut apply: impl FnMut(&Element) -> Result<(), ElementError>,
    ) -> Result<usize, ElementError> {
        let nodes = self.query_selector_all(selector)?;
        let mut count = 0;
        for index in 0..nodes.length() {
            if let Some(element) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) {
                apply(&element)?;
                count += 1;
            }
        }
        Ok(count)
    }
}

impl RenderRoot for WebRoot {
    type Fragment = DocumentFragment;

    fn clear(&mut self) -> Result<(), ElementError> {
        let node = self.node();
        while let Some(child) = node.first_child() {
            node.remove_child(&child).map_err(dom_error)?;
        }
        Ok(())
    }

    fn append(&mut self, fragment: DocumentFragment) -> Result<(), ElementError> {
        self.node().append_child(&fragment).map_err(dom_error)?;
        Ok(())
    }

    fn is_empty(&self) -> bool {
        !self.node().has_child_nodes()
    }

    fn inner_html(&self) -> String {
        match self {
            Self::Shadow(root) => root.inner_html(),
            Self::Light(element) => element.inner_html(),
        }
    }

    fn set_inner_html(&mut self, markup: &str) -> Result<(), ElementError> {
        match self {
            Self::Shadow(root) => root.set_inner_html(markup),
            Self::Light(element) => element.set_inner_html(markup),
        }
        Ok(())
    }

    fn text_content(&self) -> String {
        self.node().text_content().unwrap_or_default()
    }

    fn set_text(&mut self, selector: &str, text: &str) -> Result<usize, ElementError> {
        self.for_each_element(selector, |element| {
            element.set_text_content(Some(text));
            Ok(())
        })
    }

    fn set_attribute(
        &mut self,
        selector: &str,
        name: &str,
        value: &str,
    ) -> Result<usize, ElementError> {
        self.for_each_element(selector, |element| {
            element.set_attribute(name, value).map_err(dom_error)
        })
    }
}
