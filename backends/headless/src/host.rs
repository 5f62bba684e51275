use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use elementa_core::{
    CustomEvent, ElementError, Fetch, FetchError, Host, RenderRoot, ShadowMode,
};

use crate::{
    HeadlessDocument,
    document::Listener,
    dom::{self, ElementNode, Node},
    markup::{matching_positions, parse_fragment},
};

/// The headless counterpart of an element node created by the platform.
#[derive(Clone)]
pub struct HeadlessHost {
    document: HeadlessDocument,
    tag: String,
    nested: bool,
    shadow_attached: Rc<Cell<bool>>,
    listeners: Rc<RefCell<Vec<(String, Listener)>>>,
}

impl fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("tag", &self.tag)
            .field("nested", &self.nested)
            .field("shadow_attached", &self.shadow_attached.get())
            .finish_non_exhaustive()
    }
}

impl HeadlessHost {
    pub(crate) fn new(document: HeadlessDocument, tag: &str, nested: bool) -> Self {
        Self {
            document,
            tag: tag.to_ascii_lowercase(),
            nested,
            shadow_attached: Rc::new(Cell::new(false)),
            listeners: Rc::default(),
        }
    }

    /// The element's tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The owning document.
    #[must_use]
    pub const fn document(&self) -> &HeadlessDocument {
        &self.document
    }

    /// Listens for events named `name` dispatched on this element.
    pub fn add_event_listener(&self, name: &str, listener: impl Fn(&CustomEvent) + 'static) {
        self.listeners
            .borrow_mut()
            .push((name.to_string(), Rc::new(listener)));
    }

    fn own_listeners(&self, name: &str) -> Vec<Listener> {
        self.listeners
            .borrow()
            .iter()
            .filter(|(event, _)| event == name)
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

impl Fetch for HeadlessHost {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.document.fetch(url).await
    }
}

impl Host for HeadlessHost {
    type Fragment = Vec<Node>;
    type Root = HeadlessRoot;

    fn attach_root(&self, use_shadow: bool, mode: ShadowMode) -> Result<HeadlessRoot, ElementError> {
        if !use_shadow {
            return Ok(HeadlessRoot::new(None));
        }
        if self.shadow_attached.replace(true) {
            return Err(ElementError::Dom(format!(
                "<{}> already has a shadow root",
                self.tag
            )));
        }
        Ok(HeadlessRoot::new(Some(mode)))
    }

    fn template_by_id(&self, id: &str) -> Option<Vec<Node>> {
        self.document.template_content(id)
    }

    fn parse_template(&self, markup: &str) -> Result<Vec<Node>, ElementError> {
        Ok(parse_fragment(markup))
    }

    fn dispatch_event(&self, event: &CustomEvent) -> Result<bool, ElementError> {
        let mut listeners = self.own_listeners(event.name());
        if event.bubbles() && (event.composed() || !self.nested) {
            listeners.extend(self.document.listeners_for(event.name()));
        }
        tracing::trace!(event = event.name(), listeners = listeners.len(), "delivering event");
        for listener in listeners {
            listener(event);
        }
        Ok(true)
    }
}

/// The render root of a headless element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessRoot {
    shadow: Option<ShadowMode>,
    nodes: Vec<Node>,
}

impl HeadlessRoot {
    const fn new(shadow: Option<ShadowMode>) -> Self {
        Self {
            shadow,
            nodes: Vec::new(),
        }
    }

    /// The shadow root mode, or `None` when rendering into the element itself.
    #[must_use]
    pub const fn shadow_mode(&self) -> Option<ShadowMode> {
        self.shadow
    }

    /// Child nodes of the root.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every element matching the CSS `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if `selector` does not parse.
    pub fn query_all(&self, selector: &str) -> Result<Vec<&ElementNode>, ElementError> {
        let positions = matching_positions(&self.nodes, selector)?;
        let elements = dom::elements(&self.nodes);
        Ok(positions
            .into_iter()
            .filter_map(|position| elements.get(position).copied())
            .collect())
    }

    /// The first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if `selector` does not parse.
    pub fn query(&self, selector: &str) -> Result<Option<&ElementNode>, ElementError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    fn update(
        &mut self,
        selector: &str,
        mut apply: impl FnMut(&mut ElementNode),
    ) -> Result<usize, ElementError> {
        let positions = matching_positions(&self.nodes, selector)?;
        dom::walk_elements(&mut self.nodes, &mut 0, &mut |position, element| {
            if positions.binary_search(&position).is_ok() {
                apply(element);
            }
        });
        Ok(positions.len())
    }
}

impl RenderRoot for HeadlessRoot {
    type Fragment = Vec<Node>;

    fn clear(&mut self) -> Result<(), ElementError> {
        self.nodes.clear();
        Ok(())
    }

    fn append(&mut self, fragment: Vec<Node>) -> Result<(), ElementError> {
        self.nodes.extend(fragment);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn inner_html(&self) -> String {
        dom::to_html(&self.nodes)
    }

    fn set_inner_html(&mut self, markup: &str) -> Result<(), ElementError> {
        self.nodes = parse_fragment(markup);
        Ok(())
    }

    fn text_content(&self) -> String {
        dom::text_of(&self.nodes)
    }

    fn set_text(&mut self, selector: &str, text: &str) -> Result<usize, ElementError> {
        self.update(selector, |element| element.set_text(text))
    }

    fn set_attribute(
        &mut self,
        selector: &str,
        name: &str,
        value: &str,
    ) -> Result<usize, ElementError> {
        self.update(selector, |element| element.set_attribute(name, value))
    }
}
