use elementa_core::{CustomEvent, ElementError, Fetch, FetchError, Host, ShadowMode};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CustomEventInit, Document, DocumentFragment, HtmlElement, HtmlTemplateElement, Response,
    ShadowRootInit, ShadowRootMode,
};

use crate::{
    dom::WebRoot,
    error::{WebError, dom_error},
};

/// A browser element instance, as handed to the element constructor.
#[derive(Debug, Clone)]
pub struct WebHost {
    element: HtmlElement,
}

impl WebHost {
    /// Wraps the element the browser created.
    #[must_use]
    pub const fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// The underlying element.
    #[must_use]
    pub const fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn document(&self) -> Result<Document, WebError> {
        self.element
            .owner_document()
            .or_else(|| web_sys::window().and_then(|window| window.document()))
            .ok_or(WebError::DomUnavailable)
    }

    fn clone_content(template: &HtmlTemplateElement) -> Result<DocumentFragment, ElementError> {
        template
            .content()
            .clone_node_with_deep(true)
            .map_err(dom_error)?
            .dyn_into::<DocumentFragment>()
            .map_err(|_| WebError::UnexpectedType("DocumentFragment").into())
    }
}

impl Fetch for WebHost {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(WebError::from)?
            .dyn_into::<Response>()
            .map_err(|_| WebError::UnexpectedType("Response"))?;

        if !response.ok() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.text().map_err(WebError::from)?;
        JsFuture::from(body)
            .await
            .map_err(WebError::from)?
            .as_string()
            .ok_or_else(|| WebError::UnexpectedType("text body").into())
    }
}

impl Host for WebHost {
    type Fragment = DocumentFragment;
    type Root = WebRoot;

    fn attach_root(&self, use_shadow: bool, mode: ShadowMode) -> Result<WebRoot, ElementError> {
        if !use_shadow {
            return Ok(WebRoot::Light(self.element.clone()));
        }
        let mode = match mode {
            ShadowMode::Open => ShadowRootMode::Open,
            ShadowMode::Closed => ShadowRootMode::Closed,
        };
        let root = self
            .element
            .attach_shadow(&ShadowRootInit::new(mode))
            .map_err(dom_error)?;
        Ok(WebRoot::Shadow(root))
    }

    fn template_by_id(&self, id: &str) -> Option<DocumentFragment> {
        let template = self
            .document()
            .ok()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlTemplateElement>()
            .ok()?;
        Self::clone_content(&template).ok()
    }

    fn parse_template(&self, markup: &str) -> Result<DocumentFragment, ElementError> {
        let template = self
            .document()?
            .create_element("template")
            .map_err(dom_error)?
            .dyn_into::<HtmlTemplateElement>()
            .map_err(|_| WebError::UnexpectedType("HTMLTemplateElement"))?;
        template.set_inner_html(markup);
        Self::clone_content(&template)
    }

    fn dispatch_event(&self, event: &CustomEvent) -> Result<bool, ElementError> {
        let detail = js_sys::JSON::parse(&serde_json::to_string(event.detail())?)
            .map_err(dom_error)?;

        let init = CustomEventInit::new();
        init.set_bubbles(event.bubbles());
        init.set_composed(event.composed());
        init.set_detail(&detail);

        let dom_event = web_sys::CustomEvent::new_with_event_init_dict(event.name(), &init)
            .map_err(dom_error)?;
        self.element
            .dispatch_event(&dom_event)
            .map_err(dom_error)
    }
}
