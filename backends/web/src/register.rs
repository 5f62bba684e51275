//! Glue between `customElements.define` and [`ComponentBase`].
//!
//! Custom elements must be JavaScript classes extending `HTMLElement`, so a
//! small shim defines one class per tag and forwards its lifecycle callbacks
//! to an [`ElementHandle`] created by the Rust factory.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

use elementa_core::{
    ComponentBase, CustomEvent, Definition, ElementConfig, ElementDefinition, ElementError, Host,
    Registry, Render, define, resolve_template,
};
use js_sys::{Array, Reflect};
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsValue, prelude::*};
use web_sys::HtmlElement;

use crate::{error::dom_error, host::WebHost};

const INSTANCE_KEY: &str = "__elementaId";

#[wasm_bindgen(inline_js = r#"
export function define_element(tag, observed, factory) {
    const attributes = Array.from(observed);
    class ElementaElement extends HTMLElement {
        static get observedAttributes() { return attributes; }
        constructor() { super(); this.__elementa = factory(this); }
        connectedCallback() { this.__elementa?.connected(); }
        disconnectedCallback() { this.__elementa?.disconnected(); }
        attributeChangedCallback(name, oldValue, newValue) {
            this.__elementa?.attribute_changed(name, oldValue, newValue);
        }
        get data() { return this.__elementa ? JSON.parse(this.__elementa.data()) : null; }
        set data(value) { this.__elementa?.set_data(JSON.stringify(value ?? null)); }
        emit(name, detail) {
            return this.__elementa ? this.__elementa.emit(name, JSON.stringify(detail ?? null)) : true;
        }
    }
    customElements.define(tag, ElementaElement);
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn define_element(tag: &str, observed: Array, factory: &Factory) -> Result<(), JsValue>;
}

type Factory = Closure<dyn FnMut(HtmlElement) -> JsValue>;

thread_local! {
    static INSTANCES: RefCell<HashMap<u32, Weak<dyn Any>>> = RefCell::new(HashMap::new());
    static NEXT_ID: Cell<u32> = const { Cell::new(1) };
}

/// The browser's `customElements` registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebRegistry;

impl Registry for WebRegistry {
    type Constructor = Factory;

    fn is_defined(&self, tag: &str) -> bool {
        web_sys::window()
            .map(|window| window.custom_elements())
            .is_some_and(|registry| !registry.get(tag).is_undefined())
    }

    fn insert(&self, definition: ElementDefinition, factory: Factory) -> Result<(), ElementError> {
        let observed = definition
            .observed_attributes()
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect::<Array>();
        define_element(definition.tag(), observed, &factory).map_err(dom_error)?;
        // The class lives as long as the page.
        factory.forget();
        Ok(())
    }
}

/// Defines `E` in the browser's custom element registry.
///
/// Each element the browser creates gets its own [`ComponentBase`], built from
/// `E::default()` and the JSON in its `data-config` attribute, if any.
///
/// # Errors
///
/// Returns an error for invalid tag names or if the browser rejects the
/// definition. Defining the same tag twice only logs a warning.
pub fn register<E>() -> Result<Definition, ElementError>
where
    E: Render<WebHost> + Default,
    E::Data: Serialize + DeserializeOwned,
{
    let factory = Factory::new(|element: HtmlElement| {
        construct::<E>(element).map_or(JsValue::UNDEFINED, JsValue::from)
    });
    define::<E, _>(&WebRegistry, factory)
}

/// Returns the component behind `element`, if it was created by [`register`]
/// for `E`.
#[must_use]
pub fn instance<E: Render<WebHost>>(
    element: &HtmlElement,
) -> Option<Rc<RefCell<ComponentBase<E, WebHost>>>> {
    let id = Reflect::get(element, &JsValue::from_str(INSTANCE_KEY))
        .ok()?
        .as_f64()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let id = id as u32;
    let any = INSTANCES.with(|instances| instances.borrow().get(&id).and_then(Weak::upgrade))?;
    any.downcast::<RefCell<ComponentBase<E, WebHost>>>().ok()
}

fn construct<E>(element: HtmlElement) -> Option<ElementHandle>
where
    E: Render<WebHost> + Default,
    E::Data: Serialize + DeserializeOwned,
{
    let config = element
        .get_attribute("data-config")
        .map_or_else(|| Ok(ElementConfig::new()), |json| ElementConfig::from_json(&json))
        .unwrap_or_else(|err| {
            tracing::warn!(tag = E::TAG, error = %err, "ignoring invalid data-config");
            ElementConfig::new()
        });

    let base = ComponentBase::with_config(E::default(), WebHost::new(element.clone()), config)
        .map_err(|err| tracing::error!(tag = E::TAG, error = %err, "failed to construct element"))
        .ok()?;
    let base = Rc::new(RefCell::new(base));

    let id = allocate_id();
    INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        instances.retain(|_, weak| weak.strong_count() > 0);
        let any: Rc<dyn Any> = base.clone();
        instances.insert(id, Rc::downgrade(&any));
    });
    if let Err(err) = Reflect::set(&element, &JsValue::from_str(INSTANCE_KEY), &id.into()) {
        tracing::warn!(tag = E::TAG, error = ?err, "failed to tag element instance");
    }

    Some(ElementHandle {
        inner: Box::new(Instance(base)),
    })
}

fn allocate_id() -> u32 {
    NEXT_ID.with(|next| next.replace(next.get().wrapping_add(1)))
}

trait Lifecycle {
    fn connected(&self);
    fn disconnected(&self);
    fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>);
    fn set_data(&self, json: &str) -> Result<(), ElementError>;
    fn data(&self) -> Result<String, ElementError>;
    fn emit(&self, name: &str, detail: &str) -> Result<bool, ElementError>;
}

struct Instance<E: Render<WebHost>>(Rc<RefCell<ComponentBase<E, WebHost>>>);

impl<E> Lifecycle for Instance<E>
where
    E: Render<WebHost>,
    E::Data: Serialize + DeserializeOwned,
{
    fn connected(&self) {
        let (ticket, host, source) = {
            let mut base = self.0.borrow_mut();
            (base.begin_mount(), base.host().clone(), base.source().clone())
        };
        let base = Rc::clone(&self.0);

        wasm_bindgen_futures::spawn_local(async move {
            let mounted = match resolve_template(&host, &source).await {
                Ok(resolved) => base.borrow_mut().finish_mount(ticket, resolved).map(|_| ()),
                Err(err) => Err(err),
            };
            if let Err(err) = mounted {
                tracing::error!(tag = E::TAG, error = %err, "mount failed");
            }
        });
    }

    fn disconnected(&self) {
        self.0.borrow_mut().disconnected_callback();
    }

    fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        match self.0.try_borrow_mut() {
            Ok(mut base) => base.attribute_changed_callback(name, old, new),
            Err(_) => tracing::warn!(
                tag = E::TAG,
                name,
                "attribute changed while the element was busy, change dropped"
            ),
        }
    }

    fn set_data(&self, json: &str) -> Result<(), ElementError> {
        let data = serde_json::from_str(json)?;
        self.0
            .try_borrow_mut()
            .map_err(|_| ElementError::Dom(format!("<{}> is busy and cannot take data", E::TAG)))?
            .set_data(data)
    }

    fn data(&self) -> Result<String, ElementError> {
        Ok(serde_json::to_string(&self.0.borrow().data())?)
    }

    fn emit(&self, name: &str, detail: &str) -> Result<bool, ElementError> {
        let detail: serde_json::Value = serde_json::from_str(detail)?;
        let event = CustomEvent::new(name, detail)?;
        // Listeners run synchronously and may write `data` back.
        let host = self.0.borrow().host().clone();
        tracing::debug!(tag = E::TAG, event = name, "dispatching event");
        host.dispatch_event(&event)
    }
}

/// JavaScript-facing handle stored on every defined element.
#[wasm_bindgen]
pub struct ElementHandle {
    inner: Box<dyn Lifecycle>,
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle").finish_non_exhaustive()
    }
}

fn to_js(err: &ElementError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl ElementHandle {
    /// Forwards `connectedCallback`.
    pub fn connected(&self) {
        self.inner.connected();
    }

    /// Forwards `disconnectedCallback`.
    pub fn disconnected(&self) {
        self.inner.disconnected();
    }

    /// Forwards `attributeChangedCallback`.
    pub fn attribute_changed(&self, name: &str, old: Option<String>, new: Option<String>) {
        self.inner
            .attribute_changed(name, old.as_deref(), new.as_deref());
    }

    /// Stores JSON-encoded data and renders it.
    ///
    /// # Errors
    ///
    /// Throws if the JSON does not match the element's data type or the
    /// render fails.
    pub fn set_data(&self, json: &str) -> Result<(), JsValue> {
        self.inner.set_data(json).map_err(|err| to_js(&err))
    }

    /// The stored data as JSON, `null` before the first write.
    ///
    /// # Errors
    ///
    /// Throws if the data cannot be serialized.
    pub fn data(&self) -> Result<String, JsValue> {
        self.inner.data().map_err(|err| to_js(&err))
    }

    /// Dispatches a bubbling, composed event with a JSON-encoded payload.
    ///
    /// # Errors
    ///
    /// Throws if the payload is not valid JSON.
    pub fn emit(&self, name: &str, detail: &str) -> Result<bool, JsValue> {
        self.inner.emit(name, detail).map_err(|err| to_js(&err))
    }
}
