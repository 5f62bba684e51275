#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]

#[doc(inline)]
pub use elementa_core::{
    ComponentBase, CustomEvent, DEFAULT_TEMPLATE, Definition, Element, ElementConfig,
    ElementDefinition, ElementError, Fetch, FetchError, Host, MountState, MountTicket, Registry,
    Render, RenderRoot, Resolved, ShadowMode, Template, TemplateOrigin, TemplateSource, define,
    resolve_template,
};
pub use elementa_core::{component, config, element, event, host, registry, template};

/// In-memory backend, for tests and non-browser hosts.
pub use elementa_headless as headless;

/// Browser backend.
#[cfg(target_arch = "wasm32")]
pub use elementa_web as web;

pub mod logging;

pub mod prelude {
    //! The traits and types needed to write an element.
    //!
    //! ```rust
    //! use elementa::prelude::*;
    //!
    //! #[derive(Default)]
    //! struct Greeting;
    //!
    //! impl Element for Greeting {
    //!     const TAG: &'static str = "hello-greeting";
    //!     type Data = String;
    //!
    //!     fn template(&self) -> TemplateSource {
    //!         TemplateSource::inline(r#"<p class="name"></p>"#)
    //!     }
    //! }
    //!
    //! impl<H: Host> Render<H> for Greeting {
    //!     fn render(&mut self, data: Option<&String>, root: &mut H::Root) -> Result<(), ElementError> {
    //!         root.set_text(".name", data.map_or("", String::as_str))?;
    //!         Ok(())
    //!     }
    //! }
    //! ```
    pub use super::{
        ComponentBase, CustomEvent, Element, ElementConfig, ElementError, Host, Render,
        RenderRoot, ShadowMode, TemplateSource,
    };
}
