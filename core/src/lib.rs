#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

//! Platform-agnostic core of Elementa.
//!
//! A custom element is a type implementing [`Element`] (identity, observed
//! attributes, lifecycle hooks) and [`Render`] (how `data` is painted into the
//! render root). [`ComponentBase`] owns one such element together with its
//! data and its render root, and turns the platform's lifecycle callbacks into
//! template injection and render calls.
//!
//! Everything that touches a real document goes through the [`Host`] trait,
//! so the same element runs against the browser backend and against the
//! in-memory headless backend used by the test-suite.

extern crate alloc;

pub mod component;
pub mod config;
pub mod element;
mod error;
pub mod event;
pub mod host;
pub mod registry;
pub mod template;
#[cfg(test)]
mod testing;

pub use component::{ComponentBase, MountState, MountTicket};
pub use config::{ElementConfig, ShadowMode};
pub use element::{Element, Render};
pub use error::{ElementError, FetchError};
pub use event::CustomEvent;
pub use host::{Fetch, Host, RenderRoot};
pub use registry::{Definition, ElementDefinition, Registry, define};
pub use template::{
    DEFAULT_TEMPLATE, Resolved, Template, TemplateOrigin, TemplateSource, resolve_template,
};
