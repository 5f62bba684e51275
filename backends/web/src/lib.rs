#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

//! Browser backend for Elementa.
//!
//! [`WebHost`] implements the core's `Host` over `web-sys`: shadow roots are
//! attached with `attachShadow`, templates are cloned from `<template>`
//! elements or fetched with `window.fetch`, and events are dispatched as
//! DOM `CustomEvent`s. [`register`] defines an element type in
//! `customElements` so the browser drives its lifecycle.
//!
//! This crate only does something useful on `wasm32-unknown-unknown`.

mod dom;
mod error;
mod host;
mod logging;
mod register;

pub use dom::WebRoot;
pub use error::WebError;
pub use host::WebHost;
pub use logging::install_logging;
pub use register::{ElementHandle, WebRegistry, instance, register};
