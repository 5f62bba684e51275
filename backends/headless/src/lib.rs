#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

//! Headless backend for Elementa.
//!
//! Runs custom elements against an in-memory document instead of a browser:
//! templates are looked up in a [`HeadlessDocument`], fetches are answered from
//! a table of routes, and events are delivered to closures. Markup and CSS
//! selectors go through `html5ever` and `selectors` (via `scraper`), so
//! fragments parse the way a browser parses `innerHTML`.

mod document;
pub mod dom;
mod host;
pub mod markup;
mod registry;

pub use document::{HeadlessDocument, Responder};
pub use host::{HeadlessHost, HeadlessRoot};
pub use registry::HeadlessRegistry;

#[cfg(test)]
mod tests;
