//! Seams between the core and a concrete platform.

use alloc::string::String;
use core::future::Future;

use crate::{ElementError, FetchError, ShadowMode, event::CustomEvent};

/// Network collaborator used to load templates from a URL.
pub trait Fetch {
    /// Fetches `url` and returns the response body as text.
    ///
    /// Non-OK statuses must be reported as [`FetchError::Status`].
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// The subtree an element renders into: its shadow root, or the element itself.
pub trait RenderRoot {
    /// A detached piece of markup ready to be appended.
    type Fragment;

    /// Removes every child node.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to remove a node.
    fn clear(&mut self) -> Result<(), ElementError>;

    /// Appends a fragment after the current children.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to insert the fragment.
    fn append(&mut self, fragment: Self::Fragment) -> Result<(), ElementError>;

    /// Returns `true` when the root has no child nodes.
    fn is_empty(&self) -> bool;

    /// Serializes the children of the root.
    fn inner_html(&self) -> String;

    /// Replaces the children of the root with parsed `markup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot parse or insert the markup.
    fn set_inner_html(&mut self, markup: &str) -> Result<(), ElementError>;

    /// Concatenated text of every descendant text node.
    fn text_content(&self) -> String;

    /// Sets the text content of every element matching `selector`.
    ///
    /// Returns the number of elements updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is rejected by the platform.
    fn set_text(&mut self, selector: &str, text: &str) -> Result<usize, ElementError>;

    /// Sets an attribute on every element matching `selector`.
    ///
    /// Returns the number of elements updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector or the attribute name is rejected.
    fn set_attribute(
        &mut self,
        selector: &str,
        name: &str,
        value: &str,
    ) -> Result<usize, ElementError>;
}

/// The platform side of a single element instance.
///
/// A host wraps the element node the platform created, and exposes the few
/// document-level services the base needs.
pub trait Host: Fetch {
    /// Detached content produced by template lookups and parsing.
    type Fragment;
    /// The render root attached to this element.
    type Root: RenderRoot<Fragment = Self::Fragment>;

    /// Attaches a shadow root in `mode`, or returns the element itself as the
    /// render root when `use_shadow` is false.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to attach a shadow root
    /// (for example because one is already attached).
    fn attach_root(&self, use_shadow: bool, mode: ShadowMode) -> Result<Self::Root, ElementError>;

    /// Looks up a `<template>` element by id and returns a deep clone of its
    /// content. Missing ids and non-template elements yield `None`.
    fn template_by_id(&self, id: &str) -> Option<Self::Fragment>;

    /// Parses `markup` into a template container and returns a clone of its
    /// content.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot create the container.
    fn parse_template(&self, markup: &str) -> Result<Self::Fragment, ElementError>;

    /// Dispatches `event` with the element as target.
    ///
    /// Returns `false` if a listener cancelled the event.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the event.
    fn dispatch_event(&self, event: &CustomEvent) -> Result<bool, ElementError>;
}
