//! The traits a concrete custom element implements.

use crate::{ElementError, Host, TemplateSource};

/// Identity, template and lifecycle hooks of a custom element.
///
/// Every hook has a no-op default; only the tag name and the data type are
/// mandatory. Rendering lives in [`Render`], which has no default body, so an
/// element that forgets to render does not compile.
pub trait Element: Sized + 'static {
    /// The registered tag name, e.g. `user-card`.
    const TAG: &'static str;

    /// Payload stored by [`ComponentBase::set_data`](crate::ComponentBase::set_data).
    type Data;

    /// Where the initial markup comes from.
    fn template(&self) -> TemplateSource {
        TemplateSource::Default
    }

    /// Attribute names whose changes are forwarded to
    /// [`attribute_changed`](Element::attribute_changed).
    fn observed_attributes() -> &'static [&'static str] {
        &[]
    }

    /// Called once the template has been injected, right before the first render.
    fn connected(&mut self) {}

    /// Called when the element leaves the document.
    ///
    /// Release timers, subscriptions and other external resources here.
    fn disconnected(&mut self) {}

    /// Called when an observed attribute changes.
    fn attribute_changed(&mut self, name: &str, old: Option<&str>, new: Option<&str>) {
        let _ = (name, old, new);
    }
}

/// Paints an element's data into its render root.
///
/// Implementations read `data` and mutate `root` to reflect it, and must be
/// idempotent when called again with unchanged data.
pub trait Render<H: Host>: Element {
    /// Renders `data` into `root`. `data` is `None` until the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if a DOM operation fails.
    fn render(&mut self, data: Option<&Self::Data>, root: &mut H::Root)
    -> Result<(), ElementError>;
}
