//! The per-instance state machine behind every custom element.

use core::fmt;

use serde::Serialize;

use crate::{
    CustomEvent, ElementConfig, ElementError, Host, Render, RenderRoot, Resolved, TemplateSource,
    template::resolve_template,
};

/// Lifecycle of a [`ComponentBase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MountState {
    /// Created, never connected.
    #[default]
    Constructed,
    /// Connected; the template is being resolved.
    Mounting,
    /// The template is injected and at least one render happened.
    Rendered,
    /// Removed from the document.
    Disconnected,
}

/// Proof that a mount was started, handed back to
/// [`ComponentBase::finish_mount`].
///
/// Tickets from an older mount are rejected, which drops templates whose
/// fetch completed after the element was disconnected or reconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct MountTicket {
    generation: u64,
}

impl MountTicket {
    /// The mount generation this ticket belongs to.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Owns a custom element together with its data and render root.
///
/// The hosting platform drives it through the `*_callback` methods; element
/// code drives it through [`set_data`](Self::set_data) and
/// [`emit`](Self::emit).
pub struct ComponentBase<E: Render<H>, H: Host> {
    element: E,
    host: H,
    root: H::Root,
    data: Option<E::Data>,
    source: TemplateSource,
    use_shadow: bool,
    state: MountState,
    generation: u64,
    injected: bool,
    dirty: bool,
}

impl<E: Render<H>, H: Host> fmt::Debug for ComponentBase<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBase")
            .field("tag", &E::TAG)
            .field("source", &self.source)
            .field("use_shadow", &self.use_shadow)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<E: Render<H>, H: Host> ComponentBase<E, H> {
    /// Creates the base with an open shadow root and the element's own template.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to attach a shadow root.
    pub fn new(element: E, host: H) -> Result<Self, ElementError> {
        Self::with_config(element, host, ElementConfig::new())
    }

    /// Creates the base from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to attach a shadow root.
    pub fn with_config(element: E, host: H, config: ElementConfig) -> Result<Self, ElementError> {
        let use_shadow = config.uses_shadow();
        let root = host.attach_root(use_shadow, config.mode())?;
        let source = config
            .into_template()
            .unwrap_or_else(|| element.template());

        tracing::debug!(tag = E::TAG, use_shadow, ?source, "element constructed");

        Ok(Self {
            element,
            host,
            root,
            data: None,
            source,
            use_shadow,
            state: MountState::Constructed,
            generation: 0,
            injected: false,
            dirty: false,
        })
    }

    /// Tag name of the element.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        E::TAG
    }

    /// The wrapped element.
    #[must_use]
    pub const fn element(&self) -> &E {
        &self.element
    }

    /// Mutable access to the wrapped element.
    pub const fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// The platform host of this instance.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The render root (shadow root or the element itself).
    #[must_use]
    pub const fn root(&self) -> &H::Root {
        &self.root
    }

    /// The template source chosen at construction.
    #[must_use]
    pub const fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Whether the render root is a shadow root.
    #[must_use]
    pub const fn uses_shadow(&self) -> bool {
        self.use_shadow
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MountState {
        self.state
    }

    /// `true` when data was written but not rendered yet.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The last stored data, `None` before the first write.
    #[must_use]
    pub const fn data(&self) -> Option<&E::Data> {
        self.data.as_ref()
    }

    /// Mount entry point: resolves the template, injects it and renders.
    ///
    /// Template failures never surface here; they degrade to the default
    /// template. Only injection and render failures are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if injection or the element's render fails.
    pub async fn connected_callback(&mut self) -> Result<(), ElementError> {
        let ticket = self.begin_mount();
        let resolved = resolve_template(&self.host, &self.source).await?;
        self.finish_mount(ticket, resolved).map(|_| ())
    }

    /// First half of a mount, for hosts that cannot keep `self` borrowed
    /// across the template fetch.
    pub fn begin_mount(&mut self) -> MountTicket {
        self.generation += 1;
        self.state = MountState::Mounting;
        tracing::debug!(tag = E::TAG, generation = self.generation, "mounting");
        MountTicket {
            generation: self.generation,
        }
    }

    /// Second half of a mount: replaces the root's content with `resolved`
    /// and renders.
    ///
    /// Returns `false` without touching the root if `ticket` is stale.
    ///
    /// # Errors
    ///
    /// Returns an error if injection or the element's render fails.
    pub fn finish_mount(
        &mut self,
        ticket: MountTicket,
        resolved: Resolved<H::Fragment>,
    ) -> Result<bool, ElementError> {
        if ticket.generation != self.generation || self.state != MountState::Mounting {
            tracing::debug!(
                tag = E::TAG,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale template"
            );
            return Ok(false);
        }

        let origin = resolved.origin();
        self.root.clear()?;
        self.root.append(resolved.into_fragment())?;
        self.injected = true;
        self.state = MountState::Rendered;
        tracing::debug!(tag = E::TAG, ?origin, "template injected");

        self.element.connected();
        self.render()?;
        Ok(true)
    }

    /// Unmount entry point. Any mount still in flight becomes stale.
    pub fn disconnected_callback(&mut self) {
        self.generation += 1;
        self.state = MountState::Disconnected;
        tracing::debug!(tag = E::TAG, "disconnected");
        self.element.disconnected();
    }

    /// Attribute change entry point. Logs the change and forwards it to the
    /// element when `name` is observed.
    pub fn attribute_changed_callback(&mut self, name: &str, old: Option<&str>, new: Option<&str>) {
        if !E::observed_attributes().iter().any(|observed| *observed == name) {
            tracing::trace!(tag = E::TAG, name, "ignoring unobserved attribute");
            return;
        }
        tracing::debug!(tag = E::TAG, name, ?old, ?new, "attribute changed");
        self.element.attribute_changed(name, old, new);
    }

    /// Stores `data` and renders it immediately.
    ///
    /// Every write renders once; nothing is batched. Before the first mount
    /// the value is only stored, and the mount renders it.
    ///
    /// # Errors
    ///
    /// Returns an error if the element's render fails.
    pub fn set_data(&mut self, data: E::Data) -> Result<(), ElementError> {
        self.data = Some(data);
        self.dirty = true;
        if !self.injected {
            tracing::debug!(tag = E::TAG, "data stored, render deferred until mount");
            return Ok(());
        }
        self.render()
    }

    /// Like [`set_data`](Self::set_data) but skips the write and the render
    /// when `data` equals the stored value. Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the element's render fails.
    pub fn set_data_if_changed(&mut self, data: E::Data) -> Result<bool, ElementError>
    where
        E::Data: PartialEq,
    {
        if self.data.as_ref() == Some(&data) {
            return Ok(false);
        }
        self.set_data(data)?;
        Ok(true)
    }

    /// Clears the stored data without rendering.
    pub fn take_data(&mut self) -> Option<E::Data> {
        self.data.take()
    }

    /// Renders the current data into the render root.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::NotMounted`] before the first template
    /// injection, or the element's own render error.
    pub fn render(&mut self) -> Result<(), ElementError> {
        if !self.injected {
            return Err(ElementError::NotMounted { tag: E::TAG });
        }
        self.element.render(self.data.as_ref(), &mut self.root)?;
        self.dirty = false;
        Ok(())
    }

    /// Dispatches a bubbling, composed event named `name` carrying `detail`.
    ///
    /// Returns `false` if a listener cancelled the event.
    ///
    /// # Errors
    ///
    /// Returns an error if `detail` cannot be serialized or the host rejects
    /// the event.
    pub fn emit(&self, name: &str, detail: impl Serialize) -> Result<bool, ElementError> {
        let event = CustomEvent::new(name, detail)?;
        tracing::debug!(tag = E::TAG, event = name, "dispatching event");
        self.host.dispatch_event(&event)
    }
}
