//! Per-instance configuration.

use serde::{Deserialize, Serialize};

use crate::{ElementError, TemplateSource};

/// Encapsulation mode of an attached shadow root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowMode {
    /// The shadow root is reachable from outside through `element.shadowRoot`.
    #[default]
    Open,
    /// The shadow root is hidden from outside scripts.
    Closed,
}

/// Builder-style configuration for a [`ComponentBase`](crate::ComponentBase).
///
/// A template set here overrides the one returned by
/// [`Element::template`](crate::Element::template).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    use_shadow: bool,
    shadow_mode: ShadowMode,
    template: Option<TemplateSource>,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementConfig {
    /// Creates a configuration with an open shadow root and no template override.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            use_shadow: true,
            shadow_mode: ShadowMode::Open,
            template: None,
        }
    }

    /// Controls whether a shadow root is attached.
    #[must_use]
    pub const fn use_shadow(mut self, use_shadow: bool) -> Self {
        self.use_shadow = use_shadow;
        self
    }

    /// Sets the mode of the attached shadow root.
    #[must_use]
    pub const fn shadow_mode(mut self, mode: ShadowMode) -> Self {
        self.shadow_mode = mode;
        self
    }

    /// Overrides the element's template source.
    #[must_use]
    pub fn template(mut self, source: TemplateSource) -> Self {
        self.template = Some(source);
        self
    }

    /// Reads a configuration from JSON, e.g. the value of a `data-config` attribute.
    ///
    /// Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Serialize`] if `json` is malformed.
    pub fn from_json(json: &str) -> Result<Self, ElementError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether a shadow root will be attached.
    #[must_use]
    pub const fn uses_shadow(&self) -> bool {
        self.use_shadow
    }

    /// The configured shadow root mode.
    #[must_use]
    pub const fn mode(&self) -> ShadowMode {
        self.shadow_mode
    }

    /// Consumes the configuration and returns the template override.
    #[must_use]
    pub fn into_template(self) -> Option<TemplateSource> {
        self.template
    }
}
