//! Events dispatched by elements to their ancestors.

use alloc::string::String;

use serde::Serialize;
use serde_json::Value;

use crate::ElementError;

/// A named event carrying a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomEvent {
    name: String,
    detail: Value,
    bubbles: bool,
    composed: bool,
}

impl CustomEvent {
    /// Creates an event that bubbles and crosses shadow boundaries, so that
    /// listeners on ancestors outside the shadow tree observe it.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Serialize`] if `detail` cannot be serialized.
    pub fn new(name: impl Into<String>, detail: impl Serialize) -> Result<Self, ElementError> {
        Ok(Self {
            name: name.into(),
            detail: serde_json::to_value(detail)?,
            bubbles: true,
            composed: true,
        })
    }

    /// Creates an event that stays on its target.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Serialize`] if `detail` cannot be serialized.
    pub fn local(name: impl Into<String>, detail: impl Serialize) -> Result<Self, ElementError> {
        let mut event = Self::new(name, detail)?;
        event.bubbles = false;
        event.composed = false;
        Ok(event)
    }

    /// The event type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload passed by the dispatcher.
    #[must_use]
    pub const fn detail(&self) -> &Value {
        &self.detail
    }

    /// Whether the event propagates to ancestors.
    #[must_use]
    pub const fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Whether the event propagates across shadow boundaries.
    #[must_use]
    pub const fn composed(&self) -> bool {
        self.composed
    }
}
