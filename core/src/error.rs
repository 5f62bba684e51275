//! Error types shared by every Elementa backend.

use alloc::string::String;

use thiserror::Error;

/// Errors surfaced by a [`ComponentBase`](crate::ComponentBase) or a backend.
///
/// Template acquisition never produces one of these: fetch failures and
/// missing templates degrade to the default template instead.
#[derive(Debug, Error)]
pub enum ElementError {
    /// Rendering was requested before any template was injected.
    #[error("<{tag}> cannot render before its template has been injected")]
    NotMounted {
        /// Tag name of the offending element.
        tag: &'static str,
    },
    /// The tag name is not a valid custom element name.
    #[error("`{0}` is not a valid custom element name")]
    InvalidTagName(String),
    /// The platform rejected a DOM operation.
    #[error("DOM operation failed: {0}")]
    Dom(String),
    /// An event payload could not be serialized.
    #[error("failed to serialize event detail: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors produced while fetching a remote template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-OK status.
    #[error("`{url}` responded with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}
