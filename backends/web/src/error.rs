use core::fmt;

use elementa_core::{ElementError, FetchError};
use wasm_bindgen::JsValue;

/// Error type produced by the web backend.
#[derive(Debug, Clone)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    DomUnavailable,
    /// A value returned by the platform did not have the expected type.
    UnexpectedType(&'static str),
    /// Wrapper around JavaScript exceptions.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => write!(f, "DOM is not available"),
            Self::UnexpectedType(expected) => write!(f, "expected a {expected}"),
            Self::Js(msg) => write!(f, "JavaScript error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<WebError> for ElementError {
    fn from(value: WebError) -> Self {
        Self::Dom(value.to_string())
    }
}

impl From<WebError> for FetchError {
    fn from(value: WebError) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}

/// Maps a JavaScript exception to an [`ElementError`].
pub(crate) fn dom_error(value: JsValue) -> ElementError {
    WebError::from(value).into()
}
