//! Template sources and their resolution.

use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::{ElementError, Host};

/// Markup injected when no other template source produced content.
pub const DEFAULT_TEMPLATE: &str = r#"<div class="elementa-default"><slot></slot></div>"#;

/// An inline template, owned by the element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    markup: String,
}

impl Template {
    /// Wraps `markup` as a template.
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// The raw markup of the template.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Where an element's initial markup comes from.
///
/// Chosen once per instance and resolved again on every mount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemplateSource {
    /// A template owned by the element.
    Inline(Template),
    /// The id of a `<template>` element in the document.
    ById(String),
    /// A URL serving the markup.
    ByUrl(String),
    /// No source; the default template is used.
    #[default]
    Default,
}

impl TemplateSource {
    /// Shorthand for [`TemplateSource::Inline`].
    #[must_use]
    pub fn inline(markup: impl Into<String>) -> Self {
        Self::Inline(Template::new(markup))
    }

    /// Shorthand for [`TemplateSource::ById`].
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::ById(id.into())
    }

    /// Shorthand for [`TemplateSource::ByUrl`].
    #[must_use]
    pub fn by_url(url: impl Into<String>) -> Self {
        Self::ByUrl(url.into())
    }

    /// The origin this source produces when it resolves successfully.
    #[must_use]
    pub const fn origin(&self) -> TemplateOrigin {
        match self {
            Self::Inline(_) => TemplateOrigin::Inline,
            Self::ById(_) => TemplateOrigin::ById,
            Self::ByUrl(_) => TemplateOrigin::ByUrl,
            Self::Default => TemplateOrigin::Default,
        }
    }
}

/// Which source actually produced a resolved template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateOrigin {
    /// The inline template.
    Inline,
    /// A document template looked up by id.
    ById,
    /// Markup fetched from a URL.
    ByUrl,
    /// The built-in [`DEFAULT_TEMPLATE`].
    Default,
}

/// A resolved template, ready to be injected.
#[derive(Debug, Clone)]
pub struct Resolved<F> {
    fragment: F,
    origin: TemplateOrigin,
}

impl<F> Resolved<F> {
    /// Where the content came from.
    #[must_use]
    pub const fn origin(&self) -> TemplateOrigin {
        self.origin
    }

    /// Borrows the resolved content.
    #[must_use]
    pub const fn fragment(&self) -> &F {
        &self.fragment
    }

    /// Consumes the template and returns its content.
    #[must_use]
    pub fn into_fragment(self) -> F {
        self.fragment
    }
}

/// Resolves `source` against `host`.
///
/// Lookup failures (missing id, wrong element type, network error, non-OK
/// status, unparsable markup) are logged and fall through to
/// [`DEFAULT_TEMPLATE`].
///
/// # Errors
///
/// Fails only if the host cannot parse the default template itself.
pub async fn resolve_template<H: Host>(
    host: &H,
    source: &TemplateSource,
) -> Result<Resolved<H::Fragment>, ElementError> {
    if let Some(fragment) = candidate(host, source).await {
        return Ok(Resolved {
            fragment,
            origin: source.origin(),
        });
    }

    Ok(Resolved {
        fragment: host.parse_template(DEFAULT_TEMPLATE)?,
        origin: TemplateOrigin::Default,
    })
}

async fn candidate<H: Host>(host: &H, source: &TemplateSource) -> Option<H::Fragment> {
    match source {
        TemplateSource::Inline(template) => host
            .parse_template(template.markup())
            .map_err(|err| tracing::warn!(error = %err, "failed to parse inline template"))
            .ok(),
        TemplateSource::ById(id) => {
            let fragment = host.template_by_id(id);
            if fragment.is_none() {
                tracing::debug!(id = %id, "no <template> with this id");
            }
            fragment
        }
        TemplateSource::ByUrl(url) => match host.fetch_text(url).await {
            Ok(markup) => host
                .parse_template(&markup)
                .map_err(|err| tracing::warn!(url = %url, error = %err, "failed to parse fetched template"))
                .ok(),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "failed to load template");
                None
            }
        },
        TemplateSource::Default => None,
    }
}
