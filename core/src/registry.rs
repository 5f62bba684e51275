//! Registration of element types under a tag name.
//!
//! The platform-wide registry is an injected collaborator: the core only
//! talks to it through [`Registry`], so registration logic runs the same
//! against `customElements` and against an in-memory table.

use alloc::string::ToString;

use crate::{Element, ElementError};

/// Names the HTML standard reserves even though they contain a hyphen.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Static description of a registered element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementDefinition {
    tag: &'static str,
    observed_attributes: &'static [&'static str],
    type_name: &'static str,
}

impl ElementDefinition {
    /// Describes `E`.
    #[must_use]
    pub fn of<E: Element>() -> Self {
        Self {
            tag: E::TAG,
            observed_attributes: E::observed_attributes(),
            type_name: core::any::type_name::<E>(),
        }
    }

    /// The tag name.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Attributes whose changes are delivered to the element.
    #[must_use]
    pub const fn observed_attributes(&self) -> &'static [&'static str] {
        self.observed_attributes
    }

    /// Rust type name of the element, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A table of custom element definitions keyed by tag name.
pub trait Registry {
    /// Whatever the platform needs to instantiate the element.
    type Constructor;

    /// Whether `tag` already has a definition.
    fn is_defined(&self, tag: &str) -> bool;

    /// Adds a definition. Only called for tags that are not defined yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the definition.
    fn insert(
        &self,
        definition: ElementDefinition,
        constructor: Self::Constructor,
    ) -> Result<(), ElementError>;
}

/// Outcome of [`define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Definition {
    /// The tag was registered by this call.
    Defined,
    /// The tag was already registered; nothing changed.
    AlreadyDefined,
}

/// Registers `E` under [`Element::TAG`].
///
/// A second registration of the same tag logs a warning and leaves the
/// registry untouched.
///
/// # Errors
///
/// Returns [`ElementError::InvalidTagName`] for names the platform would
/// reject, or the registry's own error.
pub fn define<E: Element, R: Registry + ?Sized>(
    registry: &R,
    constructor: R::Constructor,
) -> Result<Definition, ElementError> {
    validate_tag_name(E::TAG)?;

    if registry.is_defined(E::TAG) {
        tracing::warn!(tag = E::TAG, "custom element is already defined, skipping");
        return Ok(Definition::AlreadyDefined);
    }

    let definition = ElementDefinition::of::<E>();
    registry.insert(definition, constructor)?;
    tracing::debug!(tag = E::TAG, ty = definition.type_name(), "custom element defined");
    Ok(Definition::Defined)
}

/// Checks that `tag` is a valid custom element name.
///
/// # Errors
///
/// Returns [`ElementError::InvalidTagName`] if it is not.
pub fn validate_tag_name(tag: &str) -> Result<(), ElementError> {
    let starts_lower = tag.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_chars = tag.chars().all(|c| {
        matches!(c, '-' | '.' | '_' | '0'..='9' | 'a'..='z') || (!c.is_ascii() && c != '\u{0}')
    });

    if starts_lower && tag.contains('-') && valid_chars && !RESERVED_NAMES.contains(&tag) {
        Ok(())
    } else {
        Err(ElementError::InvalidTagName(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec::Vec};
    use core::cell::RefCell;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tracing::Level;
    use tracing_subscriber::{Layer, layer::Context, prelude::*};

    #[derive(Debug, Default)]
    struct Table(RefCell<Vec<(String, u32)>>);

    impl Registry for Table {
        type Constructor = u32;

        fn is_defined(&self, tag: &str) -> bool {
            self.0.borrow().iter().any(|(t, _)| t == tag)
        }

        fn insert(&self, definition: ElementDefinition, ctor: u32) -> Result<(), ElementError> {
            self.0.borrow_mut().push((definition.tag().into(), ctor));
            Ok(())
        }
    }

    struct Card;

    impl Element for Card {
        const TAG: &'static str = "user-card";
        type Data = ();
    }

    struct Shouting;

    impl Element for Shouting {
        const TAG: &'static str = "UserCard";
        type Data = ();
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn second_definition_is_skipped_with_one_warning() {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let table = Table::default();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(define::<Card, _>(&table, 1).unwrap(), Definition::Defined);
            assert_eq!(
                define::<Card, _>(&table, 2).unwrap(),
                Definition::AlreadyDefined
            );
        });

        assert_eq!(&*table.0.borrow(), &[(String::from("user-card"), 1)]);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_tag_is_rejected_before_touching_registry() {
        let table = Table::default();
        assert!(matches!(
            define::<Shouting, _>(&table, 1),
            Err(ElementError::InvalidTagName(tag)) if tag == "UserCard"
        ));
        assert!(table.0.borrow().is_empty());
    }

    #[test]
    fn tag_name_rules() {
        for ok in ["user-card", "x-1", "my-élément", "a-b.c_d"] {
            assert!(validate_tag_name(ok).is_ok(), "{ok}");
        }
        for bad in ["card", "-card", "1-card", "User-card", "font-face", "my card-x", ""] {
            assert!(validate_tag_name(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn definition_describes_the_type() {
        let definition = ElementDefinition::of::<Card>();
        assert_eq!(definition.tag(), "user-card");
        assert!(definition.observed_attributes().is_empty());
        assert!(definition.type_name().ends_with("Card"));
    }
}
