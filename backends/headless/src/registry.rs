use std::cell::RefCell;

use elementa_core::{ElementDefinition, ElementError, Registry};

/// An in-memory custom element registry.
#[derive(Debug, Default)]
pub struct HeadlessRegistry {
    definitions: RefCell<Vec<ElementDefinition>>,
}

impl HeadlessRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The definition registered for `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<ElementDefinition> {
        self.definitions
            .borrow()
            .iter()
            .find(|definition| definition.tag() == tag)
            .copied()
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.borrow().len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.borrow().is_empty()
    }
}

impl Registry for HeadlessRegistry {
    type Constructor = ();

    fn is_defined(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    fn insert(&self, definition: ElementDefinition, (): ()) -> Result<(), ElementError> {
        self.definitions.borrow_mut().push(definition);
        Ok(())
    }
}
