//! Transient on-screen stacking.
//!
//! Dragging an element raises it above everything without rewriting the
//! persisted `layer` values. The raise survives until the project is
//! reloaded; serialization only ever sees `layer`.

use crate::element::{Element, ElementId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Stacking {
    max_z: i64,
    overrides: HashMap<ElementId, i64>,
}

impl Stacking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the counter is above every persisted layer in `elements`.
    pub fn observe<'a>(&mut self, elements: impl IntoIterator<Item = &'a Element>) {
        for element in elements {
            self.max_z = self.max_z.max(i64::from(element.layer));
        }
    }

    /// Raise an element for the duration of a gesture.
    pub fn lift(&mut self, id: ElementId) {
        self.overrides.insert(id, self.max_z + 1);
    }

    /// Leave a lifted element on top and bump the counter.
    pub fn settle(&mut self, id: ElementId) {
        self.max_z += 1;
        self.overrides.insert(id, self.max_z);
    }

    /// Current "max z" counter.
    pub fn max_z(&self) -> i64 {
        self.max_z
    }

    /// Stacking value used for rendering and hit-testing.
    ///
    /// Backgrounds always sit below everything else.
    pub fn effective_z(&self, element: &Element) -> i64 {
        if element.is_background() {
            return i64::MIN;
        }
        self.overrides
            .get(&element.id)
            .copied()
            .unwrap_or(i64::from(element.layer))
    }

    /// Forget an override, e.g. after an explicit layer change.
    pub fn forget(&mut self, id: ElementId) {
        self.overrides.remove(&id);
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
        self.max_z = 0;
    }
}
