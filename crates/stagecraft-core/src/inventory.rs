//! Items the player has collected.

use crate::canvas::{CanvasId, Project};
use crate::element::ElementId;
use serde::{Deserialize, Serialize};

/// Reference to a collected element. The element itself stays on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub element_id: ElementId,
    pub canvas_id: CanvasId,
}

/// Ordered list of collected items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the `inInventory` flags of a loaded project.
    pub fn from_project(project: &Project) -> Self {
        let items = project
            .canvases()
            .iter()
            .flat_map(|canvas| {
                canvas
                    .elements
                    .iter()
                    .filter(|e| e.in_inventory)
                    .map(move |e| InventoryItem {
                        element_id: e.id,
                        canvas_id: canvas.id,
                    })
            })
            .collect();
        Self { items }
    }

    /// Reconcile with the project after undo/redo or canvas changes.
    ///
    /// Keeps the order of items that are still flagged, drops the rest and
    /// appends newly flagged elements.
    pub fn sync(&mut self, project: &Project) {
        let flagged = Self::from_project(project).items;
        self.items
            .retain(|item| flagged.iter().any(|f| f.element_id == item.element_id));
        for item in &mut self.items {
            if let Some(f) = flagged.iter().find(|f| f.element_id == item.element_id) {
                item.canvas_id = f.canvas_id;
            }
        }
        for item in flagged {
            self.add(item);
        }
    }

    /// Add an item. Returns false if it was already held.
    pub fn add(&mut self, item: InventoryItem) -> bool {
        if self.contains(item.element_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the reference to an element. The element is not deleted.
    pub fn remove(&mut self, element_id: ElementId) -> Option<InventoryItem> {
        let index = self.items.iter().position(|i| i.element_id == element_id)?;
        Some(self.items.remove(index))
    }

    pub fn contains(&self, element_id: ElementId) -> bool {
        self.items.iter().any(|i| i.element_id == element_id)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
