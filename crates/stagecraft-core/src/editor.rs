//! Editor state: the project, its history and everything the UI shares.

use crate::assets::UploadedImage;
use crate::canvas::{Canvas, Project, default_canvas_name};
use crate::config::EditorConfig;
use crate::element::{BACKGROUND_LAYER, Element, ElementId, ElementPatch, ElementType, fit_within};
use crate::history::History;
use crate::inventory::{Inventory, InventoryItem};
use crate::stacking::Stacking;
use kurbo::Point;

/// The single store every engine component works through.
///
/// Operations on unknown IDs are no-ops that log a warning: UI callbacks can
/// race with deletions.
#[derive(Debug, Clone)]
pub struct EditorStore {
    config: EditorConfig,
    project: Project,
    history: History,
    active_element: Option<ElementId>,
    game_mode: bool,
    inventory: Inventory,
    stacking: Stacking,
    identity: Option<String>,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorStore {
    /// Create a store with an empty project.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_project(Project::new(), config)
    }

    /// Create a store around an existing project.
    pub fn with_project(project: Project, config: EditorConfig) -> Self {
        let mut stacking = Stacking::new();
        for canvas in project.canvases() {
            stacking.observe(&canvas.elements);
        }
        Self {
            history: History::new(config.max_undo_history),
            inventory: Inventory::from_project(&project),
            config,
            project,
            active_element: None,
            game_mode: false,
            stacking,
            identity: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Replace the project, dropping history and transient state.
    pub fn load_project(&mut self, project: Project) {
        log::info!("Loading project with {} canvases", project.canvas_count());
        self.project = project;
        self.history.clear();
        self.active_element = None;
        self.inventory = Inventory::from_project(&self.project);
        self.stacking.clear();
        for canvas in self.project.canvases() {
            self.stacking.observe(&canvas.elements);
        }
    }

    /// Load from JSON. Malformed input yields a single empty canvas.
    pub fn load_json(&mut self, json: &str) {
        self.load_project(Project::from_json(json));
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.project.to_json()
    }

    // --- Identity and mode ---

    /// Set or clear the current user identity.
    pub fn set_identity(&mut self, identity: Option<String>) {
        self.identity = identity;
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    fn may_create(&self) -> bool {
        if self.config.require_identity && self.identity.is_none() {
            log::warn!("Element creation blocked: no user identity");
            return false;
        }
        true
    }

    pub fn is_game_mode(&self) -> bool {
        self.game_mode
    }

    /// Toggle play mode. Entering it clears the selection.
    pub fn set_game_mode(&mut self, enabled: bool) {
        if enabled {
            self.active_element = None;
        }
        self.game_mode = enabled;
        log::info!("Game mode {}", if enabled { "on" } else { "off" });
    }

    // --- Lookup and selection ---

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.project.element(id)
    }

    pub fn active_canvas(&self) -> &Canvas {
        self.project.active_canvas()
    }

    pub fn active_canvas_index(&self) -> usize {
        self.project.active_canvas_index()
    }

    /// Switch canvases. Not recorded in history.
    pub fn set_active_canvas(&mut self, index: usize) -> bool {
        if !self.project.set_active_canvas(index) {
            log::warn!("Canvas index {index} out of range");
            return false;
        }
        if self
            .active_element
            .is_some_and(|id| !self.project.active_canvas().contains(id))
        {
            self.active_element = None;
        }
        true
    }

    /// Select an element on the active canvas. Disabled in play mode.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.game_mode {
            return false;
        }
        if !self.project.active_canvas().contains(id) {
            log::warn!("Cannot select {id}: not on the active canvas");
            return false;
        }
        self.active_element = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.active_element = None;
    }

    pub fn active_element_id(&self) -> Option<ElementId> {
        self.active_element
    }

    pub fn active_element(&self) -> Option<&Element> {
        self.active_element.and_then(|id| self.element(id))
    }

    // --- History ---

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of committed undo steps.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_len()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.project) {
            Some(project) => {
                self.restore(project);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.project) {
            Some(project) => {
                self.restore(project);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, project: Project) {
        self.project = project;
        if self
            .active_element
            .is_some_and(|id| self.project.element(id).is_none())
        {
            self.active_element = None;
        }
        self.inventory.sync(&self.project);
    }

    /// Register all live updates since the last checkpoint as one undo step.
    pub fn commit_to_history(&mut self) {
        self.history.commit(&self.project);
    }

    /// Run a committed mutation. The closure returns whether it changed
    /// anything; nothing is recorded if it did not.
    fn committed<R>(&mut self, f: impl FnOnce(&mut Self) -> Option<R>) -> Option<R> {
        let before = self.project.clone();
        let result = f(self)?;
        self.history.record(&before);
        Some(result)
    }

    // --- Element mutation ---

    /// Create an element on the active canvas.
    ///
    /// Returns `None` while element creation is gated on a missing identity.
    /// A second background replaces the image of the existing one.
    pub fn add_element(&mut self, element_type: ElementType, overrides: ElementPatch) -> Option<Element> {
        if !self.may_create() {
            return None;
        }

        let existing_background = self.project.active_canvas().background().map(|e| e.id);
        if let (ElementType::Background, Some(id)) = (element_type, existing_background) {
            if let Some(image) = overrides.image {
                self.update_element(id, &ElementPatch::new().with_image(image));
            }
            return self.element(id).cloned();
        }

        let mut element = Element::new(element_type);
        element.apply_patch(&overrides);
        self.committed(|store| {
            let canvas = store.project.active_canvas_mut();
            element.layer = if element.is_background() {
                BACKGROUND_LAYER
            } else {
                canvas.next_layer()
            };
            canvas.elements.push(element.clone());
            store.stacking.observe([&element]);
            Some(())
        })?;
        log::debug!("Added {:?} element {}", element_type, element.id);
        Some(element)
    }

    /// Committed update: merge `patch` and record an undo step.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if self.element(id).is_none() {
            log::warn!("update_element: element {id} not found");
            return false;
        }
        self.committed(|store| store.patch_element(id, patch)).is_some()
    }

    /// Live update: merge `patch` without touching the undo stack.
    pub fn update_element_without_history(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if self.element(id).is_none() {
            log::warn!("update_element_without_history: element {id} not found");
            return false;
        }
        self.history.begin_live(&self.project);
        self.patch_element(id, patch).is_some()
    }

    fn patch_element(&mut self, id: ElementId, patch: &ElementPatch) -> Option<()> {
        let element = self.project.element_mut(id)?;
        element.apply_patch(patch);
        // Only the background may sit on the background layer
        if element.is_background() {
            element.layer = BACKGROUND_LAYER;
        } else if element.layer <= BACKGROUND_LAYER {
            element.layer = BACKGROUND_LAYER + 1;
        }
        if patch.layer.is_some() {
            self.stacking.forget(id);
        }
        Some(())
    }

    /// Delete an element. Its inventory reference goes with it.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.committed(|store| {
            let (ci, _) = store.project.locate(id)?;
            store.project.canvas_mut(ci)?.remove(id)
        });
        match &removed {
            Some(_) => {
                if self.active_element == Some(id) {
                    self.active_element = None;
                }
                self.inventory.remove(id);
                self.stacking.forget(id);
                log::debug!("Removed element {id}");
            }
            None => log::warn!("remove_element: element {id} not found"),
        }
        removed
    }

    /// Move an element to another canvas, keeping its ID and placing it
    /// above the destination's elements.
    pub fn move_element_to_canvas(&mut self, id: ElementId, canvas_index: usize) -> bool {
        let Some((source, _)) = self.project.locate(id) else {
            log::warn!("move_element_to_canvas: element {id} not found");
            return false;
        };
        let Some(destination) = self.project.canvas(canvas_index) else {
            log::warn!("move_element_to_canvas: canvas {canvas_index} out of range");
            return false;
        };
        if source == canvas_index {
            return false;
        }
        let is_background = self.element(id).is_some_and(Element::is_background);
        if is_background && destination.background().is_some() {
            log::warn!("Canvas {canvas_index} already has a background");
            return false;
        }

        let moved = self.committed(|store| {
            let mut element = store.project.canvas_mut(source)?.remove(id)?;
            let destination = store.project.canvas_mut(canvas_index)?;
            element.layer = if element.is_background() {
                BACKGROUND_LAYER
            } else {
                destination.next_layer()
            };
            destination.elements.push(element);
            Some(())
        });
        if moved.is_some() {
            if self.active_element == Some(id) {
                self.active_element = None;
            }
            self.stacking.forget(id);
            self.inventory.sync(&self.project);
        }
        moved.is_some()
    }

    /// Copy an element with a fresh ID, offset slightly, on the same canvas.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<Element> {
        if !self.may_create() {
            return None;
        }
        let Some((ci, _)) = self.project.locate(id) else {
            log::warn!("duplicate_element: element {id} not found");
            return None;
        };
        let source = self.element(id)?;
        if source.is_background() {
            log::warn!("Backgrounds cannot be duplicated");
            return None;
        }

        let offset = self.config.duplicate_offset;
        let mut copy = source.clone();
        copy.regenerate_id();
        copy.position += kurbo::Vec2::new(offset, offset);
        copy.in_inventory = false;

        self.committed(|store| {
            let canvas = store.project.canvas_mut(ci)?;
            copy.layer = canvas.next_layer();
            canvas.elements.push(copy.clone());
            store.stacking.observe([&copy]);
            Some(())
        })?;
        Some(copy)
    }

    fn reorder(&mut self, id: ElementId, op: fn(&mut Canvas, ElementId) -> bool) -> bool {
        let Some((ci, _)) = self.project.locate(id) else {
            log::warn!("Layer change: element {id} not found");
            return false;
        };
        let changed = self
            .committed(|store| {
                let canvas = store.project.canvas_mut(ci)?;
                op(canvas, id).then_some(())
            })
            .is_some();
        if changed {
            // Explicit ordering wins over gesture stacking
            self.stacking.clear();
            for canvas in self.project.canvases() {
                self.stacking.observe(&canvas.elements);
            }
        }
        changed
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.reorder(id, Canvas::bring_forward)
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.reorder(id, Canvas::send_backward)
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.reorder(id, Canvas::bring_to_front)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.reorder(id, Canvas::send_to_back)
    }

    /// Store an uploaded image on an image or background element.
    ///
    /// Image elements are resized to fit their current box at the original
    /// aspect ratio.
    pub fn apply_uploaded_image(&mut self, id: ElementId, upload: UploadedImage) -> bool {
        let Some(element) = self.element(id) else {
            log::warn!("apply_uploaded_image: element {id} not found");
            return false;
        };
        let Some(source) = element.kind.image_source() else {
            log::warn!("apply_uploaded_image: element {id} is not an image");
            return false;
        };

        let mut image = source.clone();
        image.src = Some(upload.data_url);
        image.thumbnail = Some(upload.thumbnail_data_url);
        image.original_size = Some(upload.original_size);

        let mut patch = ElementPatch::new().with_image(image);
        if let (true, Some(size)) = (element.is_image(), element.size) {
            patch = patch.with_size(fit_within(upload.original_size, size));
        }
        self.update_element(id, &patch)
    }

    // --- Canvases ---

    /// Append a canvas. Returns its index.
    pub fn add_canvas(&mut self, name: Option<String>) -> usize {
        let name = name.unwrap_or_else(|| default_canvas_name(self.project.canvas_count()));
        self.committed(|store| Some(store.project.push_canvas(Canvas::new(name))))
            .unwrap_or_default()
    }

    /// Remove a canvas and everything on it. The last canvas stays.
    pub fn remove_canvas(&mut self, index: usize) -> Option<Canvas> {
        if self.project.canvas_count() <= 1 {
            log::warn!("Cannot remove the last canvas");
            return None;
        }
        let removed = self.committed(|store| store.project.remove_canvas(index));
        match &removed {
            Some(canvas) => {
                if self.active_element.is_some_and(|id| canvas.contains(id)) {
                    self.active_element = None;
                }
                self.inventory.sync(&self.project);
            }
            None => log::warn!("remove_canvas: index {index} out of range"),
        }
        removed
    }

    pub fn rename_canvas(&mut self, index: usize, name: impl Into<String>) -> bool {
        let name = name.into();
        let renamed = self.committed(|store| {
            store.project.canvas_mut(index)?.name = name;
            Some(())
        });
        if renamed.is_none() {
            log::warn!("rename_canvas: index {index} out of range");
        }
        renamed.is_some()
    }

    /// Copy a canvas (fresh IDs throughout) right after the original.
    pub fn duplicate_canvas(&mut self, index: usize) -> Option<usize> {
        let Some(source) = self.project.canvas(index) else {
            log::warn!("duplicate_canvas: index {index} out of range");
            return None;
        };
        let mut copy = source.duplicate(format!("{} (copy)", source.name));
        for element in &mut copy.elements {
            element.in_inventory = false;
        }
        self.committed(|store| Some(store.project.insert_canvas(index + 1, copy)))
    }

    // --- Inventory ---

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Collect an element. Not recorded in history.
    pub fn add_to_inventory(&mut self, id: ElementId) -> bool {
        let Some((ci, _)) = self.project.locate(id) else {
            log::warn!("add_to_inventory: element {id} not found");
            return false;
        };
        let Some(canvas) = self.project.canvas_mut(ci) else {
            return false;
        };
        let canvas_id = canvas.id;
        if let Some(element) = canvas.element_mut(id) {
            element.in_inventory = true;
        }
        self.inventory.add(InventoryItem {
            element_id: id,
            canvas_id,
        })
    }

    /// Drop the inventory reference. The element itself stays.
    pub fn remove_from_inventory(&mut self, id: ElementId) -> bool {
        if let Some(element) = self.project.element_mut(id) {
            element.in_inventory = false;
        }
        self.inventory.remove(id).is_some()
    }

    // --- Rendering and stacking ---

    /// Elements of the active canvas to draw, back to front.
    ///
    /// Inventory items are left out unless selected; hidden elements are
    /// left out in play mode.
    pub fn render_list(&self) -> Vec<&Element> {
        let mut visible: Vec<(i64, usize, &Element)> = self
            .project
            .active_canvas()
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !(self.game_mode && e.is_hidden))
            .filter(|(_, e)| !e.in_inventory || self.active_element == Some(e.id))
            .map(|(i, e)| (self.stacking.effective_z(e), i, e))
            .collect();
        visible.sort_by_key(|(z, i, _)| (*z, *i));
        visible.into_iter().map(|(_, _, e)| e).collect()
    }

    /// Rendered, non-background elements whose shape contains `point`, front
    /// to back.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.render_list()
            .into_iter()
            .rev()
            .filter(|e| !e.is_background() && e.contains_point(point))
            .map(|e| e.id)
            .collect()
    }

    /// Effective stacking value of an element.
    pub fn z_of(&self, id: ElementId) -> Option<i64> {
        self.element(id).map(|e| self.stacking.effective_z(e))
    }

    /// Raise an element above everything while it is manipulated.
    pub fn lift_element(&mut self, id: ElementId) {
        self.stacking.observe(&self.project.active_canvas().elements);
        self.stacking.lift(id);
    }

    /// Keep a manipulated element on top after the gesture.
    pub fn settle_element(&mut self, id: ElementId) {
        self.stacking.settle(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ImageSource;
    use kurbo::Size;

    fn store() -> EditorStore {
        let mut store = EditorStore::default();
        store.set_identity(Some("tester".into()));
        store
    }

    #[test]
    fn test_identity_gates_creation() {
        let mut store = EditorStore::default();
        assert!(store.add_element(ElementType::Rectangle, ElementPatch::new()).is_none());
        assert!(!store.can_undo());
        store.set_identity(Some("someone".into()));
        assert!(store.add_element(ElementType::Rectangle, ElementPatch::new()).is_some());
    }

    #[test]
    fn test_add_element_layers() {
        let mut store = store();
        let a = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        let b = store.add_element(ElementType::Circle, ElementPatch::new()).unwrap();
        let bg = store.add_element(ElementType::Background, ElementPatch::new()).unwrap();
        assert_eq!(a.layer, 1);
        assert_eq!(b.layer, 2);
        assert_eq!(bg.layer, BACKGROUND_LAYER);
        assert_eq!(store.undo_depth(), 3);
        assert_eq!(store.render_list()[0].id, bg.id);
    }

    #[test]
    fn test_second_background_replaces_source() {
        let mut store = store();
        let bg = store.add_element(ElementType::Background, ElementPatch::new()).unwrap();
        let image = ImageSource {
            src: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        };
        let again = store
            .add_element(ElementType::Background, ElementPatch::new().with_image(image.clone()))
            .unwrap();
        assert_eq!(again.id, bg.id);
        assert_eq!(again.kind.image_source(), Some(&image));
        assert_eq!(store.active_canvas().len(), 1);
    }

    #[test]
    fn test_overrides_apply() {
        let mut store = store();
        let el = store
            .add_element(
                ElementType::Heading,
                ElementPatch::new()
                    .with_position(Point::new(5.0, 5.0))
                    .with_content("Title")
                    .with_layer(-3),
            )
            .unwrap();
        assert_eq!(el.position, Point::new(5.0, 5.0));
        assert_eq!(el.kind.text_content(), Some("Title"));
        assert_eq!(el.layer, 1);
    }

    #[test]
    fn test_not_found_is_noop() {
        let mut store = store();
        let ghost = uuid::Uuid::new_v4();
        assert!(!store.update_element(ghost, &ElementPatch::new().with_hidden(true)));
        assert!(!store.update_element_without_history(ghost, &ElementPatch::new()));
        assert!(store.remove_element(ghost).is_none());
        assert!(!store.move_element_to_canvas(ghost, 0));
        assert!(store.duplicate_element(ghost).is_none());
        assert!(!store.bring_forward(ghost));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_undo_restores_removed_element() {
        let mut store = store();
        let el = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        store.select(el.id);
        store.remove_element(el.id);
        assert!(store.element(el.id).is_none());
        assert!(store.active_element().is_none());
        assert!(store.undo());
        assert_eq!(store.element(el.id), Some(&el));
        assert!(store.redo());
        assert!(store.element(el.id).is_none());
    }

    #[test]
    fn test_live_edit_after_undo_blocks_redo() {
        let mut store = store();
        let el = store
            .add_element(ElementType::Rectangle, ElementPatch::new().with_position(Point::ZERO))
            .unwrap();
        store.update_element(el.id, &ElementPatch::new().with_position(Point::new(10.0, 0.0)));
        assert!(store.undo());

        store.update_element_without_history(el.id, &ElementPatch::new().with_hidden(true));
        assert!(!store.redo());
        assert_eq!(store.element(el.id).unwrap().position, Point::ZERO);

        store.update_element(el.id, &ElementPatch::new().with_rotation(1.0));
        assert!(store.undo());
        let after = store.element(el.id).unwrap();
        assert_eq!(after.rotation, 0.0);
        assert!(after.is_hidden);

        assert!(store.undo());
        assert!(!store.element(el.id).unwrap().is_hidden);
    }

    #[test]
    fn test_remove_from_inventory_keeps_element() {
        let mut store = store();
        let el = store.add_element(ElementType::Image, ElementPatch::new()).unwrap();
        assert!(store.add_to_inventory(el.id));
        assert!(store.render_list().iter().all(|e| e.id != el.id));

        assert!(store.remove_from_inventory(el.id));
        assert!(!store.remove_from_inventory(el.id));
        assert!(!store.inventory().contains(el.id));
        assert!(store.active_canvas().elements.iter().any(|e| e.id == el.id));
        assert!(!store.element(el.id).unwrap().in_inventory);
        assert!(store.render_list().iter().any(|e| e.id == el.id));
    }

    #[test]
    fn test_move_to_canvas_keeps_identity() {
        let mut store = store();
        let target = store.add_canvas(Some("Hall".into()));
        store.set_active_canvas(target);
        store.add_element(ElementType::Rectangle, ElementPatch::new());
        store.add_element(ElementType::Rectangle, ElementPatch::new());
        store.set_active_canvas(0);

        let el = store.add_element(ElementType::Circle, ElementPatch::new()).unwrap();
        assert!(store.move_element_to_canvas(el.id, target));
        let moved = store.element(el.id).unwrap();
        assert_eq!(moved.id, el.id);
        assert_eq!(moved.layer, 3);
        assert_eq!(store.project().locate(el.id).map(|(ci, _)| ci), Some(target));
        assert!(!store.move_element_to_canvas(el.id, target));
    }

    #[test]
    fn test_duplicate_element() {
        let mut store = store();
        let el = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        let copy = store.duplicate_element(el.id).unwrap();
        assert_ne!(copy.id, el.id);
        assert_eq!(copy.position, el.position + kurbo::Vec2::new(20.0, 20.0));
        assert_eq!(copy.layer, el.layer + 1);
    }

    #[test]
    fn test_layer_ops_skip_background() {
        let mut store = store();
        let bg = store.add_element(ElementType::Background, ElementPatch::new()).unwrap();
        let a = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        let b = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        let depth = store.undo_depth();

        assert!(!store.send_to_back(bg.id));
        assert!(!store.send_backward(a.id));
        assert_eq!(store.undo_depth(), depth);

        assert!(store.send_to_back(b.id));
        let order: Vec<_> = store.render_list().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![bg.id, b.id, a.id]);
        assert!(store.element(b.id).unwrap().layer > BACKGROUND_LAYER);
    }

    #[test]
    fn test_canvas_management() {
        let mut store = store();
        let second = store.add_canvas(None);
        assert_eq!(store.project().canvas(second).unwrap().name, "Canvas 2");
        assert!(store.rename_canvas(second, "Cellar"));

        store.set_active_canvas(second);
        store.add_element(ElementType::Circle, ElementPatch::new());
        let copy = store.duplicate_canvas(second).unwrap();
        assert_eq!(store.project().canvas(copy).unwrap().name, "Cellar (copy)");
        assert_eq!(store.project().canvas(copy).unwrap().len(), 1);

        assert!(store.remove_canvas(0).is_some());
        assert!(store.remove_canvas(0).is_some());
        assert!(store.remove_canvas(0).is_none());
        assert_eq!(store.project().canvas_count(), 1);
        assert_eq!(store.active_canvas_index(), 0);
    }

    #[test]
    fn test_game_mode_disables_selection() {
        let mut store = store();
        let el = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        assert!(store.select(el.id));
        store.set_game_mode(true);
        assert!(store.active_element().is_none());
        assert!(!store.select(el.id));
    }

    #[test]
    fn test_hidden_only_skipped_in_play() {
        let mut store = store();
        let el = store
            .add_element(ElementType::Rectangle, ElementPatch::new().with_hidden(true))
            .unwrap();
        assert_eq!(store.render_list().len(), 1);
        store.set_game_mode(true);
        assert!(store.render_list().is_empty());
        assert!(store.elements_at_point(el.center()).is_empty());
    }

    #[test]
    fn test_apply_uploaded_image_fits_box() {
        let mut store = store();
        let el = store.add_element(ElementType::Image, ElementPatch::new()).unwrap();
        let upload = UploadedImage {
            data_url: "data:image/png;base64,AAAA".into(),
            thumbnail_data_url: "data:image/png;base64,AA".into(),
            original_size: Size::new(400.0, 200.0),
        };
        assert!(store.apply_uploaded_image(el.id, upload));
        let updated = store.element(el.id).unwrap();
        assert_eq!(updated.size, Some(Size::new(200.0, 100.0)));
        assert_eq!(updated.aspect_ratio(), Some(2.0));

        let rect = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        let upload = UploadedImage {
            data_url: String::new(),
            thumbnail_data_url: String::new(),
            original_size: Size::new(1.0, 1.0),
        };
        assert!(!store.apply_uploaded_image(rect.id, upload));
    }

    #[test]
    fn test_lift_and_settle_reorders_rendering() {
        let mut store = store();
        let a = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        let b = store.add_element(ElementType::Rectangle, ElementPatch::new()).unwrap();
        store.lift_element(a.id);
        store.settle_element(a.id);
        let order: Vec<_> = store.render_list().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b.id, a.id]);
        // Persisted layers untouched
        assert_eq!(store.element(a.id).unwrap().layer, 1);
        assert_eq!(store.elements_at_point(a.center()), vec![a.id, b.id]);
    }
}
