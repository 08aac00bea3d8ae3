//! Canvases and the project document.

use crate::element::{BACKGROUND_LAYER, Element, ElementId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for canvases.
pub type CanvasId = Uuid;

/// One page of the project, holding its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub id: CanvasId,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Canvas {
    /// Create a new empty canvas.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Get an element by ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Remove an element, returning it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// The canvas background, if any.
    pub fn background(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.is_background())
    }

    pub fn background_mut(&mut self) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.is_background())
    }

    /// Layer that places a new element above every current sibling.
    pub fn next_layer(&self) -> i32 {
        self.elements
            .iter()
            .filter(|e| !e.is_background())
            .map(|e| e.layer)
            .max()
            .map_or(BACKGROUND_LAYER + 1, |top| top.max(BACKGROUND_LAYER) + 1)
    }

    /// Non-background element IDs, back to front.
    pub fn z_order(&self) -> Vec<ElementId> {
        let mut ordered: Vec<(i32, usize, ElementId)> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_background())
            .map(|(i, e)| (e.layer, i, e.id))
            .collect();
        ordered.sort();
        ordered.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Elements back to front, background first.
    pub fn elements_ordered(&self) -> Vec<&Element> {
        self.background()
            .into_iter()
            .chain(self.z_order().into_iter().filter_map(|id| self.element(id)))
            .collect()
    }

    /// Write layers 1..=n following `order`, keeping the background at 0.
    fn apply_z_order(&mut self, order: &[ElementId]) {
        for (i, id) in order.iter().enumerate() {
            if let Some(element) = self.element_mut(*id) {
                element.layer = BACKGROUND_LAYER + 1 + i as i32;
            }
        }
    }

    /// Move an element one layer forward (towards front).
    /// Returns true if the element was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        let mut order = self.z_order();
        match order.iter().position(|&e| e == id) {
            Some(pos) if pos + 1 < order.len() => {
                order.swap(pos, pos + 1);
                self.apply_z_order(&order);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer backward (towards back).
    /// Returns true if the element was moved, false if already at back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        let mut order = self.z_order();
        match order.iter().position(|&e| e == id) {
            Some(pos) if pos > 0 => {
                order.swap(pos, pos - 1);
                self.apply_z_order(&order);
                true
            }
            _ => false,
        }
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let mut order = self.z_order();
        match order.iter().position(|&e| e == id) {
            Some(pos) if pos + 1 < order.len() => {
                order.remove(pos);
                order.push(id);
                self.apply_z_order(&order);
                true
            }
            _ => false,
        }
    }

    /// Send an element to the back, just above the background.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let mut order = self.z_order();
        match order.iter().position(|&e| e == id) {
            Some(pos) if pos > 0 => {
                order.remove(pos);
                order.insert(0, id);
                self.apply_z_order(&order);
                true
            }
            _ => false,
        }
    }

    /// Deep copy with fresh IDs for the canvas and every element.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.name = name.into();
        for element in &mut copy.elements {
            element.regenerate_id();
        }
        copy
    }

    /// Check if the canvas has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

/// The persisted document: ordered canvases plus the active one.
///
/// Always holds at least one canvas and an in-range active index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    canvases: Vec<Canvas>,
    active_canvas_index: usize,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            canvases: vec![Canvas::new(default_canvas_name(0))],
            active_canvas_index: 0,
        }
    }
}

/// Display name for the canvas at `index`.
pub fn default_canvas_name(index: usize) -> String {
    format!("Canvas {}", index + 1)
}

impl Project {
    /// Create a project with a single empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a project from parts, falling back to the default if invalid.
    pub fn from_parts(canvases: Vec<Canvas>, active_canvas_index: usize) -> Self {
        Self {
            canvases,
            active_canvas_index,
        }
        .validated()
    }

    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    pub fn canvas_count(&self) -> usize {
        self.canvases.len()
    }

    pub fn canvas(&self, index: usize) -> Option<&Canvas> {
        self.canvases.get(index)
    }

    pub fn canvas_mut(&mut self, index: usize) -> Option<&mut Canvas> {
        self.canvases.get_mut(index)
    }

    pub fn active_canvas_index(&self) -> usize {
        self.active_canvas_index
    }

    pub fn active_canvas(&self) -> &Canvas {
        &self.canvases[self.active_canvas_index]
    }

    pub fn active_canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvases[self.active_canvas_index]
    }

    /// Switch the active canvas. Returns false if out of range.
    pub fn set_active_canvas(&mut self, index: usize) -> bool {
        if index < self.canvases.len() {
            self.active_canvas_index = index;
            true
        } else {
            false
        }
    }

    /// Append a canvas and return its index.
    pub fn push_canvas(&mut self, canvas: Canvas) -> usize {
        self.canvases.push(canvas);
        self.canvases.len() - 1
    }

    /// Insert a canvas at `index` (clamped), keeping the same canvas active.
    pub fn insert_canvas(&mut self, index: usize, canvas: Canvas) -> usize {
        let index = index.min(self.canvases.len());
        self.canvases.insert(index, canvas);
        if index <= self.active_canvas_index {
            self.active_canvas_index += 1;
        }
        index
    }

    /// Remove a canvas. The last remaining canvas cannot be removed.
    pub fn remove_canvas(&mut self, index: usize) -> Option<Canvas> {
        if self.canvases.len() <= 1 || index >= self.canvases.len() {
            return None;
        }
        let removed = self.canvases.remove(index);
        if index < self.active_canvas_index || self.active_canvas_index >= self.canvases.len() {
            self.active_canvas_index = self.active_canvas_index.saturating_sub(1);
        }
        Some(removed)
    }

    /// Find which canvas holds an element: `(canvas index, element index)`.
    pub fn locate(&self, id: ElementId) -> Option<(usize, usize)> {
        self.canvases.iter().enumerate().find_map(|(ci, canvas)| {
            canvas
                .elements
                .iter()
                .position(|e| e.id == id)
                .map(|ei| (ci, ei))
        })
    }

    /// Get an element by ID on any canvas.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        let (ci, ei) = self.locate(id)?;
        self.canvases.get(ci)?.elements.get(ei)
    }

    /// Get a mutable reference to an element by ID on any canvas.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let (ci, ei) = self.locate(id)?;
        self.canvases.get_mut(ci)?.elements.get_mut(ei)
    }

    /// Canvas index by ID.
    pub fn canvas_index(&self, id: CanvasId) -> Option<usize> {
        self.canvases.iter().position(|c| c.id == id)
    }

    /// Resolve a navigation target given as a canvas ID or name.
    pub fn find_canvas(&self, target: &str) -> Option<usize> {
        Uuid::parse_str(target)
            .ok()
            .and_then(|id| self.canvas_index(id))
            .or_else(|| self.canvases.iter().position(|c| c.name == target))
    }

    /// Total number of elements across all canvases.
    pub fn element_count(&self) -> usize {
        self.canvases.iter().map(Canvas::len).sum()
    }

    /// Serialize the project to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a project from JSON, strictly.
    pub fn try_from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    /// Deserialize a project from JSON.
    ///
    /// Never fails: anything malformed yields a project with one empty canvas.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                log::warn!("Project is not valid JSON, starting fresh: {e}");
                Self::default()
            }
        }
    }

    /// Load from an already-parsed JSON value. Same fallback as [`Self::from_json`].
    pub fn from_value(value: Value) -> Self {
        if !value.get("canvases").is_some_and(Value::is_array) {
            log::warn!("Project has no canvases array, starting fresh");
            return Self::default();
        }
        match serde_json::from_value::<Self>(value) {
            Ok(project) => project.validated(),
            Err(e) => {
                log::warn!("Failed to load project, starting fresh: {e}");
                Self::default()
            }
        }
    }

    /// Replace an invalid project with the default one.
    pub fn validated(self) -> Self {
        if self.canvases.is_empty() || self.active_canvas_index >= self.canvases.len() {
            log::warn!(
                "Invalid project ({} canvases, active index {}), starting fresh",
                self.canvases.len(),
                self.active_canvas_index
            );
            return Self::default();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    fn canvas_with(count: usize) -> (Canvas, Vec<ElementId>) {
        let mut canvas = Canvas::new("Test");
        let mut ids = Vec::new();
        for _ in 0..count {
            let mut el = Element::new(ElementType::Rectangle);
            el.layer = canvas.next_layer();
            ids.push(el.id);
            canvas.elements.push(el);
        }
        (canvas, ids)
    }

    #[test]
    fn test_next_layer() {
        let mut canvas = Canvas::new("Test");
        assert_eq!(canvas.next_layer(), 1);
        canvas.elements.push(Element::new(ElementType::Background));
        assert_eq!(canvas.next_layer(), 1);
        let (canvas, _) = canvas_with(3);
        assert_eq!(canvas.next_layer(), 4);
    }

    #[test]
    fn test_z_order() {
        let (mut canvas, ids) = canvas_with(3);
        assert_eq!(canvas.z_order(), ids);

        assert!(canvas.bring_to_front(ids[0]));
        assert_eq!(canvas.z_order(), vec![ids[1], ids[2], ids[0]]);
        assert!(!canvas.bring_forward(ids[0]));

        assert!(canvas.send_to_back(ids[0]));
        assert_eq!(canvas.z_order(), ids);

        assert!(canvas.bring_forward(ids[1]));
        assert_eq!(canvas.z_order(), vec![ids[0], ids[2], ids[1]]);
        assert!(canvas.send_backward(ids[1]));
        assert_eq!(canvas.z_order(), ids);
    }

    #[test]
    fn test_background_stays_at_bottom() {
        let (mut canvas, ids) = canvas_with(2);
        let background = Element::new(ElementType::Background);
        let background_id = background.id;
        canvas.elements.push(background);

        assert!(!canvas.send_backward(ids[0]));
        assert!(!canvas.bring_to_front(background_id));
        assert_eq!(canvas.elements_ordered()[0].id, background_id);
        assert!(canvas.elements.iter().filter(|e| !e.is_background()).all(|e| e.layer > 0));
    }

    #[test]
    fn test_duplicate_canvas_has_fresh_ids() {
        let (canvas, ids) = canvas_with(2);
        let copy = canvas.duplicate("Copy");
        assert_ne!(copy.id, canvas.id);
        assert_eq!(copy.len(), 2);
        assert!(copy.elements.iter().all(|e| !ids.contains(&e.id)));
    }

    #[test]
    fn test_remove_canvas_keeps_one() {
        let mut project = Project::new();
        assert!(project.remove_canvas(0).is_none());

        project.push_canvas(Canvas::new("Second"));
        assert!(project.set_active_canvas(1));
        assert!(project.remove_canvas(1).is_some());
        assert_eq!(project.active_canvas_index(), 0);
    }

    #[test]
    fn test_find_canvas_by_id_or_name() {
        let mut project = Project::new();
        let hall = Canvas::new("Hall");
        let hall_id = hall.id;
        project.push_canvas(hall);
        assert_eq!(project.find_canvas("Hall"), Some(1));
        assert_eq!(project.find_canvas(&hall_id.to_string()), Some(1));
        assert_eq!(project.find_canvas("Attic"), None);
    }

    #[test]
    fn test_from_json_falls_back() {
        for bad in [
            "not json",
            r#"{"canvases": 5, "activeCanvasIndex": 0}"#,
            r#"{"canvases": [], "activeCanvasIndex": 0}"#,
            r#"{"canvases": [{"id": "00000000-0000-0000-0000-000000000000", "name": "A"}], "activeCanvasIndex": 3}"#,
        ] {
            let project = Project::from_json(bad);
            assert_eq!(project.canvas_count(), 1);
            assert!(project.active_canvas().is_empty());
        }
        assert!(Project::try_from_json("not json").is_err());
    }

    #[test]
    fn test_locate_element() {
        let mut project = Project::new();
        let (canvas, ids) = canvas_with(2);
        project.push_canvas(canvas);
        assert_eq!(project.locate(ids[1]), Some((1, 1)));
        assert!(project.element(ids[0]).is_some());
        assert!(project.element(Uuid::new_v4()).is_none());
        assert_eq!(project.element_count(), 2);
    }
}
