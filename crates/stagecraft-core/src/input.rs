//! Pointer and touch input types.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// Phase of a touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, position: Point) -> Self {
        Self { id, position }
    }
}

/// A touch event carrying every point that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }
}

/// Tracks which fingers are currently down.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    active: Vec<TouchPoint>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into the set of active touches.
    pub fn apply(&mut self, event: &TouchEvent) {
        for touch in &event.touches {
            match event.phase {
                TouchPhase::Start | TouchPhase::Move => {
                    match self.active.iter_mut().find(|t| t.id == touch.id) {
                        Some(existing) => existing.position = touch.position,
                        None => self.active.push(*touch),
                    }
                }
                TouchPhase::End | TouchPhase::Cancel => self.active.retain(|t| t.id != touch.id),
            }
        }
    }

    /// Number of fingers down.
    pub fn count(&self) -> usize {
        self.active.len()
    }

    /// The first finger down.
    pub fn primary(&self) -> Option<Point> {
        self.active.first().map(|t| t.position)
    }

    /// The two earliest fingers, used for pinch gestures.
    pub fn pair(&self) -> Option<(Point, Point)> {
        match self.active.as_slice() {
            [a, b, ..] => Some((a.position, b.position)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
