//! Resize and rotate handles.

use crate::element::Element;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Edges a resize handle moves. Combinable, e.g. north + east for a corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResizeDirection {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ResizeDirection {
    pub fn is_horizontal(&self) -> bool {
        self.east || self.west
    }

    pub fn is_vertical(&self) -> bool {
        self.north || self.south
    }

    /// Point of a box (relative to its origin) that stays fixed while
    /// resizing in this direction.
    pub fn anchor(&self, size: Size) -> Vec2 {
        let x = if self.west {
            size.width
        } else if self.east {
            0.0
        } else {
            size.width / 2.0
        };
        let y = if self.north {
            size.height
        } else if self.south {
            0.0
        } else {
            size.height / 2.0
        };
        Vec2::new(x, y)
    }
}

/// The eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn direction(self) -> ResizeDirection {
        use ResizeHandle::*;
        ResizeDirection {
            north: matches!(self, N | NE | NW),
            south: matches!(self, S | SE | SW),
            east: matches!(self, E | NE | SE),
            west: matches!(self, W | NW | SW),
        }
    }

    /// Handle location relative to the box origin.
    fn local_position(self, size: Size) -> Vec2 {
        let d = self.direction();
        let x = if d.west {
            0.0
        } else if d.east {
            size.width
        } else {
            size.width / 2.0
        };
        let y = if d.north {
            0.0
        } else if d.south {
            size.height
        } else {
            size.height / 2.0
        };
        Vec2::new(x, y)
    }
}

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(ResizeHandle),
    Rotate,
}

/// A handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Handles for an element, placed on its rotated and scaled box.
///
/// Backgrounds have none.
pub fn handles(element: &Element) -> Vec<Handle> {
    let Some(size) = element.size.filter(|_| !element.is_background()) else {
        return Vec::new();
    };
    let affine = element.affine();
    let origin = element.position;

    let mut handles: Vec<Handle> = ResizeHandle::ALL
        .iter()
        .map(|&h| Handle::new(affine * (origin + h.local_position(size)), HandleKind::Resize(h)))
        .collect();

    if element.scale.abs() > f64::EPSILON {
        // Keep the visual offset constant regardless of scale
        let offset = ROTATE_HANDLE_OFFSET / element.scale.abs();
        let local = origin + Vec2::new(size.width / 2.0, -offset);
        handles.push(Handle::new(affine * local, HandleKind::Rotate));
    }
    handles
}

/// Which gesture a pointer-down on an element starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    Resize(ResizeHandle),
    Rotate,
    Body,
}

/// Resolve a pointer-down against an element's handles and body.
///
/// Priority: resize handles, then the rotate handle, then the body. Among
/// overlapping resize handles the nearest wins.
pub fn resolve_gesture_target(element: &Element, point: Point, tolerance: f64) -> Option<GestureTarget> {
    let handles = handles(element);

    let nearest_resize = handles
        .iter()
        .filter(|h| h.hit_test(point, tolerance))
        .filter_map(|h| match h.kind {
            HandleKind::Resize(r) => Some((h.position.distance(point), r)),
            HandleKind::Rotate => None,
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((_, handle)) = nearest_resize {
        return Some(GestureTarget::Resize(handle));
    }

    if handles
        .iter()
        .any(|h| h.kind == HandleKind::Rotate && h.hit_test(point, tolerance))
    {
        return Some(GestureTarget::Rotate);
    }

    element.contains_point(point).then_some(GestureTarget::Body)
}
