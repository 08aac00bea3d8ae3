//! Gesture geometry.
//!
//! Every function here maps an initial snapshot plus the current pointer
//! sample to new geometry. Nothing accumulates from the previous sample, so
//! repeated moves cannot drift.

mod gesture;
mod handles;

pub use gesture::{GestureController, GestureKind};
pub use handles::{
    GestureTarget, Handle, HandleKind, ROTATE_HANDLE_OFFSET, ResizeDirection, ResizeHandle,
    handles, resolve_gesture_target,
};

use crate::element::{Element, ElementPatch};
use kurbo::{Affine, Point, Size, Vec2};

/// Position, size, rotation and scale of an element at gesture start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub position: Point,
    pub size: Size,
    pub rotation: f64,
    pub scale: f64,
}

impl Geometry {
    pub fn from_element(element: &Element) -> Self {
        Self {
            position: element.position,
            size: element.size_or_zero(),
            rotation: element.rotation,
            scale: element.scale,
        }
    }

    pub fn center(&self) -> Point {
        self.position + self.size.to_vec2() / 2.0
    }

    /// Map a point given relative to the box origin to canvas coordinates.
    fn to_world(&self, local: Vec2) -> Point {
        let half = self.size.to_vec2() / 2.0;
        let offset = Affine::rotate(self.rotation) * ((local - half) * self.scale).to_point();
        self.center() + offset.to_vec2()
    }

    /// Patch with every geometric field.
    pub fn to_patch(&self) -> ElementPatch {
        ElementPatch::new()
            .with_position(self.position)
            .with_size(self.size)
            .with_rotation(self.rotation)
            .with_scale(self.scale)
    }
}

/// New position for a drag.
pub fn drag(initial_position: Point, start_pointer: Point, pointer: Point) -> Point {
    initial_position + (pointer - start_pointer)
}

/// New geometry for a resize-handle drag.
///
/// `delta` is the pointer movement since gesture start in canvas
/// coordinates. It is mapped into the element's own frame so rotated
/// elements resize along their edges. The edge or corner opposite the
/// handle stays fixed on screen. With `aspect_ratio`, the dimension that
/// changed more drives the other one.
pub fn resize(
    initial: &Geometry,
    direction: ResizeDirection,
    delta: Vec2,
    aspect_ratio: Option<f64>,
    min_size: f64,
) -> Geometry {
    let scale = if initial.scale.abs() < f64::EPSILON {
        1.0
    } else {
        initial.scale
    };
    let local = Affine::rotate(-initial.rotation) * delta.to_point();
    let (dx, dy) = (local.x / scale, local.y / scale);

    let (w0, h0) = (initial.size.width, initial.size.height);
    let mut width = w0;
    let mut height = h0;
    if direction.east {
        width += dx;
    }
    if direction.west {
        width -= dx;
    }
    if direction.south {
        height += dy;
    }
    if direction.north {
        height -= dy;
    }

    match aspect_ratio.filter(|r| *r > 0.0 && r.is_finite()) {
        Some(ratio) => {
            let width_drives = if !direction.is_vertical() {
                true
            } else if !direction.is_horizontal() {
                false
            } else {
                (width - w0).abs() >= (height - h0).abs()
            };
            if width_drives {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
            if width < min_size {
                width = min_size;
                height = width / ratio;
            }
            if height < min_size {
                height = min_size;
                width = height * ratio;
            }
        }
        None => {
            width = width.max(min_size);
            height = height.max(min_size);
        }
    }

    let size = Size::new(width, height);
    let anchor_before = direction.anchor(initial.size);
    let anchor_after = direction.anchor(size);
    let target = initial.to_world(anchor_before);

    let mut result = Geometry {
        size,
        ..*initial
    };
    // Shift so the anchor lands where it was
    let landed = result.to_world(anchor_after);
    result.position += target - landed;
    result
}

/// Angle between the pointer and the rotation handle's rest direction,
/// captured at gesture start so the element does not jump.
pub fn rotation_offset(center: Point, pointer: Point, initial_rotation: f64) -> f64 {
    pointer_angle(center, pointer) - initial_rotation
}

/// Rotation for the current pointer sample.
pub fn rotation_angle(center: Point, pointer: Point, offset: f64) -> f64 {
    pointer_angle(center, pointer) - offset
}

fn pointer_angle(center: Point, pointer: Point) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x)
}

/// Snap an angle to the nearest multiple of `increment` (radians).
pub fn snap_angle(angle: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return angle;
    }
    (angle / increment).round() * increment
}

/// Two-finger state captured when a pinch starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchStart {
    pub distance: f64,
    pub angle: f64,
    pub midpoint: Point,
    pub geometry: Geometry,
}

impl PinchStart {
    /// Returns `None` if both fingers are on the same spot.
    pub fn new(a: Point, b: Point, geometry: Geometry) -> Option<Self> {
        let distance = a.distance(b);
        if distance < f64::EPSILON {
            return None;
        }
        Some(Self {
            distance,
            angle: pointer_angle(a, b),
            midpoint: a.midpoint(b),
            geometry,
        })
    }
}

/// Scale, rotation and translation for the current finger positions.
///
/// Scale is clamped so neither scaled dimension drops below `min_size`.
pub fn pinch(start: &PinchStart, a: Point, b: Point, min_size: f64) -> Geometry {
    let initial = start.geometry;
    let factor = a.distance(b) / start.distance;
    let mut scale = initial.scale * factor;

    let smallest = initial.size.width.min(initial.size.height);
    if smallest > 0.0 {
        let floor = (min_size / smallest).min(initial.scale);
        scale = scale.max(floor);
    }

    Geometry {
        position: initial.position + (a.midpoint(b) - start.midpoint),
        size: initial.size,
        rotation: initial.rotation + (pointer_angle(a, b) - start.angle),
        scale,
    }
}
