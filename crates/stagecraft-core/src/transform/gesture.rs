//! Gesture recognizers driving live updates.

use super::{
    Geometry, GestureTarget, PinchStart, ResizeHandle, drag, pinch, resize, resolve_gesture_target,
    rotation_angle, rotation_offset, snap_angle,
};
use crate::editor::EditorStore;
use crate::element::{Element, ElementId, ElementPatch};
use crate::hit_test::{HitTestResolver, Rasterizer};
use crate::input::{Modifiers, TouchEvent, TouchTracker};
use crate::schedule::FrameCoalescer;
use kurbo::Point;

/// Which recognizer is running, with its start snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureKind {
    Drag { start_pointer: Point },
    Resize {
        handle: ResizeHandle,
        start_pointer: Point,
        aspect_ratio: Option<f64>,
    },
    Rotate { offset: f64 },
    Pinch(PinchStart),
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    element_id: ElementId,
    initial: Geometry,
    kind: GestureKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sample {
    Pointer { point: Point, modifiers: Modifiers },
    Touches(Point, Point),
}

/// Runs at most one gesture at a time against an [`EditorStore`].
///
/// Move samples are coalesced: only the latest one is applied, once per
/// animation frame. Ending a gesture (pointer up or touch cancel alike)
/// applies the last sample as a live update, commits one undo step and
/// leaves the element on top.
#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<ActiveGesture>,
    frames: FrameCoalescer<Sample>,
    last_sample: Option<Sample>,
    touches: TouchTracker,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active.map(|g| g.element_id)
    }

    pub fn kind(&self) -> Option<GestureKind> {
        self.active.map(|g| g.kind)
    }

    /// Start dragging an element.
    pub fn begin_drag(&mut self, store: &mut EditorStore, id: ElementId, pointer: Point) -> bool {
        self.begin(store, id, |_| Some(GestureKind::Drag { start_pointer: pointer }))
    }

    /// Start dragging a resize handle.
    pub fn begin_resize(
        &mut self,
        store: &mut EditorStore,
        id: ElementId,
        handle: ResizeHandle,
        pointer: Point,
    ) -> bool {
        self.begin(store, id, |element| {
            Some(GestureKind::Resize {
                handle,
                start_pointer: pointer,
                aspect_ratio: element
                    .locks_aspect_ratio()
                    .then(|| element.aspect_ratio())
                    .flatten(),
            })
        })
    }

    /// Start dragging the rotate handle.
    pub fn begin_rotate(&mut self, store: &mut EditorStore, id: ElementId, pointer: Point) -> bool {
        self.begin(store, id, |element| {
            Some(GestureKind::Rotate {
                offset: rotation_offset(element.center(), pointer, element.rotation),
            })
        })
    }

    /// Start a two-finger pinch/rotate.
    pub fn begin_pinch(&mut self, store: &mut EditorStore, id: ElementId, a: Point, b: Point) -> bool {
        self.begin(store, id, |element| {
            PinchStart::new(a, b, Geometry::from_element(element)).map(GestureKind::Pinch)
        })
    }

    fn begin(
        &mut self,
        store: &mut EditorStore,
        id: ElementId,
        start: impl FnOnce(&Element) -> Option<GestureKind>,
    ) -> bool {
        if store.is_game_mode() {
            return false;
        }
        // A new gesture finalizes whatever was running
        self.end(store);

        let Some(element) = store.element(id) else {
            log::warn!("Gesture start: element {id} not found");
            return false;
        };
        if element.is_background() {
            return false;
        }
        let initial = Geometry::from_element(element);
        let Some(kind) = start(element) else {
            return false;
        };

        log::debug!("Begin {kind:?} on {id}");
        self.active = Some(ActiveGesture {
            element_id: id,
            initial,
            kind,
        });
        store.lift_element(id);
        true
    }

    /// Resolve a pointer-down and start the matching gesture.
    ///
    /// Handles of the selected element take priority over anything else;
    /// otherwise the element `resolver` finds under the pointer is selected
    /// and dragged.
    pub fn pointer_down<R: Rasterizer>(
        &mut self,
        store: &mut EditorStore,
        resolver: &mut HitTestResolver<R>,
        point: Point,
    ) -> Option<GestureTarget> {
        if store.is_game_mode() {
            return None;
        }
        let tolerance = store.config().handle_hit_tolerance;

        let handle = store
            .active_element()
            .and_then(|e| resolve_gesture_target(e, point, tolerance).map(|t| (e.id, t)))
            .filter(|(_, t)| *t != GestureTarget::Body);
        let (id, target) = match handle {
            Some(hit) => hit,
            None => {
                let id = resolver.resolve(store, point)?;
                store.select(id);
                (id, GestureTarget::Body)
            }
        };

        let started = match target {
            GestureTarget::Resize(handle) => self.begin_resize(store, id, handle, point),
            GestureTarget::Rotate => self.begin_rotate(store, id, point),
            GestureTarget::Body => self.begin_drag(store, id, point),
        };
        started.then_some(target)
    }

    /// Queue a pointer sample for the next frame.
    pub fn pointer_move(&mut self, point: Point, modifiers: Modifiers) {
        if self.active.is_some() {
            self.frames.queue(Sample::Pointer { point, modifiers });
        }
    }

    /// Feed a touch event. Two fingers on an element start a pinch.
    pub fn touch(&mut self, store: &mut EditorStore, event: &TouchEvent) {
        self.touches.apply(event);
        match (self.touches.pair(), self.active) {
            (Some((a, b)), Some(gesture)) => match gesture.kind {
                GestureKind::Pinch(_) => self.frames.queue(Sample::Touches(a, b)),
                _ => {
                    self.begin_pinch(store, gesture.element_id, a, b);
                }
            },
            (Some((a, b)), None) => {
                if let Some(id) = store.active_element_id() {
                    self.begin_pinch(store, id, a, b);
                }
            }
            (None, Some(gesture)) => {
                if self.touches.count() == 0 {
                    self.end(store);
                } else if let (GestureKind::Drag { .. }, Some(point)) = (gesture.kind, self.touches.primary()) {
                    self.pointer_move(point, Modifiers::NONE);
                } else if matches!(gesture.kind, GestureKind::Pinch(_)) {
                    // One finger lifted mid-pinch
                    self.end(store);
                }
            }
            (None, None) => {}
        }
    }

    /// Apply the pending sample, at most one live write per frame.
    pub fn on_animation_frame(&mut self, store: &mut EditorStore) -> bool {
        match self.frames.take() {
            Some(sample) => self.apply(store, sample),
            None => false,
        }
    }

    /// Finish the gesture: final live update, one commit, settle stacking.
    pub fn end(&mut self, store: &mut EditorStore) -> bool {
        let Some(gesture) = self.active else {
            return false;
        };
        if let Some(sample) = self.frames.take().or(self.last_sample) {
            self.apply(store, sample);
        } else {
            // Nothing moved; still register the gesture as one step
            store.update_element_without_history(gesture.element_id, &ElementPatch::new());
        }
        store.commit_to_history();
        store.settle_element(gesture.element_id);
        log::debug!("End {:?} on {}", gesture.kind, gesture.element_id);

        self.active = None;
        self.last_sample = None;
        self.frames.cancel();
        true
    }

    /// Pointer lost. Behaves exactly like [`Self::end`].
    pub fn cancel(&mut self, store: &mut EditorStore) -> bool {
        self.touches.clear();
        self.end(store)
    }

    fn apply(&mut self, store: &mut EditorStore, sample: Sample) -> bool {
        let Some(gesture) = self.active else {
            return false;
        };
        let Some(patch) = Self::patch_for(&gesture, sample, store) else {
            return false;
        };
        self.last_sample = Some(sample);
        store.update_element_without_history(gesture.element_id, &patch)
    }

    fn patch_for(gesture: &ActiveGesture, sample: Sample, store: &EditorStore) -> Option<ElementPatch> {
        let config = store.config();
        let initial = &gesture.initial;
        let patch = match (gesture.kind, sample) {
            (GestureKind::Drag { start_pointer }, Sample::Pointer { point, .. }) => {
                ElementPatch::new().with_position(drag(initial.position, start_pointer, point))
            }
            (
                GestureKind::Resize {
                    handle,
                    start_pointer,
                    aspect_ratio,
                },
                Sample::Pointer { point, .. },
            ) => {
                let result = resize(
                    initial,
                    handle.direction(),
                    point - start_pointer,
                    aspect_ratio,
                    config.min_element_size,
                );
                ElementPatch::new()
                    .with_position(result.position)
                    .with_size(result.size)
            }
            (GestureKind::Rotate { offset }, Sample::Pointer { point, modifiers }) => {
                let mut angle = rotation_angle(initial.center(), point, offset);
                if modifiers.shift {
                    angle = snap_angle(angle, config.rotation_snap());
                }
                ElementPatch::new().with_rotation(angle)
            }
            (GestureKind::Pinch(start), Sample::Touches(a, b)) => {
                let result = pinch(&start, a, b, config.min_element_size);
                ElementPatch::new()
                    .with_position(result.position)
                    .with_rotation(result.rotation)
                    .with_scale(result.scale)
            }
            _ => return None,
        };
        Some(patch)
    }
}
