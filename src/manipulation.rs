//! Manipulation controller: turns pointer gestures into item transforms.
//!
//! A gesture is `pointer_down` (or `begin_resize` / `begin_rotate`), any
//! number of `pointer_move`s, then `pointer_up`. Starting a gesture selects
//! its item. Each move is computed from what was captured at pointer-down and
//! the latest pointer position only, so repeated moves never accumulate
//! drift.
//!
//! A gesture is anchored to one item and one selection epoch. If the item is
//! removed, deselected, or another item becomes active, the gesture is
//! abandoned: later moves and the final pointer-up do nothing, and nothing
//! is ever retargeted to a different item.

#[cfg(test)]
#[path = "manipulation_test.rs"]
mod manipulation_test;

use tracing::debug;

use crate::consts::MIN_ITEM_SIZE;
use crate::geom::{Point, Size};
use crate::hit::ResizeAnchor;
use crate::input::GestureState;
use crate::scene::{InstanceId, Scene, TransformPatch};

#[derive(Debug, Clone, Default)]
pub struct Manipulator {
    state: GestureState,
}

impl Manipulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// The item the live gesture targets, if one is in progress and still valid.
    #[must_use]
    pub fn active_item(&self, scene: &Scene) -> Option<InstanceId> {
        let (id, epoch) = self.state.target()?;
        (scene.selection_epoch() == epoch && scene.is_selected(&id)).then_some(id)
    }

    /// Start dragging `id`. Selects it first. Returns `false` (and stays idle)
    /// if the item does not exist.
    pub fn pointer_down(&mut self, scene: &mut Scene, id: &InstanceId, pointer: Point) -> bool {
        scene.select(id);
        let Some(item) = scene.get(id) else {
            self.state = GestureState::Idle;
            return false;
        };
        self.state = GestureState::Dragging {
            id: *id,
            epoch: scene.selection_epoch(),
            anchor_offset: pointer - item.position,
        };
        debug!(instance_id = %id, "drag started");
        true
    }

    /// Start resizing `id` from the handle at `anchor`.
    pub fn begin_resize(&mut self, scene: &mut Scene, id: &InstanceId, anchor: ResizeAnchor) -> bool {
        scene.select(id);
        let Some(item) = scene.get(id) else {
            self.state = GestureState::Idle;
            return false;
        };
        self.state = GestureState::Resizing {
            id: *id,
            epoch: scene.selection_epoch(),
            anchor,
            orig_position: item.position,
            orig_size: item.size,
            orig_rotation: item.rotation,
        };
        debug!(instance_id = %id, ?anchor, "resize started");
        true
    }

    /// Start rotating `id` around its center.
    pub fn begin_rotate(&mut self, scene: &mut Scene, id: &InstanceId, pointer: Point) -> bool {
        scene.select(id);
        let Some(item) = scene.get(id) else {
            self.state = GestureState::Idle;
            return false;
        };
        let center = item.center();
        self.state = GestureState::Rotating {
            id: *id,
            epoch: scene.selection_epoch(),
            center,
            start_angle: pointer.angle_from(center),
            orig_rotation: item.rotation,
        };
        debug!(instance_id = %id, "rotate started");
        true
    }

    /// Apply the live gesture for the latest pointer position.
    ///
    /// Returns the id of the item that changed, or `None` when there is no
    /// live gesture (never started, already ended, or abandoned).
    pub fn pointer_move(&mut self, scene: &mut Scene, pointer: Point) -> Option<InstanceId> {
        let id = self.live_target(scene)?;
        let patch = match self.state {
            GestureState::Idle => return None,
            GestureState::Dragging { anchor_offset, .. } => TransformPatch::position(pointer - anchor_offset),
            GestureState::Resizing { anchor, orig_position, orig_size, orig_rotation, .. } => {
                resize_patch(anchor, orig_position, orig_size, orig_rotation, pointer)
            }
            GestureState::Rotating { center, start_angle, orig_rotation, .. } => {
                TransformPatch::rotation(orig_rotation + pointer.angle_from(center) - start_angle)
            }
        };

        match scene.update_transform(&id, &patch) {
            Ok(_) => Some(id),
            Err(e) => {
                debug!(instance_id = %id, error = %e, "gesture abandoned");
                self.state = GestureState::Idle;
                None
            }
        }
    }

    /// End the gesture. Returns the item it was manipulating if the gesture
    /// was still live.
    pub fn pointer_up(&mut self, scene: &Scene) -> Option<InstanceId> {
        let live = self.live_target(scene);
        self.state = GestureState::Idle;
        if let Some(id) = live {
            debug!(instance_id = %id, "gesture ended");
        }
        live
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    fn live_target(&mut self, scene: &Scene) -> Option<InstanceId> {
        let (id, _) = self.state.target()?;
        let live = self.active_item(scene);
        if live.is_none() {
            debug!(instance_id = %id, "gesture target no longer selected; abandoning");
            self.state = GestureState::Idle;
        }
        live
    }
}

/// Compute the transform for resizing from `anchor` with the opposite edges
/// held fixed, working in the item's unrotated frame as it was at
/// pointer-down.
fn resize_patch(
    anchor: ResizeAnchor,
    orig_position: Point,
    orig_size: Size,
    orig_rotation: f64,
    pointer: Point,
) -> TransformPatch {
    let orig_center = Point::new(orig_position.x + orig_size.width / 2.0, orig_position.y + orig_size.height / 2.0);
    let local = pointer.rotate_about(orig_center, -orig_rotation) - orig_position;

    let (mut left, mut right) = (0.0, orig_size.width);
    let (mut top, mut bottom) = (0.0, orig_size.height);
    if anchor.moves_left() {
        left = local.x.min(right - MIN_ITEM_SIZE);
    }
    if anchor.moves_right() {
        right = local.x.max(left + MIN_ITEM_SIZE);
    }
    if anchor.moves_top() {
        top = local.y.min(bottom - MIN_ITEM_SIZE);
    }
    if anchor.moves_bottom() {
        bottom = local.y.max(top + MIN_ITEM_SIZE);
    }

    let size = Size::new(right - left, bottom - top);
    let local_center = Point::new((left + right) / 2.0, (top + bottom) / 2.0);
    let center = (local_center + orig_position).rotate_about(orig_center, orig_rotation);
    TransformPatch {
        position: Some(Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)),
        size: Some(size),
        rotation: None,
    }
}
