//! Hit-testing: which placed item, or which handle of the selected item,
//! lies under a point on the room surface.
//!
//! Handles live in the item's rotated local frame, so points are mapped into
//! that frame before measuring distances.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS, ROTATE_HANDLE_OFFSET};
use crate::geom::{Point, Size};
use crate::scene::{InstanceId, PlacedItem, Scene};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    /// Handle position in the item's unrotated local frame.
    #[must_use]
    pub fn local_position(self, size: Size) -> Point {
        let (w, h) = (size.width, size.height);
        match self {
            Self::N => Point::new(w / 2.0, 0.0),
            Self::Ne => Point::new(w, 0.0),
            Self::E => Point::new(w, h / 2.0),
            Self::Se => Point::new(w, h),
            Self::S => Point::new(w / 2.0, h),
            Self::Sw => Point::new(0.0, h),
            Self::W => Point::new(0.0, h / 2.0),
            Self::Nw => Point::new(0.0, 0.0),
        }
    }

    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }

    /// CSS cursor for this handle, ignoring item rotation.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub instance_id: InstanceId,
    pub part: HitPart,
}

/// Rotate-handle position in the item's unrotated local frame.
#[must_use]
pub fn rotate_handle_local(size: Size) -> Point {
    Point::new(size.width / 2.0, -ROTATE_HANDLE_OFFSET)
}

/// Test which item (if any) is under `pt`.
///
/// Handles of the selected item win over any body, so a handle that overlaps
/// a higher item (or pokes past the room edge) is still grabbable. Bodies are
/// then tested top-down in paint order; points outside the room bounds (when
/// known) never hit a body.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene) -> Option<Hit> {
    if let Some(item) = scene.selected().and_then(|id| scene.get(&id)) {
        if let Some(part) = handle_at(pt, item) {
            return Some(Hit { instance_id: item.instance_id, part });
        }
    }

    let bounds = scene.background().bounds();
    if bounds.width > 0.0 && bounds.height > 0.0 && !bounds.contains(pt) {
        return None;
    }

    scene
        .paint_order()
        .into_iter()
        .rev()
        .find(|item| item.contains(pt))
        .map(|item| Hit { instance_id: item.instance_id, part: HitPart::Body })
}

fn handle_at(pt: Point, item: &PlacedItem) -> Option<HitPart> {
    let local = item.to_local(pt);
    if local.distance(rotate_handle_local(item.size)) <= HANDLE_RADIUS {
        return Some(HitPart::RotateHandle);
    }
    ResizeAnchor::ALL
        .into_iter()
        .find(|anchor| local.distance(anchor.local_position(item.size)) <= HANDLE_RADIUS)
        .map(HitPart::ResizeHandle)
}
