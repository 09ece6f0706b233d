//! Scene model: the room photo and the furniture placed on top of it.
//!
//! A [`Scene`] owns one [`RoomSurface`] and an arena of [`PlacedItem`]s keyed
//! by [`InstanceId`]. Iteration follows insertion order; paint order follows
//! `z_index`, which is always assigned as `max + 1` so values stay unique.
//!
//! The current selection is a private field of the scene. It is only changed
//! through the operations in [`selection`], which keep the per-item
//! `selected` flags and the scene-level field in agreement.
//!
//! Every public operation runs to completion before returning; there is no
//! window in which another event can observe a half-applied mutation.

pub mod selection;


use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{CatalogId, CatalogItem};
use crate::consts::{DEFAULT_ITEM_INSET, DEFAULT_ITEM_SIZE, MIN_ITEM_SIZE};
use crate::geom::{Point, Size, normalize_degrees};

/// Unique identifier of one placement. Distinct from the catalog id: the same
/// catalog item may be placed several times.
pub type InstanceId = Uuid;

/// Errors returned by scene mutations. None of them leave the scene modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Items can only be placed once a room photo is loaded.
    #[error("no background image loaded")]
    NoBackground,
    /// No placed item has this instance id.
    #[error("placed item not found: {0}")]
    NotFound(InstanceId),
    /// Transforms may only target the current selection.
    #[error("placed item is not selected: {0}")]
    NotSelected(InstanceId),
}

/// The background plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomSurface {
    image: Option<String>,
    bounds: Size,
}

impl RoomSurface {
    /// The opaque image source (data URL or object URL), if one is loaded.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Display size of the room. Zero when the host has not reported it.
    #[must_use]
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Where and how big new items are when they are first placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementDefaults {
    /// Offset from the top-left corner of the room, applied on both axes.
    pub inset: f64,
    /// Natural edge length; new items are square.
    pub size: f64,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self { inset: DEFAULT_ITEM_INSET, size: DEFAULT_ITEM_SIZE }
    }
}

/// One placement of a catalog item on the room surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedItem {
    /// Identity of this placement.
    pub instance_id: InstanceId,
    /// Lookup key back into the catalog. Never an ownership edge.
    pub catalog_id: CatalogId,
    /// Display name captured at placement time.
    pub display_name: String,
    /// Full-resolution image captured at placement time.
    pub image_url: String,
    /// Top-left corner of the unrotated box, in surface units.
    pub position: Point,
    pub size: Size,
    /// Clockwise rotation in degrees around the box center, in `[0, 360)`.
    pub rotation: f64,
    /// Stacking order; higher values paint later.
    pub z_index: i64,
    /// Whether this is the scene's active item.
    pub selected: bool,
}

impl PlacedItem {
    /// Center of the box; the rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.size.width / 2.0, self.position.y + self.size.height / 2.0)
    }

    /// Map a surface point into the item's unrotated frame, where the box
    /// spans `(0, 0)..(width, height)`.
    #[must_use]
    pub fn to_local(&self, surface_pt: Point) -> Point {
        surface_pt.rotate_about(self.center(), -self.rotation) - self.position
    }

    /// Map a point in the item's unrotated frame back to surface coordinates.
    #[must_use]
    pub fn to_surface(&self, local_pt: Point) -> Point {
        (local_pt + self.position).rotate_about(self.center(), self.rotation)
    }

    /// Whether `surface_pt` falls on the (rotated) item.
    #[must_use]
    pub fn contains(&self, surface_pt: Point) -> bool {
        self.size.contains(self.to_local(surface_pt))
    }
}

/// Sparse transform update. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl TransformPatch {
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Default::default() }
    }

    #[must_use]
    pub fn rotation(degrees: f64) -> Self {
        Self { rotation: Some(degrees), ..Default::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.size.is_none() && self.rotation.is_none()
    }
}

/// The room photo plus everything placed on it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    surface: RoomSurface,
    items: HashMap<InstanceId, PlacedItem>,
    order: Vec<InstanceId>,
    selected: Option<InstanceId>,
    selection_epoch: u64,
    placement: PlacementDefaults,
}

impl Scene {
    /// Create an empty scene with no background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with custom placement defaults.
    #[must_use]
    pub fn with_placement(placement: PlacementDefaults) -> Self {
        Self { placement, ..Self::default() }
    }

    // --- Background ---

    /// Replace the room photo. Destroys every placed item and the selection.
    pub fn set_background(&mut self, image: impl Into<String>, bounds: Size) {
        let removed = self.items.len();
        self.surface = RoomSurface { image: Some(image.into()), bounds };
        self.discard_items();
        info!(removed, width = bounds.width, height = bounds.height, "room background replaced");
    }

    /// Drop the room photo (the host failed to read the new file). Placed
    /// items are cleared as with [`Scene::set_background`].
    pub fn clear_background(&mut self) {
        self.surface = RoomSurface::default();
        self.discard_items();
        info!("room background cleared");
    }

    /// Update the displayed room size without touching the layout.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.surface.bounds = bounds;
    }

    fn discard_items(&mut self) {
        self.items.clear();
        self.order.clear();
        self.clear_selection();
    }

    // --- Items ---

    /// Place a new instance of `item` and make it the active selection.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoBackground`] if no room photo is loaded.
    pub fn add_item(&mut self, item: &CatalogItem) -> Result<&PlacedItem, SceneError> {
        if !self.surface.has_image() {
            return Err(SceneError::NoBackground);
        }

        let instance_id = Uuid::new_v4();
        let placed = PlacedItem {
            instance_id,
            catalog_id: item.id.clone(),
            display_name: item.display_name.clone(),
            image_url: item.full_image_url.clone(),
            position: Point::new(self.placement.inset, self.placement.inset),
            size: Size::new(self.placement.size, self.placement.size),
            rotation: 0.0,
            z_index: self.max_z() + 1,
            selected: false,
        };
        self.items.insert(instance_id, placed);
        self.order.push(instance_id);
        info!(%instance_id, catalog_id = %item.id, "item placed");

        self.select(&instance_id);
        self.items.get(&instance_id).ok_or(SceneError::NotFound(instance_id))
    }

    /// Delete a placed item. Clears the selection if it was selected; another
    /// item is not selected in its place. Absent ids are ignored.
    pub fn remove_item(&mut self, id: &InstanceId) -> Option<PlacedItem> {
        let removed = self.items.remove(id)?;
        self.order.retain(|o| o != id);
        if self.selected.as_ref() == Some(id) {
            self.clear_selection();
        }
        info!(instance_id = %id, "item removed");
        Some(removed)
    }

    /// Apply a sparse transform to the selected item.
    ///
    /// Sizes are floored at the minimum item size and rotation is wrapped
    /// into `[0, 360)`. Non-finite components are ignored.
    ///
    /// # Errors
    ///
    /// - [`SceneError::NotFound`] if `id` is not placed.
    /// - [`SceneError::NotSelected`] if `id` is not the current selection.
    pub fn update_transform(&mut self, id: &InstanceId, patch: &TransformPatch) -> Result<&PlacedItem, SceneError> {
        if !self.items.contains_key(id) {
            return Err(SceneError::NotFound(*id));
        }
        if self.selected.as_ref() != Some(id) {
            return Err(SceneError::NotSelected(*id));
        }
        let Some(item) = self.items.get_mut(id) else {
            return Err(SceneError::NotFound(*id));
        };

        if let Some(p) = patch.position {
            if p.x.is_finite() && p.y.is_finite() {
                item.position = p;
            } else {
                warn!(instance_id = %id, "ignoring non-finite position");
            }
        }
        if let Some(s) = patch.size {
            if s.width.is_finite() && s.height.is_finite() {
                item.size = Size::new(s.width.max(MIN_ITEM_SIZE), s.height.max(MIN_ITEM_SIZE));
            } else {
                warn!(instance_id = %id, "ignoring non-finite size");
            }
        }
        if let Some(r) = patch.rotation {
            if r.is_finite() {
                item.rotation = normalize_degrees(r);
            } else {
                warn!(instance_id = %id, "ignoring non-finite rotation");
            }
        }
        debug!(instance_id = %id, ?patch, "transform applied");
        Ok(item)
    }

    // --- Queries ---

    #[must_use]
    pub fn background(&self) -> &RoomSurface {
        &self.surface
    }

    #[must_use]
    pub fn placement(&self) -> PlacementDefaults {
        self.placement
    }

    #[must_use]
    pub fn get(&self, id: &InstanceId) -> Option<&PlacedItem> {
        self.items.get(id)
    }

    /// Placed items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Placed items sorted bottom to top: `(z_index, insertion order)`.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&PlacedItem> {
        let mut items: Vec<(usize, &PlacedItem)> = self.items().enumerate().collect();
        items.sort_by(|(ia, a), (ib, b)| a.z_index.cmp(&b.z_index).then_with(|| ia.cmp(ib)));
        items.into_iter().map(|(_, item)| item).collect()
    }

    /// The topmost item under `pt`, counting the selected item's handles.
    #[must_use]
    pub fn item_at(&self, pt: Point) -> Option<InstanceId> {
        crate::hit::hit_test(pt, self).map(|hit| hit.instance_id)
    }

    /// Highest `z_index` in the scene, or 0 when empty.
    #[must_use]
    pub fn max_z(&self) -> i64 {
        self.items.values().map(|item| item.z_index).max().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
