//! Render sync: projects the scene onto a retained-mode render surface.
//!
//! The surface is anything that can create, update, and remove nodes keyed
//! by instance id (the DOM in the browser, a recorder in tests). [`RenderSync`]
//! keeps a mirror of the attributes it last pushed to each node so it can
//! reconcile by id: untouched items cost nothing, moved items get a single
//! update, and nodes are never torn down and rebuilt mid-drag.
//!
//! The mirror is derived data only. Dropping it (see [`RenderSync::reset`])
//! and syncing again against an empty surface reproduces the same picture.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use tracing::trace;

use crate::geom::{Point, Size};
use crate::scene::{InstanceId, PlacedItem, Scene};

/// Everything a surface needs to draw one placed item.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    pub image_url: String,
    /// Accessible label for the node.
    pub label: String,
    pub position: Point,
    pub size: Size,
    /// Clockwise degrees around the node center.
    pub rotation: f64,
    /// Stacking order; a larger value must paint above a smaller one.
    pub stacking: i64,
    pub selected: bool,
}

impl NodeAttrs {
    #[must_use]
    pub fn from_item(item: &PlacedItem) -> Self {
        Self {
            image_url: item.image_url.clone(),
            label: item.display_name.clone(),
            position: item.position,
            size: item.size,
            rotation: item.rotation,
            stacking: item.z_index,
            selected: item.selected,
        }
    }
}

/// A retained-mode target the scene is projected onto.
pub trait RenderSurface {
    type Error;

    /// Show `image` as the room photo, or the empty-room placeholder for `None`.
    ///
    /// # Errors
    ///
    /// Surface-specific failure.
    fn set_background(&mut self, image: Option<&str>) -> Result<(), Self::Error>;

    /// Create a node for a newly placed item.
    ///
    /// # Errors
    ///
    /// Surface-specific failure.
    fn create_node(&mut self, id: &InstanceId, attrs: &NodeAttrs) -> Result<(), Self::Error>;

    /// Update an existing node in place. `previous` is what was last pushed
    /// for this node, so the surface can skip attributes that did not change.
    ///
    /// # Errors
    ///
    /// Surface-specific failure.
    fn update_node(&mut self, id: &InstanceId, previous: &NodeAttrs, attrs: &NodeAttrs) -> Result<(), Self::Error>;

    /// Remove the node of an item that is no longer placed.
    ///
    /// # Errors
    ///
    /// Surface-specific failure.
    fn remove_node(&mut self, id: &InstanceId) -> Result<(), Self::Error>;
}

/// Reconciles a [`Scene`] against a [`RenderSurface`].
#[derive(Debug, Clone, Default)]
pub struct RenderSync {
    /// Background last pushed; outer `None` means never synced.
    background: Option<Option<String>>,
    nodes: HashMap<InstanceId, NodeAttrs>,
}

impl RenderSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring `surface` in line with `scene`, touching only what changed.
    ///
    /// Calling this twice without mutating the scene issues no surface calls
    /// the second time. New nodes are created in paint order.
    ///
    /// # Errors
    ///
    /// Stops at the first surface error. The mirror only records calls that
    /// succeeded, so the next sync retries whatever was left over.
    pub fn sync<S: RenderSurface>(&mut self, scene: &Scene, surface: &mut S) -> Result<(), S::Error> {
        let image = scene.background().image();
        if self.background.as_ref().map(Option::as_deref) != Some(image) {
            surface.set_background(image)?;
            self.background = Some(image.map(str::to_owned));
        }

        let stale: Vec<InstanceId> = self.nodes.keys().filter(|id| scene.get(id).is_none()).copied().collect();
        for id in stale {
            surface.remove_node(&id)?;
            self.nodes.remove(&id);
            trace!(instance_id = %id, "node removed");
        }

        for item in scene.paint_order() {
            let attrs = NodeAttrs::from_item(item);
            match self.nodes.get(&item.instance_id) {
                Some(current) if *current == attrs => {}
                Some(previous) => {
                    surface.update_node(&item.instance_id, previous, &attrs)?;
                    trace!(instance_id = %item.instance_id, "node updated");
                    self.nodes.insert(item.instance_id, attrs);
                }
                None => {
                    surface.create_node(&item.instance_id, &attrs)?;
                    trace!(instance_id = %item.instance_id, "node created");
                    self.nodes.insert(item.instance_id, attrs);
                }
            }
        }
        Ok(())
    }

    /// Forget everything pushed so far; the next sync recreates every node.
    pub fn reset(&mut self) {
        self.background = None;
        self.nodes.clear();
    }

    /// Number of nodes the surface is believed to hold.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
