//! Event router tying the scene, selection, and manipulation together.
//!
//! `EngineCore` is what the host talks to. Every handler consumes one
//! discrete event, runs to completion, and returns the [`Action`]s the host
//! should react to (re-render, change the cursor, refresh side panels).
//! Recoverable scene errors are logged and turned into "nothing happened";
//! the scene is never left half-updated.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogItem, Picker};
use crate::config::PlannerConfig;
use crate::consts::{CURSOR_GRAB, CURSOR_GRABBING};
use crate::geom::{Point, Size};
use crate::hit::{self, HitPart};
use crate::input::{Button, Key};
use crate::manipulation::Manipulator;
use crate::scene::{InstanceId, PlacedItem, Scene};

/// Actions returned from event handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ItemPlaced(PlacedItem),
    ItemRemoved { id: InstanceId },
    ItemTransformed { id: InstanceId },
    SelectionChanged(Option<InstanceId>),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state; everything that doesn't depend on the DOM.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub scene: Scene,
    pub picker: Picker,
    manipulator: Manipulator,
    /// Set between a pointer-down on an item and the matching pointer-up,
    /// even if the gesture itself was abandoned in between.
    pointer_captured: bool,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &PlannerConfig) -> Self {
        Self { scene: Scene::with_placement(config.placement), ..Self::default() }
    }

    // --- Background ---

    /// Load a new room photo. Every placed item and any gesture in progress is dropped.
    pub fn set_background(&mut self, image: impl Into<String>, bounds: Size) -> Vec<Action> {
        let had_selection = self.scene.selected().is_some();
        self.manipulator.cancel();
        self.scene.set_background(image, bounds);
        with_selection_change(had_selection, vec![Action::RenderNeeded])
    }

    /// The host failed to read the chosen photo; show the empty room again.
    pub fn clear_background(&mut self) -> Vec<Action> {
        let had_selection = self.scene.selected().is_some();
        self.manipulator.cancel();
        self.scene.clear_background();
        with_selection_change(had_selection, vec![Action::RenderNeeded])
    }

    /// The room container was resized.
    pub fn set_bounds(&mut self, bounds: Size) -> Vec<Action> {
        self.scene.set_bounds(bounds);
        vec![Action::RenderNeeded]
    }

    // --- Catalog ---

    /// Publish the outcome of a catalog load to the picker.
    pub fn apply_catalog(&mut self, result: &Result<Vec<CatalogItem>, CatalogError>) {
        self.picker.apply(result);
    }

    // --- Placement ---

    /// Place `item` and select it. Ignored (with a warning) without a background.
    pub fn place(&mut self, item: &CatalogItem) -> Vec<Action> {
        match self.scene.add_item(item) {
            Ok(placed) => {
                let id = placed.instance_id;
                vec![Action::ItemPlaced(placed.clone()), Action::SelectionChanged(Some(id)), Action::RenderNeeded]
            }
            Err(e) => {
                warn!(catalog_id = %item.id, error = %e, "placement rejected");
                Vec::new()
            }
        }
    }

    /// Place the picker entry with `catalog_id`.
    pub fn place_from_picker(&mut self, catalog_id: &str) -> Vec<Action> {
        let Some(item) = self.picker.find(catalog_id).cloned() else {
            warn!(%catalog_id, "unknown catalog id");
            return Vec::new();
        };
        self.place(&item)
    }

    /// Remove a placed item. Unknown ids are ignored.
    pub fn remove(&mut self, id: &InstanceId) -> Vec<Action> {
        let was_selected = self.scene.is_selected(id);
        if self.scene.remove_item(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::ItemRemoved { id: *id }];
        if was_selected {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove the active item, if any.
    pub fn remove_selected(&mut self) -> Vec<Action> {
        match self.scene.selected() {
            Some(id) => self.remove(&id),
            None => Vec::new(),
        }
    }

    // --- Selection ---

    pub fn select(&mut self, id: &InstanceId) -> Vec<Action> {
        let before = self.scene.selected();
        self.scene.select(id);
        self.selection_actions(before)
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        let before = self.scene.selected();
        self.scene.clear_selection();
        self.selection_actions(before)
    }

    fn selection_actions(&self, before: Option<InstanceId>) -> Vec<Action> {
        let after = self.scene.selected();
        if before == after {
            // Reselecting can still raise the item.
            return if after.is_some() { vec![Action::RenderNeeded] } else { Vec::new() };
        }
        vec![Action::SelectionChanged(after), Action::RenderNeeded]
    }

    // --- Input events ---

    /// Pointer pressed at `pt` (room-surface coordinates).
    ///
    /// A handle of the selected item starts a resize or rotate, an item body
    /// starts a drag, and empty surface deselects.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let before = self.scene.selected();

        let Some(hit) = hit::hit_test(pt, &self.scene) else {
            self.manipulator.cancel();
            self.scene.clear_selection();
            return self.selection_actions(before);
        };

        let id = hit.instance_id;
        let cursor = match hit.part {
            HitPart::Body => {
                self.manipulator.pointer_down(&mut self.scene, &id, pt);
                CURSOR_GRABBING
            }
            HitPart::ResizeHandle(anchor) => {
                self.manipulator.begin_resize(&mut self.scene, &id, anchor);
                anchor.cursor()
            }
            HitPart::RotateHandle => {
                self.manipulator.begin_rotate(&mut self.scene, &id, pt);
                CURSOR_GRABBING
            }
        };
        self.pointer_captured = true;
        debug!(instance_id = %id, part = ?hit.part, "pointer down on item");

        let mut actions = self.selection_actions(before);
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions.push(Action::SetCursor(cursor.to_owned()));
        actions
    }

    /// Pointer moved to `pt`. Only does anything while a gesture is live.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match self.manipulator.pointer_move(&mut self.scene, pt) {
            Some(id) => vec![Action::ItemTransformed { id }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Pointer released. Ends any gesture and restores the cursor.
    pub fn on_pointer_up(&mut self, _pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.pointer_captured {
            return Vec::new();
        }
        self.pointer_captured = false;
        self.manipulator.pointer_up(&self.scene);
        vec![Action::SetCursor(CURSOR_GRAB.to_owned())]
    }

    /// `Delete`/`Backspace` removes the active item, `Escape` deselects it.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_delete() {
            self.manipulator.cancel();
            return self.remove_selected();
        }
        if key.is_escape() {
            self.manipulator.cancel();
            return self.deselect();
        }
        Vec::new()
    }

    // --- Queries ---

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<InstanceId> {
        self.scene.selected()
    }

    /// Look up a placed item by id.
    #[must_use]
    pub fn item(&self, id: &InstanceId) -> Option<&PlacedItem> {
        self.scene.get(id)
    }

    /// Whether a gesture is live.
    #[must_use]
    pub fn is_manipulating(&self) -> bool {
        self.manipulator.active_item(&self.scene).is_some()
    }
}

fn with_selection_change(had_selection: bool, mut actions: Vec<Action>) -> Vec<Action> {
    if had_selection {
        actions.insert(0, Action::SelectionChanged(None));
    }
    actions
}
