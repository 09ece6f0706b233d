//! Selection controller: at most one placed item is active at a time.
//!
//! Selecting an item always brings it to the front. The scene also keeps a
//! selection epoch, bumped whenever the active item changes, so that an
//! in-flight gesture can tell the selection moved out from under it even if
//! the same item was later selected again.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::debug;

use super::{InstanceId, Scene};

impl Scene {
    /// Make `id` the active item and raise it above every other item.
    ///
    /// Any previously selected item is deselected in the same call. Selecting
    /// the item that is already active and topmost changes nothing. Unknown
    /// ids are ignored.
    pub fn select(&mut self, id: &InstanceId) {
        if !self.items.contains_key(id) {
            return;
        }

        if self.selected.as_ref() != Some(id) {
            if let Some(prev) = self.selected.take() {
                if let Some(item) = self.items.get_mut(&prev) {
                    item.selected = false;
                }
                debug!(instance_id = %prev, "item deselected");
            }
            self.selected = Some(*id);
            self.selection_epoch += 1;
        }

        let max_z = self.max_z();
        if let Some(item) = self.items.get_mut(id) {
            item.selected = true;
            if item.z_index != max_z {
                item.z_index = max_z + 1;
            }
            debug!(instance_id = %id, z_index = item.z_index, "item selected");
        }
    }

    /// Deselect `id` if it is the active item; otherwise do nothing.
    pub fn deselect(&mut self, id: &InstanceId) {
        if self.selected.as_ref() == Some(id) {
            self.clear_selection();
        }
    }

    /// Deselect whatever is active, if anything.
    pub fn clear_selection(&mut self) {
        let Some(prev) = self.selected.take() else {
            return;
        };
        if let Some(item) = self.items.get_mut(&prev) {
            item.selected = false;
        }
        self.selection_epoch += 1;
        debug!(instance_id = %prev, "item deselected");
    }

    /// The active item's id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<InstanceId> {
        self.selected
    }

    /// Counter bumped on every change of the active item.
    #[must_use]
    pub fn selection_epoch(&self) -> u64 {
        self.selection_epoch
    }

    /// Whether `id` is the active item.
    #[must_use]
    pub fn is_selected(&self, id: &InstanceId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}
