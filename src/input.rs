//! Input model: pointer buttons, keys, and the gesture state machine.
//!
//! `GestureState` is the active gesture tracked between pointer-down and
//! pointer-up. Every active variant carries what was captured at
//! pointer-down, so each pointer-move can be computed from that fixed start
//! and the latest pointer position alone.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::{Point, Size};
use crate::hit::ResizeAnchor;
use crate::scene::InstanceId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, single-finger touch, or pen contact.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key removes the selected item.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Internal state for the gesture state machine.
///
/// `epoch` is the scene's selection epoch at pointer-down. If it changes, the
/// item was deselected (or something else was selected) mid-gesture and the
/// gesture is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving the selected item.
    Dragging {
        id: InstanceId,
        epoch: u64,
        /// Pointer position minus item position at pointer-down.
        anchor_offset: Point,
    },
    /// Resizing the selected item by one of its eight handles.
    Resizing {
        id: InstanceId,
        epoch: u64,
        anchor: ResizeAnchor,
        /// Item position at pointer-down.
        orig_position: Point,
        /// Item size at pointer-down.
        orig_size: Size,
        /// Item rotation at pointer-down; fixes the local frame for the gesture.
        orig_rotation: f64,
    },
    /// Rotating the selected item around its center.
    Rotating {
        id: InstanceId,
        epoch: u64,
        /// Rotation pivot.
        center: Point,
        /// Angle of the pointer around `center` at pointer-down.
        start_angle: f64,
        /// Item rotation at pointer-down.
        orig_rotation: f64,
    },
}

impl GestureState {
    /// The item this gesture is anchored to, if any.
    #[must_use]
    pub fn target(&self) -> Option<(InstanceId, u64)> {
        match *self {
            Self::Idle => None,
            Self::Dragging { id, epoch, .. } | Self::Resizing { id, epoch, .. } | Self::Rotating { id, epoch, .. } => {
                Some((id, epoch))
            }
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
