//! Shared numeric constants for the room planner.

// ── Placement ───────────────────────────────────────────────────

/// Offset from the room's top-left corner where new items land.
pub const DEFAULT_ITEM_INSET: f64 = 10.0;

/// Natural edge length of a freshly placed item, in surface units.
pub const DEFAULT_ITEM_SIZE: f64 = 100.0;

/// Items can never be resized below this edge length.
pub const MIN_ITEM_SIZE: f64 = 16.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in surface units for resize and rotate handles.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Distance from the top edge of the selected item to the rotate handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 24.0;

// ── Cursors ─────────────────────────────────────────────────────

/// Cursor shown while an item is being dragged.
pub const CURSOR_GRABBING: &str = "grabbing";

/// Cursor shown once a drag ends.
pub const CURSOR_GRAB: &str = "grab";
