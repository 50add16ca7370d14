//! Shared numeric constants for the canvas crate.

// ── Sizing ──────────────────────────────────────────────────────

/// Smallest width an item can be resized to, in board pixels.
pub const MIN_ITEM_WIDTH: f64 = 100.0;

/// Smallest height an item can be resized to, in board pixels.
pub const MIN_ITEM_HEIGHT: f64 = 50.0;

/// Width given to a freshly uploaded item.
pub const UPLOAD_ITEM_WIDTH: f64 = 200.0;

/// Height given to a freshly uploaded item.
pub const UPLOAD_ITEM_HEIGHT: f64 = 150.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of the square resize handle at the bottom-right corner of the image.
pub const RESIZE_HANDLE_PX: f64 = 24.0;

/// Side length of one control button (edit, delete) in the top-right toolbar.
pub const CONTROL_BUTTON_PX: f64 = 24.0;

/// Inset of the control toolbar from the image's top and right edges.
pub const CONTROL_INSET_PX: f64 = 8.0;

// ── Style defaults ──────────────────────────────────────────────

/// Caption text color used when an item has none.
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

/// Caption background used when an item has none.
pub const DEFAULT_BACKGROUND_COLOR: &str = "rgba(0, 0, 0, 0.7)";

/// Opacity percentage the editor falls back to when a background carries no alpha.
pub const DEFAULT_OPACITY_PERCENT: u8 = 70;
