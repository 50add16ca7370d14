//! Input model: mouse buttons and the gesture state machine.
//!
//! `GestureState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each active variant carries all context captured at
//! pointer-down, so moves compute positions from a fixed anchor and release
//! can emit one final mutation without consulting anything else.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ItemId;
use crate::geom::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an item across the board.
    Dragging {
        /// Id of the item being dragged.
        id: ItemId,
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Item x at the start of the drag.
        orig_x: f64,
        /// Item y at the start of the drag.
        orig_y: f64,
        /// Z-index the item was elevated to at pointer-down.
        z_index: i32,
    },
    /// The user is resizing an item from its bottom-right handle.
    Resizing {
        /// Id of the item being resized.
        id: ItemId,
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Item width at the start of the resize.
        orig_w: f64,
        /// Item height at the start of the resize.
        orig_h: f64,
    },
}

impl GestureState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The item the active gesture targets.
    #[must_use]
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(*id),
        }
    }
}
