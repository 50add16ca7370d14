#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{CONTROL_BUTTON_PX, CONTROL_INSET_PX, RESIZE_HANDLE_PX};
use crate::doc::{BoardItem, DocStore, ItemId};
use crate::geom::{Point, Rect};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The image body; starts a drag.
    Body,
    /// Bottom-right resize handle; starts a resize.
    ResizeHandle,
    /// Edit control in the top-right toolbar.
    EditButton,
    /// Delete control in the top-right toolbar.
    DeleteButton,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Find the topmost item under `pt` and which part of it was hit.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore) -> Option<Hit> {
    doc.sorted_items()
        .into_iter()
        .rev()
        .find_map(|item| part_at(item, pt).map(|part| Hit { item_id: item.id, part }))
}

/// Which part of `item` lies under `pt`, checking controls before the body.
#[must_use]
pub fn part_at(item: &BoardItem, pt: Point) -> Option<HitPart> {
    let body = Rect::new(item.x_position, item.y_position, item.width, item.height);
    if !body.contains(pt) {
        return None;
    }
    if delete_button_rect(item).contains(pt) {
        return Some(HitPart::DeleteButton);
    }
    if edit_button_rect(item).contains(pt) {
        return Some(HitPart::EditButton);
    }
    if resize_handle_rect(item).contains(pt) {
        return Some(HitPart::ResizeHandle);
    }
    Some(HitPart::Body)
}

/// Bounds of the delete control, flush with the toolbar's right inset.
#[must_use]
pub fn delete_button_rect(item: &BoardItem) -> Rect {
    Rect::new(
        item.x_position + item.width - CONTROL_INSET_PX - CONTROL_BUTTON_PX,
        item.y_position + CONTROL_INSET_PX,
        CONTROL_BUTTON_PX,
        CONTROL_BUTTON_PX,
    )
}

/// Bounds of the edit control, immediately left of the delete control.
#[must_use]
pub fn edit_button_rect(item: &BoardItem) -> Rect {
    Rect::new(
        item.x_position + item.width - CONTROL_INSET_PX - 2.0 * CONTROL_BUTTON_PX,
        item.y_position + CONTROL_INSET_PX,
        CONTROL_BUTTON_PX,
        CONTROL_BUTTON_PX,
    )
}

/// Bounds of the resize handle in the image's bottom-right corner.
#[must_use]
pub fn resize_handle_rect(item: &BoardItem) -> Rect {
    Rect::new(
        item.x_position + item.width - RESIZE_HANDLE_PX,
        item.y_position + item.height - RESIZE_HANDLE_PX,
        RESIZE_HANDLE_PX,
        RESIZE_HANDLE_PX,
    )
}
