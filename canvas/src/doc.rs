//! Document model: board items, their sparse updates, and the in-memory store.
//!
//! This module defines the data types that describe what is on the board
//! (`BoardItem`, `TextAlign`), a sparse-update type for incremental edits
//! (`ItemPatch`), the stacking-order counter (`ZCounter`), and the runtime
//! store that owns all live items (`DocStore`).
//!
//! Data flows into this layer from the network (JSON deserialization of the
//! REST rows) and from the input engine (mutations). Renderers read from
//! `DocStore` via `sorted_items` to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR, UPLOAD_ITEM_HEIGHT, UPLOAD_ITEM_WIDTH};

/// Server-assigned identifier for a board item.
pub type ItemId = i64;

/// Horizontal alignment of the caption text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// A board item as stored in the document and on the wire.
///
/// Field names follow the REST row shape so rows deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    /// Server-assigned identifier.
    pub id: ItemId,
    /// Owning member.
    #[serde(default)]
    pub memberstack_id: String,
    /// Optional team scope.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Public URL of the image.
    pub image_url: String,
    /// Left edge in board pixels.
    #[serde(default)]
    pub x_position: f64,
    /// Top edge in board pixels.
    #[serde(default)]
    pub y_position: f64,
    /// Image width in board pixels.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Image height in board pixels.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    #[serde(default)]
    pub z_index: i32,
    /// Caption shown below the image, if any.
    #[serde(default)]
    pub text: Option<String>,
    /// Caption text color as a CSS color string.
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Caption background as a CSS color string.
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Whether the caption is bold.
    #[serde(default)]
    pub is_bold: bool,
    /// Caption alignment.
    #[serde(default)]
    pub text_align: TextAlign,
}

impl BoardItem {
    /// Caption text, empty when absent.
    #[must_use]
    pub fn caption(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

fn default_width() -> f64 {
    UPLOAD_ITEM_WIDTH
}

fn default_height() -> f64 {
    UPLOAD_ITEM_HEIGHT
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_owned()
}

/// Sparse update for a board item. Only present fields are applied or sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// New image URL (or inline `data:image` payload), if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// New x position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_position: Option<f64>,
    /// New y position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_position: Option<f64>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New z-index, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    /// New caption, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New caption text color, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// New caption background, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// New bold flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bold: Option<bool>,
    /// New caption alignment, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl ItemPatch {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patch that moves an item and records its stacking order.
    #[must_use]
    pub fn position(x: f64, y: f64, z_index: i32) -> Self {
        Self { x_position: Some(x), y_position: Some(y), z_index: Some(z_index), ..Self::default() }
    }

    /// Patch that resizes an item.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }

    /// Write every present field into `item`.
    pub fn apply_to(&self, item: &mut BoardItem) {
        if let Some(url) = &self.image_url {
            item.image_url.clone_from(url);
        }
        if let Some(x) = self.x_position {
            item.x_position = x;
        }
        if let Some(y) = self.y_position {
            item.y_position = y;
        }
        if let Some(w) = self.width {
            item.width = w;
        }
        if let Some(h) = self.height {
            item.height = h;
        }
        if let Some(z) = self.z_index {
            item.z_index = z;
        }
        if let Some(text) = &self.text {
            item.text = Some(text.clone());
        }
        if let Some(color) = &self.text_color {
            item.text_color.clone_from(color);
        }
        if let Some(color) = &self.background_color {
            item.background_color.clone_from(color);
        }
        if let Some(bold) = self.is_bold {
            item.is_bold = bold;
        }
        if let Some(align) = self.text_align {
            item.text_align = align;
        }
    }
}

/// Monotonic stacking-order counter.
///
/// Seeded from `max(z_index) + 1` when a snapshot loads; every bring-to-front
/// or new item takes the next value, so z-indices only grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZCounter {
    next: i32,
}

impl Default for ZCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ZCounter {
    /// Counter positioned just above `max_z`, or at 1 for an empty board.
    #[must_use]
    pub fn seeded(max_z: Option<i32>) -> Self {
        Self { next: max_z.map_or(1, |z| z.saturating_add(1)) }
    }

    /// The value the next call to `take` will return.
    #[must_use]
    pub fn peek(&self) -> i32 {
        self.next
    }

    /// Return the next z-index and advance.
    pub fn take(&mut self) -> i32 {
        let z = self.next;
        self.next = self.next.saturating_add(1);
        z
    }

    /// Make sure future values stay above an externally assigned z-index.
    pub fn observe(&mut self, z: i32) {
        if z >= self.next {
            self.next = z.saturating_add(1);
        }
    }
}

/// In-memory store of board items.
pub struct DocStore {
    items: HashMap<ItemId, BoardItem>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: HashMap::new() }
    }

    /// Insert or replace an item. If an item with the same `id` already
    /// exists it is overwritten.
    pub fn insert(&mut self, item: BoardItem) {
        self.items.insert(item.id, item);
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: ItemId) -> Option<BoardItem> {
        self.items.remove(&id)
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&BoardItem> {
        self.items.get(&id)
    }

    /// Apply a sparse update to an existing item. Returns false if the item doesn't exist.
    pub fn apply_patch(&mut self, id: ItemId, patch: &ItemPatch) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        patch.apply_to(item);
        true
    }

    /// Replace all items with a full snapshot.
    pub fn load_snapshot(&mut self, items: Vec<BoardItem>) {
        self.items.clear();
        for item in items {
            self.items.insert(item.id, item);
        }
    }

    /// Return all items sorted by `(z_index, id)` for draw order.
    #[must_use]
    pub fn sorted_items(&self) -> Vec<&BoardItem> {
        let mut items: Vec<&BoardItem> = self.items.values().collect();
        items.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Ids of every item, in draw order.
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.sorted_items().into_iter().map(|item| item.id).collect()
    }

    /// Highest z-index on the board, if any item exists.
    #[must_use]
    pub fn max_z_index(&self) -> Option<i32> {
        self.items.values().map(|item| item.z_index).max()
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
