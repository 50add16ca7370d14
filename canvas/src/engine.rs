//! Board interaction engine.
//!
//! `EngineCore` owns everything the board needs between network round trips:
//! the item store, the board bounds, the z-order counter, the active gesture,
//! and the open caption editor. Input handlers mutate local state immediately
//! and return [`Action`]s; the host persists `Action::Persist` patches and
//! routes edit/delete requests to its own UI.
//!
//! Drags and resizes never persist mid-gesture. Each gesture yields exactly one
//! `Persist` on pointer-up.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::Rng;

use crate::consts::{MIN_ITEM_HEIGHT, MIN_ITEM_WIDTH};
use crate::doc::{BoardItem, DocStore, ItemId, ItemPatch, ZCounter};
use crate::editor::{CaptionStyle, EditorSession, StyleDraft};
use crate::geom::{BoardSize, Point};
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, GestureState};
use crate::upload::{Placement, random_placement};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Write these fields for the item to the backend.
    Persist { id: ItemId, patch: ItemPatch },
    /// The edit control was pressed; the host should open the editor.
    EditRequested { id: ItemId },
    /// The delete control was pressed; the host should confirm and delete.
    DeleteRequested { id: ItemId },
    SetCursor(&'static str),
    RenderNeeded,
}

/// Core engine state.
#[derive(Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub board: BoardSize,
    pub gesture: GestureState,
    z: ZCounter,
    editor: Option<EditorSession>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the board contents with a server snapshot and reseed the
    /// z-order counter above the highest stored z-index.
    pub fn load_snapshot(&mut self, items: Vec<BoardItem>) {
        self.doc.load_snapshot(items);
        self.z = ZCounter::seeded(self.doc.max_z_index());
        self.gesture = GestureState::Idle;
        self.editor = None;
    }

    /// Add an item the server just created.
    pub fn insert_created(&mut self, item: BoardItem) {
        self.z.observe(item.z_index);
        self.doc.insert(item);
    }

    /// Drop an item. Cancels any gesture on it and closes its editor.
    pub fn remove_item(&mut self, id: ItemId) -> Option<BoardItem> {
        if self.gesture.item_id() == Some(id) {
            self.gesture = GestureState::Idle;
        }
        if self.editor.as_ref().is_some_and(|e| e.item_id == id) {
            self.editor = None;
        }
        self.doc.remove(id)
    }

    /// Apply a patch locally without emitting anything.
    pub fn apply_patch(&mut self, id: ItemId, patch: &ItemPatch) -> bool {
        if let Some(z) = patch.z_index {
            self.z.observe(z);
        }
        self.doc.apply_patch(id, patch)
    }

    pub fn set_board_size(&mut self, board: BoardSize) {
        self.board = board;
    }

    /// Reserve a random on-board spot and the next z-index for a new upload.
    pub fn place_new_item<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Placement {
        let z = self.z.take();
        random_placement(rng, self.board, z)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.gesture.is_active() {
            return Vec::new();
        }
        let Some(hit) = hit_test(pt, &self.doc) else {
            return Vec::new();
        };
        let Some(item) = self.doc.get(hit.item_id) else {
            return Vec::new();
        };
        match hit.part {
            HitPart::EditButton => vec![Action::EditRequested { id: item.id }],
            HitPart::DeleteButton => vec![Action::DeleteRequested { id: item.id }],
            HitPart::ResizeHandle => {
                self.gesture = GestureState::Resizing {
                    id: item.id,
                    start_pointer: pt,
                    orig_w: item.width,
                    orig_h: item.height,
                };
                vec![Action::SetCursor("nwse-resize")]
            }
            HitPart::Body => {
                let (id, orig_x, orig_y) = (item.id, item.x_position, item.y_position);
                let z_index = self.z.take();
                self.doc.apply_patch(id, &ItemPatch { z_index: Some(z_index), ..ItemPatch::default() });
                self.gesture = GestureState::Dragging { id, start_pointer: pt, orig_x, orig_y, z_index };
                vec![Action::SetCursor("grabbing"), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match self.gesture {
            GestureState::Idle => Vec::new(),
            GestureState::Dragging { id, start_pointer, orig_x, orig_y, .. } => {
                let Some(item) = self.doc.get(id) else {
                    self.gesture = GestureState::Idle;
                    return Vec::new();
                };
                let next = self.board.clamp_position(
                    orig_x + (pt.x - start_pointer.x),
                    orig_y + (pt.y - start_pointer.y),
                    item.width,
                    item.height,
                );
                let patch = ItemPatch { x_position: Some(next.x), y_position: Some(next.y), ..ItemPatch::default() };
                self.doc.apply_patch(id, &patch);
                vec![Action::RenderNeeded]
            }
            GestureState::Resizing { id, start_pointer, orig_w, orig_h } => {
                let (width, height) = resized(orig_w, orig_h, pt.x - start_pointer.x);
                self.doc.apply_patch(id, &ItemPatch::size(width, height));
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _pt: Point) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let patch = match gesture {
            GestureState::Idle => return Vec::new(),
            GestureState::Dragging { id, z_index, .. } => {
                self.doc.get(id).map(|item| (id, ItemPatch::position(item.x_position, item.y_position, z_index)))
            }
            GestureState::Resizing { id, .. } => {
                self.doc.get(id).map(|item| (id, ItemPatch::size(item.width, item.height)))
            }
        };
        let mut actions = vec![Action::SetCursor("default")];
        if let Some((id, patch)) = patch {
            actions.push(Action::Persist { id, patch });
        }
        actions
    }

    // --- Editor ---

    /// Stage a draft for `id`. Returns false if the item doesn't exist.
    pub fn open_editor(&mut self, id: ItemId) -> bool {
        let Some(item) = self.doc.get(id) else {
            return false;
        };
        self.editor = Some(EditorSession { item_id: id, draft: StyleDraft::from_item(item) });
        true
    }

    pub fn editor_draft_mut(&mut self) -> Option<&mut StyleDraft> {
        self.editor.as_mut().map(|e| &mut e.draft)
    }

    /// Close the editor, apply the draft locally, and persist what changed.
    pub fn save_editor(&mut self) -> Vec<Action> {
        let Some(session) = self.editor.take() else {
            return Vec::new();
        };
        let Some(item) = self.doc.get(session.item_id) else {
            return Vec::new();
        };
        let patch = session.draft.diff(item);
        if patch.is_empty() {
            return Vec::new();
        }
        self.doc.apply_patch(session.item_id, &patch);
        vec![Action::Persist { id: session.item_id, patch }, Action::RenderNeeded]
    }

    /// Discard the draft.
    pub fn cancel_editor(&mut self) {
        self.editor = None;
    }

    /// Apply one caption style to every item, one `Persist` each.
    pub fn apply_style_to_all(&mut self, style: &CaptionStyle) -> Vec<Action> {
        let patch = style.patch();
        let mut actions: Vec<Action> = self
            .doc
            .ids()
            .into_iter()
            .filter(|id| self.doc.apply_patch(*id, &patch))
            .map(|id| Action::Persist { id, patch: patch.clone() })
            .collect();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&BoardItem> {
        self.doc.get(id)
    }

    /// Items in draw order, bottom first.
    #[must_use]
    pub fn items(&self) -> Vec<&BoardItem> {
        self.doc.sorted_items()
    }

    #[must_use]
    pub fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    #[must_use]
    pub fn next_z_index(&self) -> i32 {
        self.z.peek()
    }
}

/// Aspect-locked size for a resize drag of `dx` from `(orig_w, orig_h)`.
fn resized(orig_w: f64, orig_h: f64, dx: f64) -> (f64, f64) {
    let ratio = if orig_w > 0.0 && orig_h > 0.0 { orig_h / orig_w } else { MIN_ITEM_HEIGHT / MIN_ITEM_WIDTH };
    let width = (orig_w + dx).max(MIN_ITEM_WIDTH);
    let height = width * ratio;
    if height < MIN_ITEM_HEIGHT {
        (MIN_ITEM_HEIGHT / ratio, MIN_ITEM_HEIGHT)
    } else {
        (width, height)
    }
}
