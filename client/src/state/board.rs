//! Optimistic board session.
//!
//! SYSTEM CONTEXT
//! ==============
//! A `BoardSession` pairs the `canvas` engine with a [`BoardBackend`]. Input is
//! applied to the engine first, so the board always reflects what the user
//! did; the session then writes the settled result to the backend.
//!
//! ERROR HANDLING
//! ==============
//! Failed writes never roll local state back. Each failure is logged with
//! `tracing::warn!` and stored as the session's single dismissible error
//! message, replacing any earlier one.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use canvas::doc::{BoardItem, ItemId, ItemPatch};
use canvas::editor::{CaptionStyle, EditorSession, StyleDraft};
use canvas::engine::{Action, EngineCore};
use canvas::geom::{BoardSize, Point};
use canvas::input::Button;
use canvas::upload::to_data_url;
use futures::future::join_all;

use crate::net::api::{ApiError, BoardBackend};

/// Shared view of a session's busy state.
///
/// Clone it out with [`BoardSession::busy_flag`] before awaiting a bulk
/// write; the clone stays readable while the session itself is borrowed.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn enter(&self) -> BusyGuard {
        self.0.store(true, Ordering::Release);
        BusyGuard(self.clone())
    }
}

/// Clears the flag when the bulk write settles or its future is dropped.
struct BusyGuard(BusyFlag);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::Release);
    }
}

pub struct BoardSession<B> {
    backend: B,
    engine: EngineCore,
    error: Option<String>,
    busy: BusyFlag,
}

impl<B: BoardBackend> BoardSession<B> {
    pub fn new(backend: B, board: BoardSize) -> Self {
        let mut engine = EngineCore::new();
        engine.set_board_size(board);
        Self { backend, engine, error: None, busy: BusyFlag::default() }
    }

    // --- Queries ---

    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    pub fn items(&self) -> Vec<&BoardItem> {
        self.engine.items()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a bulk style write is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Handle for polling [`is_busy`](Self::is_busy) from outside the session.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn set_board_size(&mut self, board: BoardSize) {
        self.engine.set_board_size(board);
    }

    // --- Loading ---

    /// Fetch the member's items and replace the board with them.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the board keeps its previous contents.
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        match self.backend.list_items().await {
            Ok(items) => {
                let count = items.len();
                self.engine.load_snapshot(items);
                tracing::debug!(count, "board loaded");
                Ok(count)
            }
            Err(e) => Err(self.fail("Failed to load board", e)),
        }
    }

    // --- Gestures ---

    /// Start a drag or resize, or surface an edit/delete request.
    pub fn pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        self.engine.on_pointer_down(pt, button)
    }

    pub fn pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.engine.on_pointer_move(pt)
    }

    /// Finish the gesture and persist its final state.
    pub async fn pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let actions = self.engine.on_pointer_up(pt);
        self.persist_all(actions).await
    }

    // --- Upload and delete ---

    /// Validate an image, place it at a random spot on the board, and create it.
    ///
    /// Non-image files are rejected before any request is made.
    ///
    /// # Errors
    ///
    /// Returns `InvalidImage` for rejected files, otherwise the backend error.
    pub async fn upload(&mut self, mime: &str, bytes: &[u8]) -> Result<ItemId, ApiError> {
        let data_url = match to_data_url(mime, bytes) {
            Ok(url) => url,
            Err(e) => return Err(self.fail("Failed to upload image", e.into())),
        };
        let placement = {
            let mut rng = rand::rng();
            self.engine.place_new_item(&mut rng)
        };
        match self.backend.create_item(data_url, placement).await {
            Ok(item) => {
                let id = item.id;
                tracing::info!(item_id = id, "item uploaded");
                self.engine.insert_created(item);
                Ok(id)
            }
            Err(e) => Err(self.fail("Failed to upload image", e)),
        }
    }

    /// Delete an item on the backend, then drop it from the board.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the item stays on the board.
    pub async fn delete(&mut self, id: ItemId) -> Result<(), ApiError> {
        match self.backend.delete_item(id).await {
            Ok(()) => {
                self.engine.remove_item(id);
                tracing::info!(item_id = id, "item deleted");
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to delete item", e)),
        }
    }

    // --- Editor ---

    pub fn open_editor(&mut self, id: ItemId) -> bool {
        self.engine.open_editor(id)
    }

    pub fn editor(&self) -> Option<&EditorSession> {
        self.engine.editor()
    }

    pub fn editor_draft_mut(&mut self) -> Option<&mut StyleDraft> {
        self.engine.editor_draft_mut()
    }

    pub fn cancel_editor(&mut self) {
        self.engine.cancel_editor();
    }

    /// Apply the open draft and persist whatever changed.
    pub async fn save_editor(&mut self) -> Vec<Action> {
        let actions = self.engine.save_editor();
        self.persist_all(actions).await
    }

    /// Restyle every caption and write each item concurrently.
    ///
    /// # Errors
    ///
    /// Returns one aggregate error when any write fails.
    pub async fn apply_style_to_all(&mut self, style: &CaptionStyle) -> Result<(), ApiError> {
        let writes: Vec<(ItemId, ItemPatch)> = self
            .engine
            .apply_style_to_all(style)
            .into_iter()
            .filter_map(|action| match action {
                Action::Persist { id, patch } => Some((id, patch)),
                _ => None,
            })
            .collect();
        let total = writes.len();

        let results = {
            let _busy = self.busy.enter();
            let backend = &self.backend;
            join_all(writes.iter().map(|(id, patch)| backend.update_item(*id, patch))).await
        };

        let mut failed = results.into_iter().filter_map(Result::err);
        let Some(first) = failed.next() else {
            tracing::info!(count = total, "style applied to all items");
            return Ok(());
        };
        let failures = 1 + failed.count();
        let message = format!("Failed to apply style to {failures} of {total} items");
        Err(self.fail(&message, first))
    }

    /// Apply the open editor's current style to every item. The editor stays
    /// open; nothing happens when it is closed.
    ///
    /// # Errors
    ///
    /// Same as [`apply_style_to_all`](Self::apply_style_to_all).
    pub async fn apply_editor_style_to_all(&mut self) -> Result<(), ApiError> {
        let Some(style) = self.engine.editor().map(|session| session.draft.style()) else {
            return Ok(());
        };
        self.apply_style_to_all(&style).await
    }

    // --- Internals ---

    /// Send every `Persist` action and hand the rest back to the caller.
    async fn persist_all(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut rest = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::Persist { id, patch } => {
                    if let Err(e) = self.backend.update_item(id, &patch).await {
                        self.fail("Failed to save changes", e);
                    }
                }
                other => rest.push(other),
            }
        }
        rest
    }

    fn fail(&mut self, context: &str, error: ApiError) -> ApiError {
        tracing::warn!(%error, "{context}");
        self.error = Some(format!("{context}: {error}"));
        error
    }
}
