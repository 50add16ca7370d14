#![allow(clippy::float_cmp)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canvas::color::{Rgb, Rgba};
use canvas::doc::TextAlign;
use canvas::upload::Placement;

use super::*;

// =============================================================
// Fake backend
// =============================================================

#[derive(Default)]
struct FakeBackend {
    items: Vec<BoardItem>,
    fail_list: bool,
    fail_create: bool,
    fail_delete: bool,
    fail_updates_for: Vec<ItemId>,
    /// When set, each update waits for a permit before answering.
    update_gate: Option<Arc<tokio::sync::Semaphore>>,
    updates: Mutex<Vec<(ItemId, ItemPatch)>>,
    creates: Mutex<Vec<(String, Placement)>>,
    deletes: Mutex<Vec<ItemId>>,
}

fn server_error() -> ApiError {
    ApiError::Server { status: 500, message: "boom".into() }
}

#[async_trait]
impl BoardBackend for FakeBackend {
    async fn list_items(&self) -> Result<Vec<BoardItem>, ApiError> {
        if self.fail_list {
            return Err(server_error());
        }
        Ok(self.items.clone())
    }

    async fn create_item(&self, image_url: String, placement: Placement) -> Result<BoardItem, ApiError> {
        if self.fail_create {
            return Err(server_error());
        }
        let mut creates = self.creates.lock().unwrap();
        creates.push((image_url, placement));
        let id = 100 + i64::try_from(creates.len()).unwrap();
        let mut item = make_item(id, placement.x, placement.y, placement.z_index);
        item.image_url = format!("https://blob.test/{id}.png");
        Ok(item)
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<BoardItem, ApiError> {
        if let Some(gate) = &self.update_gate {
            let _permit = gate.acquire().await.unwrap();
        }
        self.updates.lock().unwrap().push((id, patch.clone()));
        if self.fail_updates_for.contains(&id) {
            return Err(server_error());
        }
        let mut item = make_item(id, 0.0, 0.0, 1);
        patch.apply_to(&mut item);
        Ok(item)
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        if self.fail_delete {
            return Err(ApiError::Server { status: 404, message: "Item not found".into() });
        }
        self.deletes.lock().unwrap().push(id);
        Ok(())
    }
}

// =============================================================
// Helpers
// =============================================================

fn make_item(id: ItemId, x: f64, y: f64, z: i32) -> BoardItem {
    BoardItem {
        id,
        memberstack_id: "m1".into(),
        team_id: None,
        image_url: format!("https://blob.test/{id}.jpg"),
        x_position: x,
        y_position: y,
        width: 200.0,
        height: 150.0,
        z_index: z,
        text: None,
        text_color: "#FFFFFF".into(),
        background_color: "rgba(0, 0, 0, 0.7)".into(),
        is_bold: false,
        text_align: TextAlign::Center,
    }
}

async fn loaded(backend: FakeBackend) -> BoardSession<FakeBackend> {
    let mut session = BoardSession::new(backend, BoardSize::new(800.0, 400.0));
    session.load().await.unwrap();
    session
}

fn three_items() -> FakeBackend {
    FakeBackend {
        items: vec![make_item(1, 0.0, 0.0, 1), make_item(2, 300.0, 0.0, 2), make_item(3, 0.0, 200.0, 3)],
        ..FakeBackend::default()
    }
}

fn style() -> CaptionStyle {
    CaptionStyle {
        text_color: Rgb::BLACK,
        background: Rgba::from_opacity_percent(Rgb::WHITE, 80),
        is_bold: true,
        text_align: TextAlign::Left,
    }
}

// =============================================================
// Load
// =============================================================

#[tokio::test]
async fn load_replaces_board_and_seeds_z_counter() {
    let session = loaded(three_items()).await;
    assert_eq!(session.items().len(), 3);
    assert_eq!(session.engine().next_z_index(), 4);
    assert!(session.error().is_none());
}

#[tokio::test]
async fn load_failure_sets_error() {
    let backend = FakeBackend { fail_list: true, ..FakeBackend::default() };
    let mut session = BoardSession::new(backend, BoardSize::default());
    assert!(session.load().await.is_err());
    assert!(session.error().unwrap().starts_with("Failed to load board"));
    session.dismiss_error();
    assert!(session.error().is_none());
}

// =============================================================
// Gestures
// =============================================================

#[tokio::test]
async fn drag_writes_once_when_released() {
    let mut session = loaded(three_items()).await;
    session.pointer_down(Point::new(50.0, 50.0), Button::Primary);
    for x in [60.0, 70.0, 80.0] {
        session.pointer_move(Point::new(x, 60.0));
    }
    assert!(session.backend.updates.lock().unwrap().is_empty());

    let rest = session.pointer_up(Point::new(80.0, 60.0)).await;
    assert!(rest.iter().all(|a| !matches!(a, Action::Persist { .. })));

    let updates = session.backend.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0], (1, ItemPatch::position(30.0, 10.0, 4)));
}

#[tokio::test]
async fn failed_write_keeps_local_state() {
    let backend = FakeBackend { fail_updates_for: vec![1], ..three_items() };
    let mut session = loaded(backend).await;
    session.pointer_down(Point::new(50.0, 50.0), Button::Primary);
    session.pointer_move(Point::new(150.0, 50.0));
    session.pointer_up(Point::new(150.0, 50.0)).await;

    let item = session.engine().item(1).unwrap();
    assert_eq!(item.x_position, 100.0);
    assert_eq!(item.z_index, 4);
    assert!(session.error().unwrap().starts_with("Failed to save changes"));
}

#[tokio::test]
async fn control_press_is_returned_to_caller() {
    let mut session = loaded(three_items()).await;
    let actions = session.pointer_down(Point::new(180.0, 20.0), Button::Primary);
    assert_eq!(actions, vec![Action::DeleteRequested { id: 1 }]);
}

// =============================================================
// Upload and delete
// =============================================================

#[tokio::test]
async fn upload_rejects_non_image_before_any_request() {
    let mut session = loaded(FakeBackend::default()).await;
    let err = session.upload("application/pdf", b"%PDF-1.7").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidImage(_)));
    assert!(session.backend.creates.lock().unwrap().is_empty());
    assert!(session.error().is_some());
}

#[tokio::test]
async fn upload_places_item_on_board_with_next_z() {
    let mut session = loaded(three_items()).await;
    let id = session.upload("image/png", &[0, 0, 0]).await.unwrap();

    let creates = session.backend.creates.lock().unwrap();
    let (url, placement) = &creates[0];
    assert_eq!(url, "data:image/png;base64,AAAA");
    assert_eq!(placement.z_index, 4);
    assert!(placement.x <= 600.0 && placement.y <= 250.0);
    drop(creates);

    let item = session.engine().item(id).unwrap();
    assert_eq!(item.z_index, 4);
    assert_eq!(session.engine().next_z_index(), 5);
}

#[tokio::test]
async fn upload_failure_sets_error() {
    let backend = FakeBackend { fail_create: true, ..FakeBackend::default() };
    let mut session = loaded(backend).await;
    assert!(session.upload("image/jpeg", &[1, 2, 3]).await.is_err());
    assert!(session.items().is_empty());
    assert!(session.error().unwrap().starts_with("Failed to upload image"));
}

#[tokio::test]
async fn delete_removes_item_after_backend_confirms() {
    let mut session = loaded(three_items()).await;
    session.delete(2).await.unwrap();
    assert!(session.engine().item(2).is_none());
    assert_eq!(*session.backend.deletes.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn failed_delete_keeps_item() {
    let backend = FakeBackend { fail_delete: true, ..three_items() };
    let mut session = loaded(backend).await;
    assert!(session.delete(2).await.is_err());
    assert!(session.engine().item(2).is_some());
}

#[tokio::test]
async fn deleting_edited_item_closes_editor() {
    let mut session = loaded(three_items()).await;
    assert!(session.open_editor(3));
    session.delete(3).await.unwrap();
    assert!(session.editor().is_none());
}

// =============================================================
// Editor and bulk style
// =============================================================

#[tokio::test]
async fn save_editor_writes_changed_fields() {
    let mut session = loaded(three_items()).await;
    session.open_editor(2);
    session.editor_draft_mut().unwrap().text = "Learn Rust".into();
    session.save_editor().await;

    let updates = session.backend.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, 2);
    assert_eq!(updates[0].1, ItemPatch { text: Some("Learn Rust".into()), ..ItemPatch::default() });
}

#[tokio::test]
async fn cancelled_editor_writes_nothing() {
    let mut session = loaded(three_items()).await;
    session.open_editor(2);
    session.editor_draft_mut().unwrap().is_bold = true;
    session.cancel_editor();
    session.save_editor().await;
    assert!(session.backend.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn apply_style_to_all_writes_every_item() {
    let mut session = loaded(three_items()).await;
    session.apply_style_to_all(&style()).await.unwrap();

    let mut ids: Vec<ItemId> = session.backend.updates.lock().unwrap().iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(!session.is_busy());
    assert!(session.items().iter().all(|item| item.is_bold && item.text_align == TextAlign::Left));
}

#[tokio::test]
async fn editor_style_applies_to_every_item() {
    let mut session = loaded(three_items()).await;
    session.open_editor(2);
    let draft = session.editor_draft_mut().unwrap();
    draft.is_bold = true;
    draft.text_align = TextAlign::Right;
    draft.opacity_percent = 40;

    session.apply_editor_style_to_all().await.unwrap();

    let updates = session.backend.updates.lock().unwrap();
    assert_eq!(updates.len(), 3);
    assert!(updates.iter().all(|(_, patch)| patch.is_bold == Some(true)
        && patch.text_align == Some(TextAlign::Right)
        && patch.background_color.as_deref() == Some("rgba(0, 0, 0, 0.4)")
        && patch.text.is_none()));
    drop(updates);
    assert!(session.editor().is_some());
}

#[tokio::test]
async fn editor_style_without_open_editor_writes_nothing() {
    let mut session = loaded(three_items()).await;
    session.apply_editor_style_to_all().await.unwrap();
    assert!(session.backend.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn busy_while_bulk_writes_are_pending() {
    let gate = Arc::new(tokio::sync::Semaphore::new(0));
    let backend = FakeBackend { update_gate: Some(Arc::clone(&gate)), ..three_items() };
    let mut session = loaded(backend).await;
    let busy = session.busy_flag();
    assert!(!busy.is_busy());

    let style = style();
    let mut apply = Box::pin(session.apply_style_to_all(&style));
    assert!(futures::poll!(apply.as_mut()).is_pending());
    assert!(busy.is_busy());

    gate.add_permits(3);
    apply.await.unwrap();
    assert!(!busy.is_busy());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn dropping_a_pending_bulk_write_clears_busy() {
    let gate = Arc::new(tokio::sync::Semaphore::new(0));
    let backend = FakeBackend { update_gate: Some(gate), ..three_items() };
    let mut session = loaded(backend).await;
    let busy = session.busy_flag();

    let style = style();
    let mut apply = Box::pin(session.apply_style_to_all(&style));
    assert!(futures::poll!(apply.as_mut()).is_pending());
    assert!(busy.is_busy());
    drop(apply);
    assert!(!busy.is_busy());
}

#[tokio::test]
async fn partial_bulk_failure_reports_one_aggregate_error() {
    let backend = FakeBackend { fail_updates_for: vec![2], ..three_items() };
    let mut session = loaded(backend).await;
    assert!(session.apply_style_to_all(&style()).await.is_err());
    assert!(!session.is_busy());
    assert_eq!(
        session.error(),
        Some("Failed to apply style to 1 of 3 items: server returned 500: boom")
    );
    // Local styling stays applied.
    assert!(session.engine().item(2).unwrap().is_bold);
}
