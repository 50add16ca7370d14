use super::*;

#[test]
fn endpoint_joins_without_double_slash() {
    assert_eq!(endpoint("http://localhost:3000/", ITEMS_PATH), "http://localhost:3000/api/vision-board");
    assert_eq!(endpoint("http://localhost:3000", "/healthz"), "http://localhost:3000/healthz");
}

#[test]
fn new_trims_trailing_slash_from_base_url() {
    let api = VisionBoardApi::new("https://board.test///", "m1", None);
    assert_eq!(api.base_url, "https://board.test");
    assert_eq!(api.member_id(), "m1");
}

#[test]
fn update_body_flattens_patch_next_to_identity() {
    let api = VisionBoardApi::new("https://board.test", "m1", None);
    let patch = ItemPatch { text: Some("Goal".into()), ..ItemPatch::default() };
    let value = serde_json::to_value(api.update_body(7, &patch)).unwrap();
    assert_eq!(value, serde_json::json!({ "id": 7, "memberstack_id": "m1", "text": "Goal" }));
}

#[test]
fn update_body_carries_team_when_set() {
    let api = VisionBoardApi::new("https://board.test", "m1", Some("t1"));
    let patch = ItemPatch::size(320.0, 240.0);
    let value = serde_json::to_value(api.update_body(7, &patch)).unwrap();
    assert_eq!(value["team_id"], "t1");
    assert_eq!(value["memberstack_id"], "m1");
    assert_eq!(value["width"], 320.0);
}

#[test]
fn update_body_for_drag_end_carries_position_and_z() {
    let api = VisionBoardApi::new("https://board.test", "m1", None);
    let patch = ItemPatch::position(12.5, 40.0, 9);
    let value = serde_json::to_value(api.update_body(3, &patch)).unwrap();
    assert_eq!(value["x_position"], 12.5);
    assert_eq!(value["y_position"], 40.0);
    assert_eq!(value["z_index"], 9);
    assert!(value.get("width").is_none());
}

#[test]
fn error_message_reads_error_field() {
    assert_eq!(error_message(r#"{"error":"Item not found"}"#), "Item not found");
}

#[test]
fn error_message_appends_details_when_present() {
    assert_eq!(
        error_message(r#"{"error":"Failed to update item","details":"pool timed out"}"#),
        "Failed to update item (pool timed out)"
    );
}

#[test]
fn error_message_falls_back_to_raw_text() {
    assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    assert_eq!(error_message(""), "no response body");
}

#[test]
fn api_error_display_includes_status() {
    let err = ApiError::Server { status: 404, message: "Item not found".into() };
    assert_eq!(err.to_string(), "server returned 404: Item not found");
}
