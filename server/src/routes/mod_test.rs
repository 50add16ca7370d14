use super::*;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn healthz_is_ok_and_not_cached() {
    let base = spawn_test_server(test_app_state()).await;
    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()[CACHE_CONTROL.as_str()], "no-store");
}

#[tokio::test]
async fn unknown_route_is_not_found_and_not_cached() {
    let base = spawn_test_server(test_app_state()).await;
    let response = reqwest::get(format!("{base}/api/nope")).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.headers()[CACHE_CONTROL.as_str()], "no-store");
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let base = spawn_test_server(test_app_state()).await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{base}/api/vision-board"))
        .header("origin", "https://board.example")
        .header("access-control-request-method", "PUT")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()[CACHE_CONTROL.as_str()], "no-store");
}
