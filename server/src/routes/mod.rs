//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One JSON resource, `/api/vision-board`, plus a health probe. Every
//! response is marked `Cache-Control: no-store` so browsers and proxies never
//! serve a stale board.

pub mod vision_board;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use axum::Router;
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/vision-board",
            get(vision_board::list)
                .post(vision_board::create)
                .put(vision_board::update)
                .delete(vision_board::delete),
        )
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(CACHE_CONTROL, HeaderValue::from_static("no-store")))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Serve the router on an ephemeral local port and return its base URL.
#[cfg(test)]
pub(crate) async fn spawn_test_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("test server failed");
    });
    format!("http://{addr}")
}
