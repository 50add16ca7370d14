//! Vision board REST handlers.
//!
//! ERROR HANDLING
//! ==============
//! Client errors answer with the service error's message. Server errors
//! answer with a per-operation message ("Failed to save item", ...) and are
//! logged at `error` with the underlying cause; the cause is echoed as
//! `details` only when `AppState::expose_error_details` is set.

#[cfg(test)]
#[path = "vision_board_test.rs"]
mod vision_board_test;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use crate::services::vision_board::{self, CreateItem, ItemError, UpdateItem, VisionBoardItem};
use crate::state::AppState;

/// Query string for `GET` and `DELETE`.
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    #[serde(rename = "memberId")]
    pub member_id: Option<String>,
    pub id: Option<i64>,
}

/// JSON error response: `{"error": ..., "details"?: ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.message });
        if let Some(details) = self.details {
            body["details"] = serde_json::Value::String(details);
        }
        (self.status, Json(body)).into_response()
    }
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    /// Map a service error, logging server-side failures.
    fn from_item(state: &AppState, err: ItemError, failure: &str) -> Self {
        let status = item_error_to_status(&err);
        if !status.is_server_error() {
            return Self { status, message: err.to_string(), details: None };
        }
        tracing::error!(error = %err, "{}", failure);
        Self {
            status,
            message: failure.to_owned(),
            details: state.expose_error_details.then(|| err.to_string()),
        }
    }
}

pub(crate) fn item_error_to_status(err: &ItemError) -> StatusCode {
    match err {
        ItemError::MissingMember
        | ItemError::MissingId
        | ItemError::MissingImage
        | ItemError::InvalidImage(_)
        | ItemError::NothingToUpdate => StatusCode::BAD_REQUEST,
        ItemError::NotFound => StatusCode::NOT_FOUND,
        ItemError::Database(_) | ItemError::Blob(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_rejection(rejection: &JsonRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

fn query_rejection(rejection: &QueryRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
}

/// `GET /api/vision-board?memberId=`: the member's items in stacking order.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ItemQuery>, QueryRejection>,
) -> Result<Json<Vec<VisionBoardItem>>, ApiError> {
    let Query(query) = query.map_err(|r| query_rejection(&r))?;
    let items = vision_board::list_items(&state.pool, query.member_id.as_deref())
        .await
        .map_err(|e| ApiError::from_item(&state, e, "Failed to load vision board"))?;
    Ok(Json(items))
}

/// `POST /api/vision-board`: create an item.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateItem>, JsonRejection>,
) -> Result<(StatusCode, Json<VisionBoardItem>), ApiError> {
    let Json(body) = body.map_err(|r| body_rejection(&r))?;
    let item = vision_board::create_item(&state.pool, state.blobs.as_ref(), body)
        .await
        .map_err(|e| ApiError::from_item(&state, e, "Failed to save item"))?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/vision-board`: sparse update of one item.
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<UpdateItem>, JsonRejection>,
) -> Result<Json<VisionBoardItem>, ApiError> {
    let Json(body) = body.map_err(|r| body_rejection(&r))?;
    let item = vision_board::update_item(&state.pool, state.blobs.as_ref(), body)
        .await
        .map_err(|e| ApiError::from_item(&state, e, "Failed to update item"))?;
    Ok(Json(item))
}

/// `DELETE /api/vision-board?id=&memberId=`: delete an item and its blob.
pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<ItemQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(query) = query.map_err(|r| query_rejection(&r))?;
    vision_board::delete_item(&state.pool, state.blobs.as_ref(), query.id, query.member_id.as_deref())
        .await
        .map_err(|e| ApiError::from_item(&state, e, "Failed to delete item"))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
