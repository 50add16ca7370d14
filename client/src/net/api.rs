//! HTTP client for `/api/vision-board`.
//!
//! Every call is scoped to one member: the member id travels as the
//! `memberId` query parameter on reads and deletes and as `memberstack_id` in
//! JSON bodies on writes.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses are decoded from the server's `{"error": ...}` body into
//! [`ApiError::Server`]; when the body is unreadable the status alone is kept.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use canvas::doc::{BoardItem, ItemId, ItemPatch};
use canvas::upload::{NewItem, Placement, UploadError};
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};

const ITEMS_PATH: &str = "/api/vision-board";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("invalid image: {0}")]
    InvalidImage(#[from] UploadError),
}

/// The operations a board session needs from the backend.
#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// All items for the member, bottom of the stack first.
    async fn list_items(&self) -> Result<Vec<BoardItem>, ApiError>;
    /// Create an item from an image URL (or `data:` payload) at `placement`.
    async fn create_item(&self, image_url: String, placement: Placement) -> Result<BoardItem, ApiError>;
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<BoardItem, ApiError>;
    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError>;
}

/// REST client bound to one member.
#[derive(Debug, Clone)]
pub struct VisionBoardApi {
    http: reqwest::Client,
    base_url: String,
    member_id: String,
    team_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    id: ItemId,
    memberstack_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<&'a str>,
    #[serde(flatten)]
    patch: &'a ItemPatch,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    success: bool,
}

impl VisionBoardApi {
    #[must_use]
    pub fn new(base_url: &str, member_id: &str, team_id: Option<&str>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, member_id, team_id)
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str, member_id: &str, team_id: Option<&str>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            member_id: member_id.to_owned(),
            team_id: team_id.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    /// Probe `/healthz`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server is unhealthy.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let response = self.http.get(endpoint(&self.base_url, "/healthz")).send().await?;
        check(response).await.map(|_| ())
    }

    fn items_request(&self, method: Method) -> reqwest::RequestBuilder {
        self.http.request(method, endpoint(&self.base_url, ITEMS_PATH))
    }

    fn update_body<'a>(&'a self, id: ItemId, patch: &'a ItemPatch) -> UpdateBody<'a> {
        UpdateBody { id, memberstack_id: &self.member_id, team_id: self.team_id.as_deref(), patch }
    }
}

#[async_trait]
impl BoardBackend for VisionBoardApi {
    async fn list_items(&self) -> Result<Vec<BoardItem>, ApiError> {
        let response = self
            .items_request(Method::GET)
            .query(&[("memberId", self.member_id.as_str())])
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create_item(&self, image_url: String, placement: Placement) -> Result<BoardItem, ApiError> {
        let body = NewItem::new(&self.member_id, self.team_id.as_deref(), image_url, placement);
        let response = self.items_request(Method::POST).json(&body).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<BoardItem, ApiError> {
        let response = self.items_request(Method::PUT).json(&self.update_body(id, patch)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        let response = self
            .items_request(Method::DELETE)
            .query(&[("id", id.to_string()), ("memberId", self.member_id.clone())])
            .send()
            .await?;
        let body: DeleteResponse = check(response).await?.json().await?;
        if body.success {
            Ok(())
        } else {
            Err(ApiError::Server { status: 200, message: "delete was not acknowledged".to_owned() })
        }
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(ApiError::Server { status: status.as_u16(), message: error_message(&text) })
}

/// Human-readable message from a server error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error, details: Some(details) }) => format!("{error} ({details})"),
        Ok(ErrorBody { error, details: None }) => error,
        Err(_) if body.trim().is_empty() => "no response body".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}
