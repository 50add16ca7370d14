//! Blob storage client.
//!
//! DESIGN
//! ======
//! `BlobStore` is the seam between item handlers and object storage. The
//! production `HttpBlobStore` speaks the Vercel Blob HTTP API: uploads are a
//! `PUT` of the raw bytes under a pathname, deletes a `POST /delete` with the
//! public URLs. Tests swap in an in-memory store.
//!
//! ERROR HANDLING
//! ==============
//! Upload failures abort the request that needed the URL. Delete failures are
//! the caller's to log and swallow; the row is already gone by then.

#[cfg(test)]
#[path = "blob_test.rs"]
mod blob_test;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BlobConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("blob store returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `pathname` with public access and a random suffix,
    /// returning the public URL.
    async fn put(&self, pathname: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, BlobError>;

    /// Delete a previously stored object by its public URL.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;

    /// Whether `url` points into this store.
    fn owns(&self, url: &str) -> bool;
}

pub struct HttpBlobStore {
    http: reqwest::Client,
    api_url: String,
    token: String,
    public_host: String,
}

#[derive(Deserialize)]
struct PutResponse {
    url: String,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    urls: [&'a str; 1],
}

impl HttpBlobStore {
    /// Build a client from typed blob config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BlobConfig) -> Result<Self, BlobError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
            public_host: config.public_host.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, pathname: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
        let response = self
            .http
            .put(format!("{}/{}", self.api_url, pathname.trim_start_matches('/')))
            .bearer_auth(&self.token)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "1")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Status { status: status.as_u16(), body });
        }
        let body: PutResponse = response.json().await?;
        Ok(body.url)
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let response = self
            .http
            .post(format!("{}/delete", self.api_url))
            .bearer_auth(&self.token)
            .json(&DeleteRequest { urls: [url] })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }

    fn owns(&self, url: &str) -> bool {
        host_matches(url, &self.public_host)
    }
}

/// Lowercased host of an absolute `http(s)` URL.
pub(crate) fn url_host(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str().filter(|host| !host.is_empty()).map(str::to_ascii_lowercase)
}

/// Whether `url`'s host is `public_host` or a subdomain of it (case-insensitive).
pub(crate) fn host_matches(url: &str, public_host: &str) -> bool {
    let suffix = public_host.trim().trim_start_matches('.').to_ascii_lowercase();
    if suffix.is_empty() {
        return false;
    }
    url_host(url).is_some_and(|host| {
        host == suffix || host.strip_suffix(&suffix).is_some_and(|label| label.ends_with('.'))
    })
}
