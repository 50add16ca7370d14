//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the blob store behind its trait, and the flag
//! that decides whether error details reach clients.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::blob::BlobStore;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub blobs: Arc<dyn BlobStore>,
    /// Echo stringified error causes in `details` on error responses.
    pub expose_error_details: bool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, blobs: Arc<dyn BlobStore>, expose_error_details: bool) -> Self {
        Self { pool, blobs, expose_error_details }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
