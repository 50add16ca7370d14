//! Vision board item service: list, create, update, delete.
//!
//! DESIGN
//! ======
//! Every operation is scoped by `memberstack_id`; a row owned by another
//! member behaves exactly like a missing row. Inline `data:image` payloads on
//! create and update are re-hosted in blob storage first, so the row only
//! ever stores a URL.
//!
//! Updates are sparse. Only fields present in the request body reach the
//! generated `SET` clause; an explicit `null` clears `text` or `team_id` and
//! is ignored for columns that cannot be null.
//!
//! ERROR HANDLING
//! ==============
//! Blob and row writes are not transactional. Delete removes the row first
//! and then tries to remove the blob; a failed blob delete is logged at
//! `warn` and does not fail the request.

#[cfg(test)]
#[path = "vision_board_test.rs"]
mod vision_board_test;

use std::time::{SystemTime, UNIX_EPOCH};

use canvas::doc::TextAlign;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};

use super::blob::{BlobError, BlobStore};
use super::image::{self, ImageError};

// =============================================================================
// TYPES
// =============================================================================

pub const TABLE: &str = "my_vision_board_items";

const COLUMNS: &str = "id, memberstack_id, team_id, image_url, x_position, y_position, width, height, \
                       z_index, text, text_color, background_color, is_bold, text_align";

pub const DEFAULT_X: f64 = 0.0;
pub const DEFAULT_Y: f64 = 0.0;
pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 200.0;
pub const DEFAULT_Z_INDEX: i32 = 1;
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_BACKGROUND_COLOR: &str = "rgba(0, 0, 0, 0.7)";

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Member ID is required")]
    MissingMember,
    #[error("Item ID is required")]
    MissingId,
    #[error("Image URL is required")]
    MissingImage,
    #[error("Invalid image payload: {0}")]
    InvalidImage(#[from] ImageError),
    #[error("No fields to update")]
    NothingToUpdate,
    #[error("Item not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("blob storage error: {0}")]
    Blob(#[from] BlobError),
}

/// One row of `my_vision_board_items`, also the JSON shape on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct VisionBoardItem {
    pub id: i64,
    pub memberstack_id: String,
    pub team_id: Option<String>,
    pub image_url: String,
    pub x_position: f64,
    pub y_position: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
    pub text: Option<String>,
    pub text_color: String,
    pub background_color: String,
    pub is_bold: bool,
    pub text_align: String,
}

/// `POST` body. Everything but the member and image has a default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItem {
    pub memberstack_id: Option<String>,
    pub team_id: Option<String>,
    pub image_url: Option<String>,
    pub x_position: Option<f64>,
    pub y_position: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i32>,
    pub text: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub is_bold: Option<bool>,
    pub text_align: Option<TextAlign>,
}

/// Column values for a new row once every default is filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub team_id: Option<String>,
    pub x_position: f64,
    pub y_position: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
    pub text: Option<String>,
    pub text_color: String,
    pub background_color: String,
    pub is_bold: bool,
    pub text_align: TextAlign,
}

impl CreateItem {
    /// Fill omitted fields with the column defaults. Explicit values, even
    /// `0` or `false`, are kept.
    #[must_use]
    pub fn with_defaults(self) -> ResolvedItem {
        ResolvedItem {
            team_id: self.team_id,
            x_position: self.x_position.unwrap_or(DEFAULT_X),
            y_position: self.y_position.unwrap_or(DEFAULT_Y),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            z_index: self.z_index.unwrap_or(DEFAULT_Z_INDEX),
            text: self.text,
            text_color: self.text_color.unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_owned()),
            background_color: self.background_color.unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_owned()),
            is_bold: self.is_bold.unwrap_or(false),
            text_align: self.text_align.unwrap_or_default(),
        }
    }
}

/// `PUT` body. `None` means "leave the column alone"; for the nullable
/// columns `Some(None)` means "set it to NULL".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub id: Option<i64>,
    pub memberstack_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub team_id: Option<Option<String>>,
    pub image_url: Option<String>,
    pub x_position: Option<f64>,
    pub y_position: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub text: Option<Option<String>>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub is_bold: Option<bool>,
    pub text_align: Option<TextAlign>,
}

/// Present-but-null becomes `Some(None)`; absence stays `None` via `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn require_member(member_id: Option<&str>) -> Result<&str, ItemError> {
    match member_id.map(str::trim) {
        Some(member) if !member.is_empty() => Ok(member),
        _ => Err(ItemError::MissingMember),
    }
}

// =============================================================================
// LIST
// =============================================================================

/// All items for a member, bottom of the stack first.
///
/// # Errors
///
/// Returns `MissingMember` for a blank member id, or a database error.
pub async fn list_items(pool: &PgPool, member_id: Option<&str>) -> Result<Vec<VisionBoardItem>, ItemError> {
    let member = require_member(member_id)?;
    let sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE memberstack_id = $1 ORDER BY z_index ASC, id ASC");
    let rows = sqlx::query_as::<_, VisionBoardItem>(&sql).bind(member).fetch_all(pool).await?;
    Ok(rows)
}

// =============================================================================
// CREATE
// =============================================================================

/// Insert a new item, re-hosting an inline image first.
///
/// # Errors
///
/// Returns `MissingMember`/`MissingImage` for incomplete bodies,
/// `InvalidImage` for undecodable payloads, and blob or database errors.
pub async fn create_item(
    pool: &PgPool,
    blobs: &dyn BlobStore,
    req: CreateItem,
) -> Result<VisionBoardItem, ItemError> {
    let member = require_member(req.memberstack_id.as_deref())?.to_owned();
    let image_url = match req.image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_owned(),
        _ => return Err(ItemError::MissingImage),
    };
    let image_url = rehost_if_inline(blobs, &member, image_url).await?;
    let values = req.with_defaults();

    let sql = format!(
        "INSERT INTO {TABLE} (memberstack_id, team_id, image_url, x_position, y_position, width, height, \
         z_index, text, text_color, background_color, is_bold, text_align) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, VisionBoardItem>(&sql)
        .bind(&member)
        .bind(values.team_id)
        .bind(image_url)
        .bind(values.x_position)
        .bind(values.y_position)
        .bind(values.width)
        .bind(values.height)
        .bind(values.z_index)
        .bind(values.text)
        .bind(values.text_color)
        .bind(values.background_color)
        .bind(values.is_bold)
        .bind(values.text_align.as_str())
        .fetch_one(pool)
        .await?;

    info!(member_id = %member, item_id = row.id, "vision board item created");
    Ok(row)
}

// =============================================================================
// UPDATE
// =============================================================================

/// Apply a sparse update to one of the member's items.
///
/// # Errors
///
/// Returns `MissingId`/`MissingMember` for incomplete bodies,
/// `NothingToUpdate` when no settable field is present, `NotFound` when the
/// row is missing or owned by someone else, and blob or database errors.
pub async fn update_item(
    pool: &PgPool,
    blobs: &dyn BlobStore,
    mut req: UpdateItem,
) -> Result<VisionBoardItem, ItemError> {
    let id = req.id.ok_or(ItemError::MissingId)?;
    let member = require_member(req.memberstack_id.as_deref())?.to_owned();
    if !has_settable_fields(&req) {
        return Err(ItemError::NothingToUpdate);
    }
    if let Some(url) = req.image_url.take() {
        req.image_url = Some(rehost_if_inline(blobs, &member, url).await?);
    }

    let mut builder = build_update_query(id, &member, &req).ok_or(ItemError::NothingToUpdate)?;
    let row = builder
        .build_query_as::<VisionBoardItem>()
        .fetch_optional(pool)
        .await?
        .ok_or(ItemError::NotFound)?;

    info!(member_id = %member, item_id = id, "vision board item updated");
    Ok(row)
}

fn has_settable_fields(req: &UpdateItem) -> bool {
    req.team_id.is_some()
        || req.image_url.is_some()
        || req.x_position.is_some()
        || req.y_position.is_some()
        || req.width.is_some()
        || req.height.is_some()
        || req.z_index.is_some()
        || req.text.is_some()
        || req.text_color.is_some()
        || req.background_color.is_some()
        || req.is_bold.is_some()
        || req.text_align.is_some()
}

/// Build `UPDATE ... SET <present fields> WHERE id AND member RETURNING ...`.
///
/// Returns `None` when the request has nothing to set.
pub(crate) fn build_update_query(id: i64, member: &str, req: &UpdateItem) -> Option<QueryBuilder<'static, Postgres>> {
    if !has_settable_fields(req) {
        return None;
    }
    let mut builder = QueryBuilder::new(format!("UPDATE {TABLE} SET "));
    {
        let mut set = builder.separated(", ");
        if let Some(team_id) = &req.team_id {
            set.push("team_id = ");
            set.push_bind_unseparated(team_id.clone());
        }
        if let Some(url) = &req.image_url {
            set.push("image_url = ");
            set.push_bind_unseparated(url.clone());
        }
        if let Some(x) = req.x_position {
            set.push("x_position = ");
            set.push_bind_unseparated(x);
        }
        if let Some(y) = req.y_position {
            set.push("y_position = ");
            set.push_bind_unseparated(y);
        }
        if let Some(width) = req.width {
            set.push("width = ");
            set.push_bind_unseparated(width);
        }
        if let Some(height) = req.height {
            set.push("height = ");
            set.push_bind_unseparated(height);
        }
        if let Some(z) = req.z_index {
            set.push("z_index = ");
            set.push_bind_unseparated(z);
        }
        if let Some(text) = &req.text {
            set.push("text = ");
            set.push_bind_unseparated(text.clone());
        }
        if let Some(color) = &req.text_color {
            set.push("text_color = ");
            set.push_bind_unseparated(color.clone());
        }
        if let Some(color) = &req.background_color {
            set.push("background_color = ");
            set.push_bind_unseparated(color.clone());
        }
        if let Some(bold) = req.is_bold {
            set.push("is_bold = ");
            set.push_bind_unseparated(bold);
        }
        if let Some(align) = req.text_align {
            set.push("text_align = ");
            set.push_bind_unseparated(align.as_str());
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" AND memberstack_id = ");
    builder.push_bind(member.to_owned());
    builder.push(format!(" RETURNING {COLUMNS}"));
    Some(builder)
}

// =============================================================================
// DELETE
// =============================================================================

/// Delete one of the member's items, then best-effort delete its blob.
///
/// # Errors
///
/// Returns `MissingId`/`MissingMember` for incomplete queries, `NotFound`
/// when the row is missing or foreign, or a database error.
pub async fn delete_item(
    pool: &PgPool,
    blobs: &dyn BlobStore,
    id: Option<i64>,
    member_id: Option<&str>,
) -> Result<(), ItemError> {
    let id = id.ok_or(ItemError::MissingId)?;
    let member = require_member(member_id)?;

    let image_url: Option<String> =
        sqlx::query_scalar(&format!("SELECT image_url FROM {TABLE} WHERE id = $1 AND memberstack_id = $2"))
            .bind(id)
            .bind(member)
            .fetch_optional(pool)
            .await?;
    let Some(image_url) = image_url else {
        return Err(ItemError::NotFound);
    };

    let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1 AND memberstack_id = $2"))
        .bind(id)
        .bind(member)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ItemError::NotFound);
    }
    info!(member_id = %member, item_id = id, "vision board item deleted");

    cleanup_blob(blobs, &image_url, id).await;
    Ok(())
}

/// Remove a stored image if it lives in our blob store. Failures are logged only.
pub(crate) async fn cleanup_blob(blobs: &dyn BlobStore, image_url: &str, item_id: i64) {
    if !blobs.owns(image_url) {
        return;
    }
    if let Err(e) = blobs.delete(image_url).await {
        warn!(error = %e, item_id, image_url, "blob cleanup failed; object left behind");
    }
}

// =============================================================================
// IMAGES
// =============================================================================

/// Upload an inline image and return its blob URL; pass other URLs through.
pub(crate) async fn rehost_if_inline(blobs: &dyn BlobStore, member: &str, url: String) -> Result<String, ItemError> {
    if !image::is_inline_image(&url) {
        return Ok(url);
    }
    let inline = image::parse_data_url(&url)?;
    let pathname = image::blob_pathname(member, unix_ms(), inline.extension());
    let stored = blobs.put(&pathname, &inline.mime, inline.bytes).await?;
    info!(member_id = %member, pathname = %pathname, "inline image stored");
    Ok(stored)
}

fn unix_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis())
}
