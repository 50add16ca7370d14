//! Upload flow: image validation, data-URL encoding, and new-item placement.
//!
//! The client never talks to blob storage directly. It encodes the picked file
//! as a `data:<mime>;base64,...` URL and posts it as the item's `image_url`;
//! the server recognizes the prefix and re-hosts the bytes.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{UPLOAD_ITEM_HEIGHT, UPLOAD_ITEM_WIDTH};
use crate::geom::BoardSize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("not an image: {0}")]
    NotAnImage(String),
    #[error("file is empty")]
    Empty,
}

/// Whether a MIME type names an image.
#[must_use]
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Guess an image MIME type from a file name's extension.
#[must_use]
pub fn mime_from_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// Encode image bytes as a `data:` URL.
///
/// # Errors
///
/// Returns `NotAnImage` for non-image MIME types and `Empty` for zero bytes.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> Result<String, UploadError> {
    if !is_image_mime(mime) {
        return Err(UploadError::NotAnImage(mime.to_owned()));
    }
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    Ok(format!("data:{};base64,{}", mime.trim(), STANDARD.encode(bytes)))
}

/// Where a new item lands on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

/// Pick a random position that keeps a default-sized item on the board.
pub fn random_placement<R: Rng + ?Sized>(rng: &mut R, board: BoardSize, z_index: i32) -> Placement {
    let max_x = (board.width - UPLOAD_ITEM_WIDTH).max(0.0);
    let max_y = (board.height - UPLOAD_ITEM_HEIGHT).max(0.0);
    Placement {
        x: rng.random_range(0.0..=max_x),
        y: rng.random_range(0.0..=max_y),
        width: UPLOAD_ITEM_WIDTH,
        height: UPLOAD_ITEM_HEIGHT,
        z_index,
    }
}

/// Body of the create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub memberstack_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub image_url: String,
    pub x_position: f64,
    pub y_position: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

impl NewItem {
    #[must_use]
    pub fn new(memberstack_id: &str, team_id: Option<&str>, image_url: String, placement: Placement) -> Self {
        Self {
            memberstack_id: memberstack_id.to_owned(),
            team_id: team_id.map(str::to_owned),
            image_url,
            x_position: placement.x,
            y_position: placement.y,
            width: placement.width,
            height: placement.height,
            z_index: placement.z_index,
        }
    }
}
