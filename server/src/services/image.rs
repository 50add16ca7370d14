//! Inline image payloads.
//!
//! Clients may send an item's `image_url` as a `data:image/<type>;base64,...`
//! URL. Such payloads are decoded here and re-hosted in blob storage under a
//! per-member pathname before the row is written.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

const INLINE_PREFIX: &str = "data:image";
const PATH_ROOT: &str = "my-vision-board";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image data URL is malformed")]
    Malformed,
    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("image payload is empty")]
    Empty,
}

/// A decoded inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    /// File extension for the stored object, `jpg` when the type is unknown.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            "image/avif" => "avif",
            "image/bmp" => "bmp",
            _ => "jpg",
        }
    }
}

#[must_use]
pub fn is_inline_image(url: &str) -> bool {
    url.starts_with(INLINE_PREFIX)
}

/// Decode a `data:image/...;base64,<payload>` URL.
///
/// # Errors
///
/// Returns `Malformed` when the header is not a base64 image header,
/// `Decode` for bad base64, and `Empty` for a zero-length payload.
pub fn parse_data_url(url: &str) -> Result<InlineImage, ImageError> {
    let rest = url.strip_prefix("data:").ok_or(ImageError::Malformed)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::Malformed)?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !mime.starts_with("image/") || !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(ImageError::Malformed);
    }
    let bytes = STANDARD.decode(payload.trim())?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    Ok(InlineImage { mime, bytes })
}

/// Blob pathname for a member's upload: `my-vision-board/{member}/{unix_ms}.{ext}`.
///
/// Characters outside `[A-Za-z0-9_-]` in the member id become `_` so the id
/// cannot add path segments.
#[must_use]
pub fn blob_pathname(member_id: &str, unix_ms: u128, extension: &str) -> String {
    let member: String = member_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{PATH_ROOT}/{member}/{unix_ms}.{extension}")
}
