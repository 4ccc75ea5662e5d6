use std::path::Path;

use chrono::Utc;
use image::ImageFormat;
use thiserror::Error;
use uuid::Uuid;

use super::StoreError;

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const SVG_MIME: &str = "image/svg+xml";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("`{0}` is not an image type")]
    NotAnImage(String),
    #[error("SVG images are not accepted")]
    Svg,
    #[error("image is {size} bytes; uploads are limited to {max} bytes")]
    TooLarge { size: usize, max: usize },
    #[error("file contents are not a recognised image format")]
    Unrecognised,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Check an upload before it is sent to storage.
///
/// The declared MIME type must be a raster `image/*` type, the payload must
/// fit within [`MAX_UPLOAD_BYTES`] and the bytes must sniff as a known
/// raster format.
///
/// # Errors
/// Returns the first check that fails.
pub fn validate_upload(mime: &str, bytes: &[u8]) -> Result<ImageFormat, UploadError> {
    let declared = mime.trim().to_ascii_lowercase();
    if !declared.starts_with("image/") {
        return Err(UploadError::NotAnImage(mime.to_string()));
    }
    if declared == SVG_MIME {
        return Err(UploadError::Svg);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_BYTES,
        });
    }
    image::guess_format(bytes).map_err(|_| UploadError::Unrecognised)
}

/// Unique storage name for an upload: `<millis>-<token>.<ext>`.
///
/// The extension comes from `file_name`, falling back to the sniffed format.
pub fn object_name(file_name: &str, format: ImageFormat) -> String {
    let millis = Utc::now().timestamp_millis();
    let token = Uuid::new_v4().simple().to_string();

    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .or_else(|| format.extensions_str().first().map(|ext| (*ext).to_string()))
        .unwrap_or_else(|| "img".to_string());

    format!("{millis}-{}.{ext}", &token[..7])
}

/// MIME type of an image file judged by its extension, as a browser would
/// declare it on upload.
pub fn mime_for_path(path: &Path) -> &'static str {
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        return SVG_MIME;
    }
    ImageFormat::from_path(path).map_or("application/octet-stream", |format| format.to_mime_type())
}
