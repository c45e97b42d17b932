//! # Avatar Encoding
//!
//! Profile pictures live inside the document as `data:` URLs, so an export
//! is self-contained. Uploads are capped at [`MAX_AVATAR_BYTES`].

use crate::ProgressError;
use crate::primitives::{DEFAULT_AVATAR_MIME, MAX_AVATAR_BYTES};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Encode raw image bytes as `data:<mime>;base64,<payload>`.
///
/// Fails with [`ProgressError::SizeLimit`] when `bytes` exceeds the cap.
pub fn encode_avatar(bytes: &[u8], mime: &str) -> Result<String, ProgressError> {
    check_avatar_size(bytes.len())?;
    let mime = if mime.trim().is_empty() {
        DEFAULT_AVATAR_MIME
    } else {
        mime.trim()
    };
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Reject payloads over the avatar cap before reading them.
pub fn check_avatar_size(size: usize) -> Result<(), ProgressError> {
    if size > MAX_AVATAR_BYTES {
        return Err(ProgressError::SizeLimit {
            size,
            max: MAX_AVATAR_BYTES,
        });
    }
    Ok(())
}

/// Split a base64 data URL back into `(mime, bytes)`.
pub fn decode_avatar(data_url: &str) -> Result<(String, Vec<u8>), ProgressError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| ProgressError::InvalidAvatar("missing data: prefix".to_string()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| ProgressError::InvalidAvatar("not base64 encoded".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| ProgressError::InvalidAvatar(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}

/// Guess an image mime type from a file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => DEFAULT_AVATAR_MIME,
    }
}
