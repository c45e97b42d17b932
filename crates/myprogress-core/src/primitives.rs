//! # Primitives
//!
//! Fixed constants of the MyProgress document format.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Maximum avatar payload size in bytes (5 MB).
///
/// - Checked against the raw image bytes, before base64 encoding.
/// - Larger uploads are declined with `ProgressError::SizeLimit`.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Suffix appended to the person's name to form the export filename.
pub const EXPORT_FILE_SUFFIX: &str = "_development.json";

/// Separator that replaces each run of whitespace or path separators in
/// export filenames.
pub const EXPORT_NAME_SEPARATOR: char = '_';

/// Fallback avatar mime type when the image format cannot be inferred.
pub const DEFAULT_AVATAR_MIME: &str = "application/octet-stream";

/// Upper bound on a percentage returned by the progress rollups.
pub const FULL_PROGRESS: u8 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_cap_is_five_mebibytes() {
        assert_eq!(MAX_AVATAR_BYTES, 5_242_880);
    }
}
