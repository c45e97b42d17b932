//! # JSON Export / Import
//!
//! The exported document is the only persistence format: pretty-printed
//! JSON of the whole [`Person`] aggregate, two-space indented.
//!
//! Import accepts anything that parses into the Person shape. There is no
//! version field and no migration step. A failed parse returns
//! [`ProgressError::Parse`] and has no side effects; installing the result
//! is the store's job.
//!
//! ## Round-trip
//!
//! `import_json(&export_json(p)?)? == p`, and re-exporting an imported
//! export reproduces the same bytes.

use crate::primitives::{EXPORT_FILE_SUFFIX, EXPORT_NAME_SEPARATOR};
use crate::{Person, ProgressError};

/// Serialize a document to pretty-printed JSON.
pub fn export_json(person: &Person) -> Result<String, ProgressError> {
    serde_json::to_string_pretty(person).map_err(|e| ProgressError::Serialization(e.to_string()))
}

/// Serialize a document to pretty-printed JSON bytes.
pub fn export_bytes(person: &Person) -> Result<Vec<u8>, ProgressError> {
    serde_json::to_vec_pretty(person).map_err(|e| ProgressError::Serialization(e.to_string()))
}

/// Parse a document from JSON text.
pub fn import_json(text: &str) -> Result<Person, ProgressError> {
    serde_json::from_str(text).map_err(|e| ProgressError::Parse(e.to_string()))
}

/// Parse a document from raw bytes (must be UTF-8 JSON).
pub fn import_bytes(bytes: &[u8]) -> Result<Person, ProgressError> {
    serde_json::from_slice(bytes).map_err(|e| ProgressError::Parse(e.to_string()))
}

/// `<name with whitespace runs replaced by "_">_development.json`.
///
/// The result is always a single path component: path separators and
/// control characters count as whitespace, and leading dots are dropped.
#[must_use]
pub fn export_filename(person: &Person) -> String {
    let name = person.name.trim_start_matches('.');
    let mut file_name = String::with_capacity(name.len() + EXPORT_FILE_SUFFIX.len());
    let mut in_separator = false;

    for c in name.chars() {
        if is_name_separator(c) {
            if !in_separator {
                file_name.push(EXPORT_NAME_SEPARATOR);
            }
            in_separator = true;
        } else {
            file_name.push(c);
            in_separator = false;
        }
    }

    file_name.push_str(EXPORT_FILE_SUFFIX);
    file_name
}

fn is_name_separator(c: char) -> bool {
    c.is_whitespace() || c.is_control() || c == '/' || c == '\\'
}

// =============================================================================
// TESTS
// =============================================================================
