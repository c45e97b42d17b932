//! # Core Type Definitions
//!
//! This module contains the small shared types of the MyProgress document model:
//! - Entity identifiers (`EntityId`)
//! - Lifecycle status for stages and objectives (`Status`)
//! - Wall-clock timestamps (`Timestamp`)
//! - Error types (`ProgressError`)
//!
//! ## Wire Format
//!
//! All types serialize to the JSON shape used by exported documents:
//! identifiers are bare integers, statuses are snake_case strings and
//! timestamps are RFC 3339 strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of any entity in a Person document.
///
/// Identifiers are assigned once at creation and never reused. Uniqueness is
/// guaranteed document-wide by the store's [`IdGenerator`](crate::IdGenerator),
/// which is stronger than the per-collection uniqueness the format requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Get the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Lifecycle status of a Stage or an Objective.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not started yet.
    #[default]
    Planned,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Abandoned; kept for history.
    Discarded,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 4] = [
        Status::Planned,
        Status::InProgress,
        Status::Completed,
        Status::Discarded,
    ];

    /// Wire name of the status (`in_progress`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Planned => "planned",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Discarded => "discarded",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Status::Planned => "Planned",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Discarded => "Discarded",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Status {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ProgressError::UnknownStatus(s.to_string()))
    }
}

// =============================================================================
// TIMESTAMP
// =============================================================================

/// A point in time, stored as an RFC 3339 UTC string with millisecond
/// precision (`2024-01-31T09:15:00.000Z`).
///
/// Kept as text so an imported document round-trips byte-for-byte even when
/// it was written by another producer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub String);

impl Timestamp {
    /// Create a timestamp from its textual form.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the timestamp as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY-MM-DD` prefix of the timestamp.
    #[must_use]
    pub fn date_part(&self) -> &str {
        self.0.split('T').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the MyProgress core.
///
/// - Every failure leaves the loaded document in its last valid state
/// - Blank required fields are not errors: they are reported as
///   [`Change::Declined`](crate::Change::Declined)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    /// An entity operation was issued while no Person is loaded.
    #[error("No document loaded")]
    NoDocument,

    /// The requested stage does not exist.
    #[error("Stage not found: {0}")]
    StageNotFound(EntityId),

    /// The requested objective does not exist in its stage.
    #[error("Objective not found: {0}")]
    ObjectiveNotFound(EntityId),

    /// The requested task does not exist in its objective.
    #[error("Task not found: {0}")]
    TaskNotFound(EntityId),

    /// The requested outcome does not exist in its objective.
    #[error("Outcome not found: {0}")]
    OutcomeNotFound(EntityId),

    /// The requested feedback entry does not exist in its stage.
    #[error("Feedback not found: {0}")]
    FeedbackNotFound(EntityId),

    /// `confirm`/`cancel` issued with no removal pending.
    #[error("No removal pending confirmation")]
    NothingPending,

    /// A status string did not match any known status.
    #[error("Unknown status: {0} (expected planned, in_progress, completed or discarded)")]
    UnknownStatus(String),

    /// Imported text is not a valid Person document.
    #[error("Error loading JSON document: {0}")]
    Parse(String),

    /// Avatar payload exceeds the size cap.
    #[error("File size must be less than 5MB ({size} bytes given, {max} allowed)")]
    SizeLimit { size: usize, max: usize },

    /// Avatar data URL could not be decoded.
    #[error("Invalid avatar data: {0}")]
    InvalidAvatar(String),

    /// A new document would overwrite an existing one without `--force`.
    #[error("Document already exists at {0}. Use --force to replace it.")]
    DocumentExists(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&Status::InProgress).expect("serialize");
        assert_eq!(json, "\"in_progress\"");

        let parsed: Status = serde_json::from_str("\"discarded\"").expect("parse");
        assert_eq!(parsed, Status::Discarded);
    }

    #[test]
    fn status_defaults_to_planned() {
        assert_eq!(Status::default(), Status::Planned);
    }

    #[test]
    fn status_from_str_is_lenient_on_separators() {
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("In Progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("completed".parse::<Status>(), Ok(Status::Completed));
        assert!(matches!(
            "done".parse::<Status>(),
            Err(ProgressError::UnknownStatus(_))
        ));
    }

    #[test]
    fn entity_id_is_a_bare_number_on_the_wire() {
        let json = serde_json::to_string(&EntityId(1_717_171_717_000)).expect("serialize");
        assert_eq!(json, "1717171717000");
    }

    #[test]
    fn timestamp_date_part() {
        let ts = Timestamp::new("2024-03-05T10:00:00.000Z");
        assert_eq!(ts.date_part(), "2024-03-05");
    }
}
