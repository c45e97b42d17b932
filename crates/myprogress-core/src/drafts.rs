//! # Editor Drafts
//!
//! A draft is the payload of one "save" action from an editor: the fields
//! the user filled in for a new entity, or the fields to merge into an
//! existing one.
//!
//! Required fields are plain `String`s and are always validated
//! (trimmed, non-empty). Optional fields are `Option`s: on create a missing
//! value falls back to its default, on edit a missing value keeps what the
//! entity already has.

use crate::Status;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// VALIDATION
// =============================================================================

/// A required field was missing or blank.
///
/// Never surfaced as an error by the store: an invalid draft makes the
/// operation decline without touching the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} is required")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Trim `value` and reject it when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(trimmed.to_string())
    }
}

// =============================================================================
// DRAFTS
// =============================================================================

/// Root profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub company: String,
    /// `None` keeps the current avatar when editing.
    pub avatar: Option<String>,
}

impl PersonDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            avatar: None,
        }
    }

    /// Returns the trimmed `(name, company)` pair.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        Ok((
            required("name", &self.name)?,
            required("company", &self.company)?,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDraft {
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl StageDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveDraft {
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub motivation: Option<String>,
    pub expected_results: Option<String>,
    pub status: Option<Status>,
}

impl ObjectiveDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub description: String,
    pub completed: Option<bool>,
}

impl TaskDraft {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            completed: None,
        }
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDraft {
    pub description: String,
    pub achieved: Option<bool>,
}

impl OutcomeDraft {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            achieved: None,
        }
    }

    #[must_use]
    pub fn achieved(mut self, achieved: bool) -> Self {
        self.achieved = Some(achieved);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub author: String,
    pub comment: String,
}

impl FeedbackDraft {
    #[must_use]
    pub fn new(author: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            comment: comment.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
