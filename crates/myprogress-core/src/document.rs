//! # Document Model
//!
//! The Person aggregate and everything it owns:
//!
//! ```text
//! Person
//!  └── Stage*
//!       ├── Objective*
//!       │    ├── Task*
//!       │    └── Outcome*
//!       └── Feedback*   (most recent first)
//! ```
//!
//! Ownership is strictly hierarchical: removing a node removes its whole
//! subtree. Field names on the wire are camelCase.

use crate::{EntityId, Status, Timestamp};
use serde::{Deserialize, Serialize};

// =============================================================================
// PERSON
// =============================================================================

/// The root aggregate: one person's development plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    pub company: String,
    /// Inline `data:` URL of the profile picture. Written as `null` when unset.
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Person {
    /// Find a stage by id.
    #[must_use]
    pub fn stage(&self, id: EntityId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Largest identifier used anywhere in the document.
    ///
    /// Used to seed identifier generation after an import so new entities
    /// never collide with existing ones.
    #[must_use]
    pub fn max_id(&self) -> EntityId {
        let mut max = self.id;
        for stage in &self.stages {
            max = max.max(stage.id);
            for feedback in &stage.feedback {
                max = max.max(feedback.id);
            }
            for objective in &stage.objectives {
                max = max.max(objective.id);
                for task in &objective.tasks {
                    max = max.max(task.id);
                }
                for outcome in &objective.outcomes {
                    max = max.max(outcome.id);
                }
            }
        }
        max
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// A top-level phase of the development plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: EntityId,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

impl Stage {
    /// Find an objective by id.
    #[must_use]
    pub fn objective(&self, id: EntityId) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }
}

// =============================================================================
// OBJECTIVE
// =============================================================================

/// A goal within a stage, tracked through tasks and outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: EntityId,
    pub title: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

// =============================================================================
// LEAF ENTITIES
// =============================================================================

/// An actionable step toward an objective.
///
/// Invariant: `completed_at.is_some() == completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

/// A desired result of an objective.
///
/// Invariant: `achieved_at.is_some() == achieved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub id: EntityId,
    pub description: String,
    #[serde(default)]
    pub achieved: bool,
    #[serde(default)]
    pub achieved_at: Option<Timestamp>,
}

/// A comment left on a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: EntityId,
    pub author: String,
    pub comment: String,
    pub created_at: Timestamp,
}

// =============================================================================
// PATHS
// =============================================================================

/// Location of an objective: its stage, then the objective itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectivePath {
    pub stage: EntityId,
    pub objective: EntityId,
}

impl ObjectivePath {
    #[must_use]
    pub const fn new(stage: EntityId, objective: EntityId) -> Self {
        Self { stage, objective }
    }
}

// =============================================================================
// TESTS
// =============================================================================
