//! # Progress Rollups
//!
//! Derived percentages over a document. Nothing here is stored; every value
//! is recomputed from the tree on demand.
//!
//! | Level | Rule |
//! |-------|------|
//! | Objective | `round(100 * (completed tasks + achieved outcomes) / (tasks + outcomes))`, 0 when empty |
//! | Stage | `round(mean(objective progress))`, 0 without objectives |
//!
//! The stage rule is a two-level, unweighted average: an objective with one
//! item counts as much as an objective with fifty.
//!
//! Rounding is half-up and uses integer arithmetic only:
//! `round(n / d) = (2n + d) / 2d`.

use crate::primitives::FULL_PROGRESS;
use crate::{EntityId, Objective, Person, Stage, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Integer division rounded half-up. `denominator` must be non-zero.
fn round_ratio(numerator: u64, denominator: u64) -> u64 {
    numerator
        .saturating_mul(2)
        .saturating_add(denominator)
        / denominator.saturating_mul(2)
}

/// Completion percentage (0..=100) of an objective.
#[must_use]
pub fn objective_progress(objective: &Objective) -> u8 {
    let total = objective.tasks.len() + objective.outcomes.len();
    if total == 0 {
        return 0;
    }
    let done = objective.tasks.iter().filter(|t| t.completed).count()
        + objective.outcomes.iter().filter(|o| o.achieved).count();

    let percent = round_ratio((done as u64).saturating_mul(100), total as u64);
    percent.min(FULL_PROGRESS as u64) as u8
}

/// Unweighted mean of the stage's objective percentages (0..=100).
#[must_use]
pub fn stage_progress(stage: &Stage) -> u8 {
    if stage.objectives.is_empty() {
        return 0;
    }
    let sum: u64 = stage
        .objectives
        .iter()
        .map(|o| objective_progress(o) as u64)
        .sum();

    round_ratio(sum, stage.objectives.len() as u64).min(FULL_PROGRESS as u64) as u8
}

// =============================================================================
// REPORTS
// =============================================================================

/// Progress of one objective with its item counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveReport {
    pub id: EntityId,
    pub title: String,
    pub status: Status,
    pub progress: u8,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub outcomes_achieved: usize,
    pub outcomes_total: usize,
}

impl ObjectiveReport {
    #[must_use]
    pub fn from_objective(objective: &Objective) -> Self {
        Self {
            id: objective.id,
            title: objective.title.clone(),
            status: objective.status,
            progress: objective_progress(objective),
            tasks_completed: objective.tasks.iter().filter(|t| t.completed).count(),
            tasks_total: objective.tasks.len(),
            outcomes_achieved: objective.outcomes.iter().filter(|o| o.achieved).count(),
            outcomes_total: objective.outcomes.len(),
        }
    }
}

/// Progress of one stage and each of its objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub id: EntityId,
    pub name: String,
    pub status: Status,
    pub progress: u8,
    pub feedback_count: usize,
    pub objectives: Vec<ObjectiveReport>,
}

impl StageReport {
    #[must_use]
    pub fn from_stage(stage: &Stage) -> Self {
        Self {
            id: stage.id,
            name: stage.name.clone(),
            status: stage.status,
            progress: stage_progress(stage),
            feedback_count: stage.feedback.len(),
            objectives: stage
                .objectives
                .iter()
                .map(ObjectiveReport::from_objective)
                .collect(),
        }
    }
}

/// Whole-document counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub stage_count: usize,
    pub objective_count: usize,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub outcomes_achieved: usize,
    pub outcomes_total: usize,
    pub feedback_count: usize,
    /// Stage count per status; statuses without stages are omitted.
    pub stages_by_status: BTreeMap<Status, usize>,
}

impl DocumentSummary {
    #[must_use]
    pub fn from_person(person: &Person) -> Self {
        let mut summary = Self {
            stage_count: person.stages.len(),
            ..Self::default()
        };

        for stage in &person.stages {
            *summary.stages_by_status.entry(stage.status).or_insert(0) += 1;
            summary.feedback_count += stage.feedback.len();
            summary.objective_count += stage.objectives.len();

            for objective in &stage.objectives {
                summary.tasks_total += objective.tasks.len();
                summary.tasks_completed += objective.tasks.iter().filter(|t| t.completed).count();
                summary.outcomes_total += objective.outcomes.len();
                summary.outcomes_achieved +=
                    objective.outcomes.iter().filter(|o| o.achieved).count();
            }
        }

        summary
    }
}

// =============================================================================
// TESTS
// =============================================================================
