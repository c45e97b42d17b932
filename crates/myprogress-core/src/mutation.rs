//! # Mutation Engine
//!
//! Every transform that changes a Person document.
//!
//! The engine works on a *working copy*: the [`DocumentStore`](crate::DocumentStore)
//! clones its current snapshot, hands the clone to one of these functions,
//! and only installs it if the call returned an applied [`Change`]. A failed
//! or declined call therefore never leaks a half-edited tree.
//!
//! Rules shared by all upserts:
//! - required fields are validated first; a blank one yields [`Change::Declined`]
//! - parents are located before any identifier is allocated
//! - optional text given as blank clears the field, `None` keeps it
//! - new feedback is prepended, every other collection is appended

use crate::clock::Clock;
use crate::drafts::{
    FeedbackDraft, ObjectiveDraft, OutcomeDraft, PersonDraft, StageDraft, TaskDraft,
    ValidationError, required,
};
use crate::ids::IdGenerator;
use crate::{
    EntityId, Feedback, Objective, ObjectivePath, Outcome, Person, ProgressError, Stage, Task,
    Timestamp,
};

// =============================================================================
// CHANGE REPORTING
// =============================================================================

/// Reference to any entity below the Person root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Stage(EntityId),
    Objective(ObjectivePath),
    Task(ObjectivePath, EntityId),
    Outcome(ObjectivePath, EntityId),
    Feedback { stage: EntityId, feedback: EntityId },
}

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new entity was added.
    Created(EntityId),
    /// An existing entity had fields merged into it.
    Updated(EntityId),
    /// An entity and its subtree were deleted.
    Removed(EntityRef),
    /// A task or outcome flipped; `done` is the new flag value.
    Toggled { id: EntityId, done: bool },
    /// The whole document was discarded.
    Cleared,
    /// The draft failed required-field validation; nothing changed.
    Declined(ValidationError),
}

impl Change {
    /// Whether the document was modified.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Change::Declined(_))
    }

    /// Identifier of the created or updated entity, if any.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        match self {
            Change::Created(id) | Change::Updated(id) | Change::Toggled { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Identifier source and clock borrowed for one mutation.
pub struct MutationContext<'a> {
    pub ids: &'a mut dyn IdGenerator,
    pub clock: &'a dyn Clock,
}

macro_rules! validated {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(declined) => return Ok(Change::Declined(declined)),
        }
    };
}

// =============================================================================
// ENGINE
// =============================================================================

/// The MutationEngine groups all document transforms.
pub struct MutationEngine;

impl MutationEngine {
    // =========================================================================
    // PERSON
    // =========================================================================

    /// Build a fresh Person with an empty stage list.
    pub fn create_person(
        ctx: &mut MutationContext<'_>,
        draft: &PersonDraft,
    ) -> Result<Person, ValidationError> {
        let (name, company) = draft.validate()?;
        Ok(Person {
            id: ctx.ids.next_id(),
            name,
            company,
            avatar: draft.avatar.clone().filter(|a| !a.is_empty()),
            created_at: ctx.clock.now(),
            stages: Vec::new(),
        })
    }

    /// Edit the root profile. An absent avatar keeps the current one.
    pub fn update_person(person: &mut Person, draft: &PersonDraft) -> Result<Change, ProgressError> {
        let (name, company) = validated!(draft.validate());
        person.name = name;
        person.company = company;
        if let Some(avatar) = draft.avatar.as_ref().filter(|a| !a.is_empty()) {
            person.avatar = Some(avatar.clone());
        }
        Ok(Change::Updated(person.id))
    }

    /// Drop the avatar.
    pub fn remove_avatar(person: &mut Person) -> Change {
        person.avatar = None;
        Change::Updated(person.id)
    }

    // =========================================================================
    // UPSERTS
    // =========================================================================

    pub fn upsert_stage(
        person: &mut Person,
        ctx: &mut MutationContext<'_>,
        draft: &StageDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        let name = validated!(required("name", &draft.name));

        if let Some(id) = existing {
            let stage = stage_mut(person, id)?;
            stage.name = name;
            if let Some(start) = non_blank(&draft.start_date) {
                stage.start_date = start;
            }
            merge_text(&mut stage.end_date, &draft.end_date);
            merge_text(&mut stage.description, &draft.description);
            if let Some(status) = draft.status {
                stage.status = status;
            }
            return Ok(Change::Updated(id));
        }

        let id = ctx.ids.next_id();
        person.stages.push(Stage {
            id,
            name,
            start_date: non_blank(&draft.start_date).unwrap_or_else(|| ctx.clock.today()),
            end_date: non_blank(&draft.end_date),
            description: non_blank(&draft.description),
            status: draft.status.unwrap_or_default(),
            objectives: Vec::new(),
            feedback: Vec::new(),
        });
        Ok(Change::Created(id))
    }

    pub fn upsert_objective(
        person: &mut Person,
        ctx: &mut MutationContext<'_>,
        stage_id: EntityId,
        draft: &ObjectiveDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        let title = validated!(required("title", &draft.title));
        let stage = stage_mut(person, stage_id)?;

        if let Some(id) = existing {
            let objective = stage
                .objectives
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or(ProgressError::ObjectiveNotFound(id))?;
            objective.title = title;
            if let Some(start) = non_blank(&draft.start_date) {
                objective.start_date = start;
            }
            merge_text(&mut objective.end_date, &draft.end_date);
            merge_text(&mut objective.motivation, &draft.motivation);
            merge_text(&mut objective.expected_results, &draft.expected_results);
            if let Some(status) = draft.status {
                objective.status = status;
            }
            return Ok(Change::Updated(id));
        }

        let id = ctx.ids.next_id();
        stage.objectives.push(Objective {
            id,
            title,
            start_date: non_blank(&draft.start_date).unwrap_or_else(|| ctx.clock.today()),
            end_date: non_blank(&draft.end_date),
            motivation: non_blank(&draft.motivation),
            expected_results: non_blank(&draft.expected_results),
            status: draft.status.unwrap_or_default(),
            tasks: Vec::new(),
            outcomes: Vec::new(),
        });
        Ok(Change::Created(id))
    }

    pub fn upsert_task(
        person: &mut Person,
        ctx: &mut MutationContext<'_>,
        path: ObjectivePath,
        draft: &TaskDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        let description = validated!(required("description", &draft.description));
        let objective = objective_mut(person, path)?;

        if let Some(id) = existing {
            let task = objective
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ProgressError::TaskNotFound(id))?;
            task.description = description;
            if let Some(completed) = draft.completed {
                set_flag(
                    &mut task.completed,
                    &mut task.completed_at,
                    completed,
                    ctx.clock,
                );
            }
            return Ok(Change::Updated(id));
        }

        let completed = draft.completed.unwrap_or(false);
        let id = ctx.ids.next_id();
        objective.tasks.push(Task {
            id,
            description,
            completed,
            completed_at: completed.then(|| ctx.clock.now()),
        });
        Ok(Change::Created(id))
    }

    pub fn upsert_outcome(
        person: &mut Person,
        ctx: &mut MutationContext<'_>,
        path: ObjectivePath,
        draft: &OutcomeDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        let description = validated!(required("description", &draft.description));
        let objective = objective_mut(person, path)?;

        if let Some(id) = existing {
            let outcome = objective
                .outcomes
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or(ProgressError::OutcomeNotFound(id))?;
            outcome.description = description;
            if let Some(achieved) = draft.achieved {
                set_flag(
                    &mut outcome.achieved,
                    &mut outcome.achieved_at,
                    achieved,
                    ctx.clock,
                );
            }
            return Ok(Change::Updated(id));
        }

        let achieved = draft.achieved.unwrap_or(false);
        let id = ctx.ids.next_id();
        objective.outcomes.push(Outcome {
            id,
            description,
            achieved,
            achieved_at: achieved.then(|| ctx.clock.now()),
        });
        Ok(Change::Created(id))
    }

    /// Feedback keeps its original `created_at` when edited.
    pub fn upsert_feedback(
        person: &mut Person,
        ctx: &mut MutationContext<'_>,
        stage_id: EntityId,
        draft: &FeedbackDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        let author = validated!(required("author", &draft.author));
        let comment = validated!(required("comment", &draft.comment));
        let stage = stage_mut(person, stage_id)?;

        if let Some(id) = existing {
            let feedback = stage
                .feedback
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or(ProgressError::FeedbackNotFound(id))?;
            feedback.author = author;
            feedback.comment = comment;
            return Ok(Change::Updated(id));
        }

        let id = ctx.ids.next_id();
        stage.feedback.insert(
            0,
            Feedback {
                id,
                author,
                comment,
                created_at: ctx.clock.now(),
            },
        );
        Ok(Change::Created(id))
    }

    // =========================================================================
    // REMOVAL
    // =========================================================================

    /// Delete an entity together with everything it owns.
    ///
    /// Stages take their objectives (with tasks and outcomes) and feedback
    /// with them; objectives take their tasks and outcomes.
    pub fn remove(person: &mut Person, target: EntityRef) -> Result<Change, ProgressError> {
        match target {
            EntityRef::Stage(id) => {
                let index = person
                    .stages
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or(ProgressError::StageNotFound(id))?;
                person.stages.remove(index);
            }
            EntityRef::Objective(path) => {
                let stage = stage_mut(person, path.stage)?;
                remove_by_id(&mut stage.objectives, |o| o.id, path.objective)
                    .ok_or(ProgressError::ObjectiveNotFound(path.objective))?;
            }
            EntityRef::Task(path, id) => {
                let objective = objective_mut(person, path)?;
                remove_by_id(&mut objective.tasks, |t| t.id, id)
                    .ok_or(ProgressError::TaskNotFound(id))?;
            }
            EntityRef::Outcome(path, id) => {
                let objective = objective_mut(person, path)?;
                remove_by_id(&mut objective.outcomes, |o| o.id, id)
                    .ok_or(ProgressError::OutcomeNotFound(id))?;
            }
            EntityRef::Feedback { stage, feedback } => {
                let stage = stage_mut(person, stage)?;
                remove_by_id(&mut stage.feedback, |f| f.id, feedback)
                    .ok_or(ProgressError::FeedbackNotFound(feedback))?;
            }
        }
        Ok(Change::Removed(target))
    }

    // =========================================================================
    // TOGGLES
    // =========================================================================

    /// Flip a task's completion, stamping or clearing `completed_at`.
    pub fn toggle_task(
        person: &mut Person,
        clock: &dyn Clock,
        path: ObjectivePath,
        task_id: EntityId,
    ) -> Result<Change, ProgressError> {
        let task = objective_mut(person, path)?
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(ProgressError::TaskNotFound(task_id))?;
        let done = !task.completed;
        set_flag(&mut task.completed, &mut task.completed_at, done, clock);
        Ok(Change::Toggled { id: task_id, done })
    }

    /// Flip an outcome's achievement, stamping or clearing `achieved_at`.
    pub fn toggle_outcome(
        person: &mut Person,
        clock: &dyn Clock,
        path: ObjectivePath,
        outcome_id: EntityId,
    ) -> Result<Change, ProgressError> {
        let outcome = objective_mut(person, path)?
            .outcomes
            .iter_mut()
            .find(|o| o.id == outcome_id)
            .ok_or(ProgressError::OutcomeNotFound(outcome_id))?;
        let done = !outcome.achieved;
        set_flag(&mut outcome.achieved, &mut outcome.achieved_at, done, clock);
        Ok(Change::Toggled {
            id: outcome_id,
            done,
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn stage_mut(person: &mut Person, id: EntityId) -> Result<&mut Stage, ProgressError> {
    person
        .stages
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or(ProgressError::StageNotFound(id))
}

fn objective_mut(person: &mut Person, path: ObjectivePath) -> Result<&mut Objective, ProgressError> {
    stage_mut(person, path.stage)?
        .objectives
        .iter_mut()
        .find(|o| o.id == path.objective)
        .ok_or(ProgressError::ObjectiveNotFound(path.objective))
}

fn remove_by_id<T>(items: &mut Vec<T>, id_of: impl Fn(&T) -> EntityId, id: EntityId) -> Option<T> {
    let index = items.iter().position(|item| id_of(item) == id)?;
    Some(items.remove(index))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn merge_text(field: &mut Option<String>, update: &Option<String>) {
    if update.is_some() {
        *field = non_blank(update);
    }
}

/// Keeps `stamp.is_some() == flag`. An unchanged flag keeps its stamp.
fn set_flag(flag: &mut bool, stamp: &mut Option<Timestamp>, value: bool, clock: &dyn Clock) {
    if *flag == value {
        return;
    }
    *flag = value;
    *stamp = value.then(|| clock.now());
}

// =============================================================================
// TESTS
// =============================================================================
