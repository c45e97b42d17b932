//! # View State
//!
//! Which stages and objectives a front end currently shows expanded.
//!
//! - Volatile: never serialized with the document
//! - Reset whenever the document is replaced or cleared
//! - Ordered sets, so listings are deterministic

use crate::{EntityId, Person};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    expanded_stages: BTreeSet<EntityId>,
    expanded_objectives: BTreeSet<EntityId>,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse everything.
    pub fn clear(&mut self) {
        self.expanded_stages.clear();
        self.expanded_objectives.clear();
    }

    /// Flip a stage; returns whether it is now expanded.
    pub fn toggle_stage(&mut self, id: EntityId) -> bool {
        toggle(&mut self.expanded_stages, id)
    }

    /// Flip an objective; returns whether it is now expanded.
    pub fn toggle_objective(&mut self, id: EntityId) -> bool {
        toggle(&mut self.expanded_objectives, id)
    }

    pub fn expand_stage(&mut self, id: EntityId) {
        self.expanded_stages.insert(id);
    }

    pub fn expand_objective(&mut self, id: EntityId) {
        self.expanded_objectives.insert(id);
    }

    pub fn collapse_stage(&mut self, id: EntityId) {
        self.expanded_stages.remove(&id);
    }

    pub fn collapse_objective(&mut self, id: EntityId) {
        self.expanded_objectives.remove(&id);
    }

    #[must_use]
    pub fn is_stage_expanded(&self, id: EntityId) -> bool {
        self.expanded_stages.contains(&id)
    }

    #[must_use]
    pub fn is_objective_expanded(&self, id: EntityId) -> bool {
        self.expanded_objectives.contains(&id)
    }

    /// Expand every stage and objective of `person`.
    pub fn expand_all(&mut self, person: &Person) {
        for stage in &person.stages {
            self.expanded_stages.insert(stage.id);
            self.expanded_objectives
                .extend(stage.objectives.iter().map(|o| o.id));
        }
    }

    /// Forget ids that no longer exist in `person`.
    pub fn retain_existing(&mut self, person: &Person) {
        let stages: BTreeSet<EntityId> = person.stages.iter().map(|s| s.id).collect();
        let objectives: BTreeSet<EntityId> = person
            .stages
            .iter()
            .flat_map(|s| s.objectives.iter().map(|o| o.id))
            .collect();

        self.expanded_stages.retain(|id| stages.contains(id));
        self.expanded_objectives.retain(|id| objectives.contains(id));
    }
}

fn toggle(set: &mut BTreeSet<EntityId>, id: EntityId) -> bool {
    if set.remove(&id) {
        false
    } else {
        set.insert(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Objective, Stage, Status, Timestamp};

    fn person() -> Person {
        Person {
            id: EntityId(1),
            name: "Ada".to_string(),
            company: "Engines".to_string(),
            avatar: None,
            created_at: Timestamp::new("2024-01-01T00:00:00.000Z"),
            stages: vec![Stage {
                id: EntityId(2),
                name: "Junior".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: None,
                description: None,
                status: Status::Planned,
                objectives: vec![Objective {
                    id: EntityId(3),
                    title: "Learn".to_string(),
                    start_date: "2024-01-01".to_string(),
                    end_date: None,
                    motivation: None,
                    expected_results: None,
                    status: Status::Planned,
                    tasks: Vec::new(),
                    outcomes: Vec::new(),
                }],
                feedback: Vec::new(),
            }],
        }
    }

    #[test]
    fn toggle_flips_expansion() {
        let mut view = ViewState::new();
        assert!(view.toggle_stage(EntityId(2)));
        assert!(view.is_stage_expanded(EntityId(2)));
        assert!(!view.toggle_stage(EntityId(2)));
        assert!(!view.is_stage_expanded(EntityId(2)));

        view.expand_objective(EntityId(3));
        assert!(!view.toggle_objective(EntityId(3)));
        view.expand_objective(EntityId(3));
        view.collapse_objective(EntityId(3));
        view.collapse_stage(EntityId(2));
        assert_eq!(view, ViewState::new());
    }

    #[test]
    fn retain_existing_drops_stale_ids() {
        let mut view = ViewState::new();
        view.expand_stage(EntityId(2));
        view.expand_stage(EntityId(99));
        view.expand_objective(EntityId(3));
        view.expand_objective(EntityId(98));

        view.retain_existing(&person());

        assert!(view.is_stage_expanded(EntityId(2)));
        assert!(!view.is_stage_expanded(EntityId(99)));
        assert!(view.is_objective_expanded(EntityId(3)));
        assert!(!view.is_objective_expanded(EntityId(98)));
    }

    #[test]
    fn expand_all_then_clear() {
        let mut view = ViewState::new();
        view.expand_all(&person());
        assert!(view.is_stage_expanded(EntityId(2)));
        assert!(view.is_objective_expanded(EntityId(3)));

        view.clear();
        assert_eq!(view, ViewState::new());
    }
}
