//! # Document Store
//!
//! Holds at most one Person document plus the volatile state around it.
//!
//! - The document is an immutable snapshot (`Arc<Person>`). Every mutation
//!   clones it, applies a [`MutationEngine`] transform to the clone and swaps
//!   the result in. Readers holding an older snapshot are never affected.
//! - A declined or failed mutation leaves the current snapshot installed.
//! - Destructive actions go through [`request_removal`](DocumentStore::request_removal)
//!   followed by [`confirm`](DocumentStore::confirm) or [`cancel`](DocumentStore::cancel).
//! - [`ViewState`] is owned here but never serialized.

use crate::clock::{Clock, SystemClock};
use crate::drafts::{FeedbackDraft, ObjectiveDraft, OutcomeDraft, PersonDraft, StageDraft, TaskDraft};
use crate::export::{export_filename, export_json, import_json};
use crate::ids::{IdGenerator, SequentialIds};
use crate::mutation::{Change, EntityRef, MutationContext, MutationEngine};
use crate::view::ViewState;
use crate::{EntityId, ObjectivePath, Person, ProgressError, avatar};
use std::sync::Arc;

/// A destructive action awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Discard the whole document.
    Document,
    /// Delete one entity and its subtree.
    Entity(EntityRef),
}

/// The single-document holder.
pub struct DocumentStore {
    person: Option<Arc<Person>>,
    pending: Option<Removal>,
    view: ViewState,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Empty store with a sequential id generator and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(Box::new(SequentialIds::new()), Box::new(SystemClock))
    }

    /// Empty store with injected identifier source and clock.
    #[must_use]
    pub fn with_parts(ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        Self {
            person: None,
            pending: None,
            view: ViewState::new(),
            ids,
            clock,
        }
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// The current snapshot, if a document is loaded.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Person>> {
        self.person.clone()
    }

    #[must_use]
    pub fn person(&self) -> Option<&Person> {
        self.person.as_deref()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.person.is_some()
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    #[must_use]
    pub fn pending(&self) -> Option<Removal> {
        self.pending
    }

    // =========================================================================
    // WHOLE-DOCUMENT OPERATIONS
    // =========================================================================

    /// Start a new document. Blank name or company declines.
    pub fn create(&mut self, draft: &PersonDraft) -> Change {
        let mut ctx = MutationContext {
            ids: self.ids.as_mut(),
            clock: self.clock.as_ref(),
        };
        match MutationEngine::create_person(&mut ctx, draft) {
            Ok(person) => {
                let id = person.id;
                self.install(person);
                Change::Created(id)
            }
            Err(declined) => Change::Declined(declined),
        }
    }

    /// Parse `text` and install it wholesale.
    ///
    /// On a parse failure the previous document stays loaded.
    pub fn replace(&mut self, text: &str) -> Result<&Person, ProgressError> {
        let person = import_json(text)?;
        Ok(self.install(person))
    }

    /// Install an already-parsed document.
    pub fn replace_with(&mut self, person: Person) -> &Person {
        self.install(person)
    }

    /// Discard the document.
    pub fn clear(&mut self) -> Change {
        self.person = None;
        self.pending = None;
        self.view.clear();
        Change::Cleared
    }

    fn install(&mut self, person: Person) -> &Person {
        self.ids.advance_past(person.max_id());
        self.pending = None;
        self.view.clear();
        &**self.person.insert(Arc::new(person))
    }

    // =========================================================================
    // PERSON
    // =========================================================================

    pub fn update_person(&mut self, draft: &PersonDraft) -> Result<Change, ProgressError> {
        self.apply(|person, _| MutationEngine::update_person(person, draft))
    }

    /// Encode and attach an avatar. Over-size images are rejected untouched.
    pub fn set_avatar(&mut self, bytes: &[u8], mime: &str) -> Result<Change, ProgressError> {
        let data_url = avatar::encode_avatar(bytes, mime)?;
        self.apply(|person, _| {
            let draft = PersonDraft {
                name: person.name.clone(),
                company: person.company.clone(),
                avatar: Some(data_url),
            };
            MutationEngine::update_person(person, &draft)
        })
    }

    pub fn remove_avatar(&mut self) -> Result<Change, ProgressError> {
        self.apply(|person, _| Ok(MutationEngine::remove_avatar(person)))
    }

    // =========================================================================
    // UPSERTS
    // =========================================================================

    pub fn upsert_stage(
        &mut self,
        draft: &StageDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| MutationEngine::upsert_stage(person, ctx, draft, existing))
    }

    pub fn upsert_objective(
        &mut self,
        stage: EntityId,
        draft: &ObjectiveDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| {
            MutationEngine::upsert_objective(person, ctx, stage, draft, existing)
        })
    }

    pub fn upsert_task(
        &mut self,
        path: ObjectivePath,
        draft: &TaskDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| MutationEngine::upsert_task(person, ctx, path, draft, existing))
    }

    pub fn upsert_outcome(
        &mut self,
        path: ObjectivePath,
        draft: &OutcomeDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| {
            MutationEngine::upsert_outcome(person, ctx, path, draft, existing)
        })
    }

    pub fn upsert_feedback(
        &mut self,
        stage: EntityId,
        draft: &FeedbackDraft,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| {
            MutationEngine::upsert_feedback(person, ctx, stage, draft, existing)
        })
    }

    // =========================================================================
    // TOGGLES
    // =========================================================================

    pub fn toggle_task(&mut self, path: ObjectivePath, task: EntityId) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| MutationEngine::toggle_task(person, ctx.clock, path, task))
    }

    pub fn toggle_outcome(
        &mut self,
        path: ObjectivePath,
        outcome: EntityId,
    ) -> Result<Change, ProgressError> {
        self.apply(|person, ctx| MutationEngine::toggle_outcome(person, ctx.clock, path, outcome))
    }

    // =========================================================================
    // REMOVAL (confirm / cancel)
    // =========================================================================

    /// Record a destructive action. Nothing is deleted until [`confirm`](Self::confirm).
    ///
    /// The target must exist; a newer request replaces an older one.
    pub fn request_removal(&mut self, removal: Removal) -> Result<(), ProgressError> {
        let current = self.person.as_deref().ok_or(ProgressError::NoDocument)?;
        if let Removal::Entity(target) = removal {
            MutationEngine::remove(&mut current.clone(), target)?;
        }
        self.pending = Some(removal);
        Ok(())
    }

    /// Apply the pending removal.
    pub fn confirm(&mut self) -> Result<Change, ProgressError> {
        let removal = self.pending.take().ok_or(ProgressError::NothingPending)?;
        match removal {
            Removal::Document => Ok(self.clear()),
            Removal::Entity(target) => self.remove(target),
        }
    }

    /// Drop the pending removal without touching the document.
    pub fn cancel(&mut self) -> Result<Removal, ProgressError> {
        self.pending.take().ok_or(ProgressError::NothingPending)
    }

    /// Delete an entity immediately, for callers that have already confirmed.
    pub fn remove(&mut self, target: EntityRef) -> Result<Change, ProgressError> {
        let change = self.apply(|person, _| MutationEngine::remove(person, target))?;
        if let Some(person) = self.person.as_deref() {
            self.view.retain_existing(person);
        }
        Ok(change)
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Pretty-printed JSON of the current document.
    pub fn export(&self) -> Result<String, ProgressError> {
        export_json(self.person().ok_or(ProgressError::NoDocument)?)
    }

    /// Suggested export filename for the current document.
    pub fn export_filename(&self) -> Result<String, ProgressError> {
        Ok(export_filename(
            self.person().ok_or(ProgressError::NoDocument)?,
        ))
    }

    // =========================================================================
    // COPY-ON-WRITE
    // =========================================================================

    fn apply<F>(&mut self, transform: F) -> Result<Change, ProgressError>
    where
        F: FnOnce(&mut Person, &mut MutationContext<'_>) -> Result<Change, ProgressError>,
    {
        let mut next = Person::clone(self.person.as_deref().ok_or(ProgressError::NoDocument)?);
        let mut ctx = MutationContext {
            ids: self.ids.as_mut(),
            clock: self.clock.as_ref(),
        };
        let change = transform(&mut next, &mut ctx)?;
        if change.is_applied() {
            self.person = Some(Arc::new(next));
        }
        Ok(change)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::drafts::ValidationError;

    fn store() -> DocumentStore {
        DocumentStore::with_parts(
            Box::new(SequentialIds::new()),
            Box::new(FixedClock::at("2024-06-01T12:00:00.000Z")),
        )
    }

    fn loaded() -> DocumentStore {
        let mut store = store();
        store.create(&PersonDraft::new("Ada Lovelace", "Engines"));
        store
    }

    #[test]
    fn starts_empty() {
        let store = DocumentStore::new();
        assert!(!store.is_loaded());
        assert!(store.snapshot().is_none());
        assert_eq!(store.export(), Err(ProgressError::NoDocument));
    }

    #[test]
    fn entity_operations_need_a_document() {
        let mut store = store();
        assert_eq!(
            store.upsert_stage(&StageDraft::new("Junior"), None),
            Err(ProgressError::NoDocument)
        );
        assert_eq!(
            store.request_removal(Removal::Document),
            Err(ProgressError::NoDocument)
        );
    }

    #[test]
    fn create_with_blank_name_declines() {
        let mut store = store();
        let change = store.create(&PersonDraft::new(" ", "Engines"));
        assert_eq!(change, Change::Declined(ValidationError { field: "name" }));
        assert!(!store.is_loaded());
    }

    #[test]
    fn mutations_never_touch_old_snapshots() {
        let mut store = loaded();
        let before = store.snapshot().expect("loaded");

        store
            .upsert_stage(&StageDraft::new("Junior"), None)
            .expect("stage");

        let after = store.snapshot().expect("loaded");
        assert!(before.stages.is_empty());
        assert_eq!(after.stages.len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn declined_upsert_keeps_the_same_snapshot() {
        let mut store = loaded();
        let before = store.snapshot().expect("loaded");

        let change = store
            .upsert_stage(&StageDraft::new("   "), None)
            .expect("no error");

        assert!(!change.is_applied());
        assert!(Arc::ptr_eq(&before, &store.snapshot().expect("loaded")));
    }

    #[test]
    fn failed_upsert_keeps_the_same_snapshot() {
        let mut store = loaded();
        let before = store.snapshot().expect("loaded");

        let result = store.upsert_feedback(EntityId(404), &FeedbackDraft::new("A", "B"), None);

        assert_eq!(result, Err(ProgressError::StageNotFound(EntityId(404))));
        assert!(Arc::ptr_eq(&before, &store.snapshot().expect("loaded")));
    }

    #[test]
    fn replace_with_malformed_json_keeps_previous_document() {
        let mut store = loaded();
        let before = store.snapshot().expect("loaded");

        let result = store.replace("{ not json");

        assert!(matches!(result, Err(ProgressError::Parse(_))));
        assert_eq!(store.snapshot().expect("still loaded"), before);
    }

    #[test]
    fn replace_seeds_ids_past_the_document() {
        let mut store = loaded();
        let text = r#"{"id": 5000, "name": "Grace", "company": "Navy",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "stages": [{"id": 7000, "name": "Officer", "startDate": "2024-01-01", "status": "planned"}]}"#;
        store.replace(text).expect("valid");

        let id = store
            .upsert_stage(&StageDraft::new("Admiral"), None)
            .expect("stage")
            .id()
            .expect("created");
        assert_eq!(id, EntityId(7001));
    }

    #[test]
    fn removal_waits_for_confirmation() {
        let mut store = loaded();
        let stage = store
            .upsert_stage(&StageDraft::new("Junior"), None)
            .expect("stage")
            .id()
            .expect("created");

        store
            .request_removal(Removal::Entity(EntityRef::Stage(stage)))
            .expect("request");
        assert_eq!(
            store.pending(),
            Some(Removal::Entity(EntityRef::Stage(stage)))
        );
        assert_eq!(store.person().expect("loaded").stages.len(), 1);

        let change = store.confirm().expect("confirm");
        assert_eq!(change, Change::Removed(EntityRef::Stage(stage)));
        assert!(store.person().expect("loaded").stages.is_empty());
        assert_eq!(store.pending(), None);
    }

    #[test]
    fn cancel_drops_the_request() {
        let mut store = loaded();
        let stage = store
            .upsert_stage(&StageDraft::new("Junior"), None)
            .expect("stage")
            .id()
            .expect("created");

        store
            .request_removal(Removal::Entity(EntityRef::Stage(stage)))
            .expect("request");
        let dropped = store.cancel().expect("cancel");

        assert_eq!(dropped, Removal::Entity(EntityRef::Stage(stage)));
        assert_eq!(store.person().expect("loaded").stages.len(), 1);
        assert_eq!(store.confirm(), Err(ProgressError::NothingPending));
        assert_eq!(store.cancel(), Err(ProgressError::NothingPending));
    }

    #[test]
    fn request_for_missing_entity_is_rejected() {
        let mut store = loaded();
        let result = store.request_removal(Removal::Entity(EntityRef::Stage(EntityId(77))));
        assert_eq!(result, Err(ProgressError::StageNotFound(EntityId(77))));
        assert_eq!(store.pending(), None);
    }

    #[test]
    fn confirmed_document_removal_clears_everything() {
        let mut store = loaded();
        store.view_mut().expand_stage(EntityId(1));
        store.request_removal(Removal::Document).expect("request");

        assert_eq!(store.confirm(), Ok(Change::Cleared));
        assert!(!store.is_loaded());
        assert_eq!(store.view(), &ViewState::new());
    }

    #[test]
    fn oversized_avatar_is_rejected_without_change() {
        let mut store = loaded();
        let before = store.snapshot().expect("loaded");
        let big = vec![0u8; crate::primitives::MAX_AVATAR_BYTES + 1];

        assert!(matches!(
            store.set_avatar(&big, "image/png"),
            Err(ProgressError::SizeLimit { .. })
        ));
        assert!(Arc::ptr_eq(&before, &store.snapshot().expect("loaded")));

        store.set_avatar(b"png", "image/png").expect("small avatar");
        assert!(
            store
                .person()
                .and_then(|p| p.avatar.as_deref())
                .is_some_and(|a| a.starts_with("data:image/png;base64,"))
        );
        store.remove_avatar().expect("remove");
        assert!(store.person().expect("loaded").avatar.is_none());
    }

    #[test]
    fn export_filename_uses_person_name() {
        let store = loaded();
        assert_eq!(
            store.export_filename().expect("loaded"),
            "Ada_Lovelace_development.json"
        );
    }
}
