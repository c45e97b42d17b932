//! # myprogress-core
//!
//! The document engine for MyProgress - THE LOGIC.
//!
//! A person's development plan is a single JSON document:
//! Stages → Objectives → Tasks/Outcomes, with Feedback on each Stage.
//! This crate owns that tree, every edit that can be made to it, and the
//! progress percentages derived from it.
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network, NO logging dependencies (pure Rust)
//! - Time and identifiers are injected (`Clock`, `IdGenerator`)
//! - Copy-on-write: the store swaps whole snapshots, never edits one in place
//! - Integer arithmetic only for percentages
//!
//! ## Example
//!
//! ```
//! use myprogress_core::{DocumentStore, PersonDraft, StageDraft, stage_progress};
//!
//! let mut store = DocumentStore::new();
//! store.create(&PersonDraft::new("Ada Lovelace", "Analytical Engines"));
//! store.upsert_stage(&StageDraft::new("Junior"), None)?;
//!
//! let person = store.person().expect("document loaded");
//! assert_eq!(stage_progress(&person.stages[0]), 0);
//! assert_eq!(store.export_filename()?, "Ada_Lovelace_development.json");
//! # Ok::<(), myprogress_core::ProgressError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod avatar;
pub mod clock;
pub mod document;
pub mod drafts;
pub mod export;
pub mod ids;
pub mod mutation;
pub mod primitives;
pub mod progress;
pub mod store;
pub mod types;
pub mod view;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use document::{Feedback, Objective, ObjectivePath, Outcome, Person, Stage, Task};
pub use types::{EntityId, ProgressError, Status, Timestamp};

// =============================================================================
// RE-EXPORTS: Editing
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use drafts::{
    FeedbackDraft, ObjectiveDraft, OutcomeDraft, PersonDraft, StageDraft, TaskDraft,
    ValidationError,
};
pub use ids::{IdGenerator, SequentialIds};
pub use mutation::{Change, EntityRef, MutationContext, MutationEngine};
pub use store::{DocumentStore, Removal};
pub use view::ViewState;

// =============================================================================
// RE-EXPORTS: Derived Data & Formats
// =============================================================================

pub use avatar::{decode_avatar, encode_avatar};
pub use export::{export_bytes, export_filename, export_json, import_bytes, import_json};
pub use progress::{
    DocumentSummary, ObjectiveReport, StageReport, objective_progress, stage_progress,
};
