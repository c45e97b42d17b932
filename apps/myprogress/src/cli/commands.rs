//! # CLI Command Implementations
//!
//! Every command follows the same shape: load the working document into a
//! [`DocumentStore`], apply one operation, save only if something changed.

use super::{Cli, FeedbackAction, ItemAction, ObjectiveAction, ShowArgs, StageAction};
use crate::config::Config;
use myprogress_core::{
    Change, DocumentStore, DocumentSummary, EntityId, EntityRef, FeedbackDraft, ObjectiveDraft,
    ObjectivePath, OutcomeDraft, Person, PersonDraft, ProgressError, Removal, StageDraft,
    StageReport, TaskDraft, ViewState, objective_progress, stage_progress,
    avatar::{check_avatar_size, mime_for_path},
};
use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// WORKSPACE
// =============================================================================

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub document: PathBuf,
    pub export_dir: Option<PathBuf>,
    /// Skip the `[y/N]` prompt.
    pub assume_yes: bool,
    pub json_mode: bool,
    pub max_import_bytes: u64,
}

impl Workspace {
    /// Command-line flags win over the config file.
    pub fn new(cli: &Cli, config: &Config) -> Self {
        Self {
            document: cli
                .document
                .clone()
                .unwrap_or_else(|| config.document.clone()),
            export_dir: config.export_dir.clone(),
            assume_yes: cli.yes || !config.confirm,
            json_mode: cli.json_mode,
            max_import_bytes: config.max_import_bytes,
        }
    }

    /// Load the working document, or an empty store when there is none yet.
    pub fn load(&self) -> Result<DocumentStore, ProgressError> {
        let mut store = DocumentStore::new();
        if self.document.exists() {
            let path = validate_file_path(&self.document)?;
            validate_file_size(&path, self.max_import_bytes)?;
            let text = read_text(&path)?;
            store.replace(&text)?;
            tracing::debug!("Loaded document from {:?}", path);
        }
        Ok(store)
    }

    /// Like [`load`](Self::load) but fails when no document exists.
    pub fn load_existing(&self) -> Result<DocumentStore, ProgressError> {
        let store = self.load()?;
        if !store.is_loaded() {
            return Err(ProgressError::NoDocument);
        }
        Ok(store)
    }

    pub fn save(&self, store: &DocumentStore) -> Result<(), ProgressError> {
        let text = store.export()?;
        std::fs::write(&self.document, text)
            .map_err(|e| ProgressError::Io(format!("Write document: {}", e)))?;
        tracing::info!("Saved document to {:?}", self.document);
        Ok(())
    }
}

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ProgressError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ProgressError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ProgressError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, ProgressError> {
    let canonical = path.canonicalize().map_err(|e| {
        ProgressError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ProgressError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent of an output path; the file itself may not exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, ProgressError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        ProgressError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(ProgressError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| ProgressError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn read_text(path: &Path) -> Result<String, ProgressError> {
    std::fs::read_to_string(path).map_err(|e| ProgressError::Io(format!("Read file: {}", e)))
}

/// Read an avatar image, rejecting anything over the size cap unread.
fn read_avatar(path: &Path) -> Result<(Vec<u8>, &'static str), ProgressError> {
    let validated = validate_file_path(path)?;
    let size = std::fs::metadata(&validated)
        .map_err(|e| ProgressError::Io(format!("Cannot read file metadata: {}", e)))?
        .len();
    check_avatar_size(usize::try_from(size).unwrap_or(usize::MAX))?;

    let bytes = std::fs::read(&validated)
        .map_err(|e| ProgressError::Io(format!("Read file: {}", e)))?;
    Ok((bytes, mime_for_path(&validated)))
}

// =============================================================================
// CONFIRMATION & REPORTING
// =============================================================================

/// Stage a removal, ask, then confirm or cancel it. `None` when cancelled.
fn confirm_removal(
    workspace: &Workspace,
    store: &mut DocumentStore,
    removal: Removal,
    question: &str,
) -> Result<Option<Change>, ProgressError> {
    store.request_removal(removal)?;

    if workspace.assume_yes || prompt_yes(question)? {
        store.confirm().map(Some)
    } else {
        let cancelled = store.cancel()?;
        tracing::info!("Cancelled {:?}", cancelled);
        if !workspace.json_mode {
            println!("Cancelled");
        }
        Ok(None)
    }
}

/// `[y/N]` prompt on stdin. Anything but `y`/`yes` declines.
fn prompt_yes(question: &str) -> Result<bool, ProgressError> {
    print!("{} [y/N] ", question);
    std::io::stdout()
        .flush()
        .map_err(|e| ProgressError::Io(e.to_string()))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| ProgressError::Io(e.to_string()))?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Save when `change` touched the document, then print what happened.
fn finish(
    workspace: &Workspace,
    store: &DocumentStore,
    change: &Change,
    what: &str,
) -> Result<(), ProgressError> {
    if change.is_applied() {
        workspace.save(store)?;
    }
    report(workspace, change, what);
    Ok(())
}

fn report(workspace: &Workspace, change: &Change, what: &str) {
    if workspace.json_mode {
        let output = match change {
            Change::Created(id) => serde_json::json!({ "change": "created", "kind": what, "id": id }),
            Change::Updated(id) => serde_json::json!({ "change": "updated", "kind": what, "id": id }),
            Change::Removed(_) => serde_json::json!({ "change": "removed", "kind": what }),
            Change::Toggled { id, done } => {
                serde_json::json!({ "change": "toggled", "kind": what, "id": id, "done": done })
            }
            Change::Cleared => serde_json::json!({ "change": "cleared" }),
            Change::Declined(reason) => {
                serde_json::json!({ "change": "declined", "kind": what, "reason": reason.to_string() })
            }
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return;
    }

    match change {
        Change::Created(id) => println!("Created {} {}", what, id),
        Change::Updated(id) => println!("Updated {} {}", what, id),
        Change::Removed(_) => println!("Removed {}", what),
        Change::Toggled { id, done } => {
            let state = if *done { "done" } else { "not done" };
            println!("Marked {} {} {}", what, id, state);
        }
        Change::Cleared => println!("Document closed"),
        Change::Declined(reason) => {
            tracing::warn!("Nothing saved: {}", reason);
            println!("Nothing saved: {}", reason);
        }
    }
}

fn person(store: &DocumentStore) -> Result<&Person, ProgressError> {
    store.person().ok_or(ProgressError::NoDocument)
}

// =============================================================================
// DOCUMENT COMMANDS
// =============================================================================

/// Start a new document. An existing one is only replaced with `--force`
/// and after confirmation.
pub fn cmd_new(
    workspace: &Workspace,
    name: &str,
    company: &str,
    avatar: Option<&Path>,
    force: bool,
) -> Result<(), ProgressError> {
    let mut store = workspace.load()?;

    if store.is_loaded() {
        if !force {
            return Err(ProgressError::DocumentExists(
                workspace.document.display().to_string(),
            ));
        }
        let question = "Replace the current document? Unsaved data will be lost.";
        if confirm_removal(workspace, &mut store, Removal::Document, question)?.is_none() {
            return Ok(());
        }
    }

    let avatar = avatar.map(read_avatar).transpose()?;

    let change = store.create(&PersonDraft::new(name, company));
    if change.is_applied() {
        if let Some((bytes, mime)) = avatar {
            store.set_avatar(&bytes, mime)?;
        }
    }
    finish(workspace, &store, &change, "person")
}

/// Edit the profile. Omitted fields keep their current value.
pub fn cmd_person(
    workspace: &Workspace,
    name: Option<String>,
    company: Option<String>,
    avatar: Option<&Path>,
    remove_avatar: bool,
) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;
    let current = person(&store)?;
    let draft = PersonDraft::new(
        name.unwrap_or_else(|| current.name.clone()),
        company.unwrap_or_else(|| current.company.clone()),
    );

    let mut change = store.update_person(&draft)?;
    if change.is_applied() {
        if let Some(path) = avatar {
            let (bytes, mime) = read_avatar(path)?;
            change = store.set_avatar(&bytes, mime)?;
        } else if remove_avatar {
            change = store.remove_avatar()?;
        }
    }
    finish(workspace, &store, &change, "person")
}

/// Print the stage tree with progress percentages.
///
/// Everything is expanded unless `--collapsed` is given; `--expand`,
/// `--collapse` and `--toggle` are then applied in that order.
pub fn cmd_show(workspace: &Workspace, args: &ShowArgs) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;
    let person = store.snapshot().ok_or(ProgressError::NoDocument)?;
    apply_show_args(store.view_mut(), &person, args)?;

    if workspace.json_mode {
        let reports: Vec<StageReport> =
            person.stages.iter().map(StageReport::from_stage).collect();
        let output = serde_json::json!({
            "id": person.id,
            "name": person.name,
            "company": person.company,
            "hasAvatar": person.avatar.is_some(),
            "stages": reports,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    print!("{}", render_tree(&person, store.view()));
    Ok(())
}

enum ViewTarget {
    Stage(EntityId),
    Objective { stage: EntityId, objective: EntityId },
}

fn view_target(person: &Person, id: u64) -> Result<ViewTarget, ProgressError> {
    let id = EntityId(id);
    for stage in &person.stages {
        if stage.id == id {
            return Ok(ViewTarget::Stage(id));
        }
        if stage.objective(id).is_some() {
            return Ok(ViewTarget::Objective {
                stage: stage.id,
                objective: id,
            });
        }
    }
    Err(ProgressError::StageNotFound(id))
}

/// Reset `view` from the `show` flags. Expanding an objective also expands
/// its stage. Unknown ids fail before anything is printed.
pub fn apply_show_args(
    view: &mut ViewState,
    person: &Person,
    args: &ShowArgs,
) -> Result<(), ProgressError> {
    view.clear();
    if !args.collapsed {
        view.expand_all(person);
    }

    for &id in &args.expand {
        match view_target(person, id)? {
            ViewTarget::Stage(stage) => view.expand_stage(stage),
            ViewTarget::Objective { stage, objective } => {
                view.expand_stage(stage);
                view.expand_objective(objective);
            }
        }
    }

    for &id in &args.collapse {
        match view_target(person, id)? {
            ViewTarget::Stage(stage) => view.collapse_stage(stage),
            ViewTarget::Objective { objective, .. } => view.collapse_objective(objective),
        }
    }

    for &id in &args.toggle {
        match view_target(person, id)? {
            ViewTarget::Stage(stage) => {
                view.toggle_stage(stage);
            }
            ViewTarget::Objective { stage, objective } => {
                if view.toggle_objective(objective) {
                    view.expand_stage(stage);
                }
            }
        }
    }

    Ok(())
}

fn marker(expanded: bool) -> &'static str {
    if expanded { "-" } else { "+" }
}

/// Text rendering of the stage tree. Collapsed stages and objectives show
/// their header line only, marked with `+`; expanded ones with `-`.
#[must_use]
pub fn render_tree(person: &Person, view: &ViewState) -> String {
    let title = format!("{} ({})", person.name, person.company);
    let underline = "=".repeat(title.chars().count());
    let mut lines = vec![title, underline];

    if person.stages.is_empty() {
        lines.push(String::new());
        lines.push("No stages yet. Add one with `myprogress stage add <NAME>`.".to_string());
    }

    for stage in &person.stages {
        let expanded = view.is_stage_expanded(stage.id);
        lines.push(String::new());
        lines.push(format!(
            "{} [{}] {} - {} - {}%",
            marker(expanded),
            stage.id,
            stage.name,
            stage.status,
            stage_progress(stage)
        ));
        if !expanded {
            continue;
        }

        match &stage.end_date {
            Some(end) => lines.push(format!("    {} -> {}", stage.start_date, end)),
            None => lines.push(format!("    {} ->", stage.start_date)),
        }
        if let Some(description) = &stage.description {
            lines.push(format!("    {}", description));
        }

        for objective in &stage.objectives {
            let expanded = view.is_objective_expanded(objective.id);
            lines.push(format!(
                "    {} [{}] {} - {} - {}%",
                marker(expanded),
                objective.id,
                objective.title,
                objective.status,
                objective_progress(objective)
            ));
            if !expanded {
                continue;
            }
            for task in &objective.tasks {
                let mark = if task.completed { "x" } else { " " };
                lines.push(format!("        [{}] task {}: {}", mark, task.id, task.description));
            }
            for outcome in &objective.outcomes {
                let mark = if outcome.achieved { "x" } else { " " };
                lines.push(format!(
                    "        [{}] outcome {}: {}",
                    mark, outcome.id, outcome.description
                ));
            }
        }

        for feedback in &stage.feedback {
            lines.push(format!(
                "    > {} ({}, {}): {}",
                feedback.author,
                feedback.id,
                feedback.created_at.date_part(),
                feedback.comment
            ));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Show document counts.
pub fn cmd_status(workspace: &Workspace) -> Result<(), ProgressError> {
    let store = workspace.load_existing()?;
    let person = person(&store)?;
    let summary = DocumentSummary::from_person(person);

    if workspace.json_mode {
        let output = serde_json::json!({
            "document": workspace.document.to_string_lossy(),
            "name": person.name,
            "company": person.company,
            "summary": summary,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("MyProgress Status");
    println!("=================");
    println!("Document: {:?}", workspace.document);
    println!("Person:   {} ({})", person.name, person.company);
    println!();
    println!("Stages:     {}", summary.stage_count);
    for (status, count) in &summary.stages_by_status {
        println!("  {:<12}{}", status.label(), count);
    }
    println!("Objectives: {}", summary.objective_count);
    println!(
        "Tasks:      {} / {} completed",
        summary.tasks_completed, summary.tasks_total
    );
    println!(
        "Outcomes:   {} / {} achieved",
        summary.outcomes_achieved, summary.outcomes_total
    );
    println!("Feedback:   {}", summary.feedback_count);

    Ok(())
}

// =============================================================================
// ENTITY COMMANDS
// =============================================================================

pub fn cmd_stage(workspace: &Workspace, action: StageAction) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;

    let change = match action {
        StageAction::Add {
            name,
            start,
            end,
            description,
            status,
        } => {
            let draft = StageDraft {
                name,
                start_date: start,
                end_date: end,
                description,
                status,
            };
            store.upsert_stage(&draft, None)?
        }
        StageAction::Edit {
            id,
            name,
            start,
            end,
            description,
            status,
        } => {
            let id = EntityId(id);
            let current = person(&store)?
                .stage(id)
                .ok_or(ProgressError::StageNotFound(id))?;
            let draft = StageDraft {
                name: name.unwrap_or_else(|| current.name.clone()),
                start_date: start,
                end_date: end,
                description,
                status,
            };
            store.upsert_stage(&draft, Some(id))?
        }
        StageAction::Rm { id } => {
            let target = EntityRef::Stage(EntityId(id));
            let question = "Delete this stage with all its objectives and feedback?";
            match confirm_removal(workspace, &mut store, Removal::Entity(target), question)? {
                Some(change) => change,
                None => return Ok(()),
            }
        }
    };

    finish(workspace, &store, &change, "stage")
}

pub fn cmd_objective(workspace: &Workspace, action: ObjectiveAction) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;

    let change = match action {
        ObjectiveAction::Add {
            stage,
            title,
            start,
            end,
            motivation,
            expected_results,
            status,
        } => {
            let draft = ObjectiveDraft {
                title,
                start_date: start,
                end_date: end,
                motivation,
                expected_results,
                status,
            };
            store.upsert_objective(EntityId(stage), &draft, None)?
        }
        ObjectiveAction::Edit {
            stage,
            id,
            title,
            start,
            end,
            motivation,
            expected_results,
            status,
        } => {
            let path = ObjectivePath::new(EntityId(stage), EntityId(id));
            let current = person(&store)?
                .stage(path.stage)
                .ok_or(ProgressError::StageNotFound(path.stage))?
                .objective(path.objective)
                .ok_or(ProgressError::ObjectiveNotFound(path.objective))?;
            let draft = ObjectiveDraft {
                title: title.unwrap_or_else(|| current.title.clone()),
                start_date: start,
                end_date: end,
                motivation,
                expected_results,
                status,
            };
            store.upsert_objective(path.stage, &draft, Some(path.objective))?
        }
        ObjectiveAction::Rm { stage, id } => {
            let target = EntityRef::Objective(ObjectivePath::new(EntityId(stage), EntityId(id)));
            let question = "Delete this objective with all its tasks and outcomes?";
            match confirm_removal(workspace, &mut store, Removal::Entity(target), question)? {
                Some(change) => change,
                None => return Ok(()),
            }
        }
    };

    finish(workspace, &store, &change, "objective")
}

/// Which child list of an objective an [`ItemAction`] addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Task,
    Outcome,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::Outcome => "outcome",
        }
    }

    fn entity(&self, path: ObjectivePath, id: EntityId) -> EntityRef {
        match self {
            ItemKind::Task => EntityRef::Task(path, id),
            ItemKind::Outcome => EntityRef::Outcome(path, id),
        }
    }

    /// Current description of an existing item.
    fn description(
        &self,
        person: &Person,
        path: ObjectivePath,
        id: EntityId,
    ) -> Result<String, ProgressError> {
        let objective = person
            .stage(path.stage)
            .ok_or(ProgressError::StageNotFound(path.stage))?
            .objective(path.objective)
            .ok_or(ProgressError::ObjectiveNotFound(path.objective))?;

        match self {
            ItemKind::Task => objective
                .tasks
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.description.clone())
                .ok_or(ProgressError::TaskNotFound(id)),
            ItemKind::Outcome => objective
                .outcomes
                .iter()
                .find(|o| o.id == id)
                .map(|o| o.description.clone())
                .ok_or(ProgressError::OutcomeNotFound(id)),
        }
    }

    fn upsert(
        &self,
        store: &mut DocumentStore,
        path: ObjectivePath,
        description: String,
        done: Option<bool>,
        existing: Option<EntityId>,
    ) -> Result<Change, ProgressError> {
        match self {
            ItemKind::Task => {
                let draft = TaskDraft {
                    description,
                    completed: done,
                };
                store.upsert_task(path, &draft, existing)
            }
            ItemKind::Outcome => {
                let draft = OutcomeDraft {
                    description,
                    achieved: done,
                };
                store.upsert_outcome(path, &draft, existing)
            }
        }
    }
}

pub fn cmd_item(
    workspace: &Workspace,
    kind: ItemKind,
    action: ItemAction,
) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;

    let change = match action {
        ItemAction::Add {
            stage,
            objective,
            description,
            done,
        } => {
            let path = ObjectivePath::new(EntityId(stage), EntityId(objective));
            kind.upsert(&mut store, path, description, done.then_some(true), None)?
        }
        ItemAction::Edit {
            stage,
            objective,
            id,
            description,
            done,
        } => {
            let path = ObjectivePath::new(EntityId(stage), EntityId(objective));
            let id = EntityId(id);
            let description = match description {
                Some(description) => description,
                None => kind.description(person(&store)?, path, id)?,
            };
            kind.upsert(&mut store, path, description, done, Some(id))?
        }
        ItemAction::Toggle {
            stage,
            objective,
            id,
        } => {
            let path = ObjectivePath::new(EntityId(stage), EntityId(objective));
            match kind {
                ItemKind::Task => store.toggle_task(path, EntityId(id))?,
                ItemKind::Outcome => store.toggle_outcome(path, EntityId(id))?,
            }
        }
        ItemAction::Rm {
            stage,
            objective,
            id,
        } => {
            let path = ObjectivePath::new(EntityId(stage), EntityId(objective));
            let target = kind.entity(path, EntityId(id));
            let question = format!("Delete this {}?", kind.label());
            match confirm_removal(workspace, &mut store, Removal::Entity(target), &question)? {
                Some(change) => change,
                None => return Ok(()),
            }
        }
    };

    finish(workspace, &store, &change, kind.label())
}

pub fn cmd_feedback(workspace: &Workspace, action: FeedbackAction) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;

    let change = match action {
        FeedbackAction::Add {
            stage,
            author,
            comment,
        } => store.upsert_feedback(EntityId(stage), &FeedbackDraft::new(author, comment), None)?,
        FeedbackAction::Edit {
            stage,
            id,
            author,
            comment,
        } => {
            let stage = EntityId(stage);
            let id = EntityId(id);
            let current = person(&store)?
                .stage(stage)
                .ok_or(ProgressError::StageNotFound(stage))?
                .feedback
                .iter()
                .find(|f| f.id == id)
                .ok_or(ProgressError::FeedbackNotFound(id))?;
            let draft = FeedbackDraft::new(
                author.unwrap_or_else(|| current.author.clone()),
                comment.unwrap_or_else(|| current.comment.clone()),
            );
            store.upsert_feedback(stage, &draft, Some(id))?
        }
        FeedbackAction::Rm { stage, id } => {
            let target = EntityRef::Feedback {
                stage: EntityId(stage),
                feedback: EntityId(id),
            };
            let question = "Delete this feedback?";
            match confirm_removal(workspace, &mut store, Removal::Entity(target), question)? {
                Some(change) => change,
                None => return Ok(()),
            }
        }
    };

    finish(workspace, &store, &change, "feedback")
}

// =============================================================================
// IMPORT / EXPORT / CLOSE
// =============================================================================

/// Replace the working document with `file`.
///
/// The file is fully parsed before anything is written, so a malformed
/// import leaves the current working document untouched.
pub fn cmd_import(workspace: &Workspace, file: &Path) -> Result<(), ProgressError> {
    let validated = validate_file_path(file)?;
    validate_file_size(&validated, workspace.max_import_bytes)?;
    let text = read_text(&validated)?;

    tracing::info!("Importing from {:?}", validated);

    let mut store = DocumentStore::new();
    let person = store.replace(&text)?;
    let (name, stages) = (person.name.clone(), person.stages.len());
    workspace.save(&store)?;

    if workspace.json_mode {
        let output = serde_json::json!({ "imported": name, "stages": stages });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Imported {} ({} stages)", name, stages);
    }
    Ok(())
}

/// Write the document to `output`, or to `<name>_development.json` inside
/// `dir` (falling back to the configured export directory, then `.`).
pub fn cmd_export(
    workspace: &Workspace,
    output: Option<&Path>,
    dir: Option<&Path>,
) -> Result<(), ProgressError> {
    let store = workspace.load_existing()?;

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = dir
                .map(Path::to_path_buf)
                .or_else(|| workspace.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = store.export_filename()?;
            if Path::new(&file_name).file_name() != Some(OsStr::new(&file_name)) {
                return Err(ProgressError::Io(format!(
                    "Export filename '{}' is not a plain file name",
                    file_name
                )));
            }
            dir.join(file_name)
        }
    };
    let validated = validate_output_path(&target)?;

    let data = store.export()?;
    std::fs::write(&validated, &data)
        .map_err(|e| ProgressError::Io(format!("Write file: {}", e)))?;

    tracing::info!("Exported {} bytes to {:?}", data.len(), validated);
    if workspace.json_mode {
        let output = serde_json::json!({
            "path": validated.to_string_lossy(),
            "bytes": data.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Exported {} bytes to {:?}", data.len(), validated);
    }
    Ok(())
}

/// Discard the working document after confirmation.
pub fn cmd_close(workspace: &Workspace) -> Result<(), ProgressError> {
    let mut store = workspace.load_existing()?;
    let question = "Close the current document? Unsaved data will be lost.";

    let Some(change) = confirm_removal(workspace, &mut store, Removal::Document, question)? else {
        return Ok(());
    };

    std::fs::remove_file(&workspace.document)
        .map_err(|e| ProgressError::Io(format!("Remove document: {}", e)))?;
    tracing::info!("Removed document {:?}", workspace.document);
    report(workspace, &change, "document");
    Ok(())
}
