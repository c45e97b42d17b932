//! End-to-end tests for the CLI against a working document in a temp dir.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use myprogress::cli::{Cli, ShowArgs, apply_show_args, execute, render_tree};
use myprogress_core::{
    EntityId, Person, ProgressError, Status, ViewState, import_json, objective_progress,
    stage_progress,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn run(doc: &Path, args: &[&str]) -> Result<(), ProgressError> {
    let mut argv = vec![
        "myprogress".to_string(),
        "--document".to_string(),
        doc.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    execute(Cli::parse_from(argv))
}

fn read(doc: &Path) -> Person {
    import_json(&std::fs::read_to_string(doc).unwrap()).unwrap()
}

/// Temp dir with a fresh document for Ada: person 1, nothing else.
fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("progress.json");
    run(
        &doc,
        &["new", "--name", "Ada Lovelace", "--company", "Analytical Engines"],
    )
    .unwrap();
    (dir, doc)
}

/// Adds stage 2, objective 3 and tasks 4 and 5.
fn populate(doc: &Path) {
    run(doc, &["stage", "add", "Junior", "--status", "in-progress"]).unwrap();
    run(doc, &["objective", "add", "--stage", "2", "Learn Rust"]).unwrap();
    run(doc, &["task", "add", "--stage", "2", "--objective", "3", "Read the book"]).unwrap();
    run(doc, &["task", "add", "--stage", "2", "--objective", "3", "Write a CLI"]).unwrap();
}

// =============================================================================
// DOCUMENT LIFECYCLE
// =============================================================================

#[test]
fn test_new_creates_document() {
    let (_dir, doc) = setup();
    let person = read(&doc);

    assert_eq!(person.id, EntityId(1));
    assert_eq!(person.name, "Ada Lovelace");
    assert_eq!(person.company, "Analytical Engines");
    assert!(person.stages.is_empty());
    assert!(person.avatar.is_none());
}

#[test]
fn test_new_refuses_existing_document_without_force() {
    let (_dir, doc) = setup();
    let result = run(&doc, &["new", "--name", "Grace", "--company", "Navy"]);

    assert_eq!(
        result,
        Err(ProgressError::DocumentExists(doc.display().to_string()))
    );
    assert_eq!(read(&doc).name, "Ada Lovelace");
}

#[test]
fn test_new_force_replaces_document() {
    let (_dir, doc) = setup();
    populate(&doc);

    run(
        &doc,
        &["--yes", "new", "--name", "Grace", "--company", "Navy", "--force"],
    )
    .unwrap();

    let person = read(&doc);
    assert_eq!(person.name, "Grace");
    assert!(person.stages.is_empty());
}

#[test]
fn test_new_with_avatar() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("progress.json");
    let image = dir.path().join("me.png");
    std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

    run(
        &doc,
        &["new", "--name", "Ada", "--company", "Engines", "--avatar", image.to_str().unwrap()],
    )
    .unwrap();

    let avatar = read(&doc).avatar.unwrap();
    assert!(avatar.starts_with("data:image/png;base64,"));

    run(&doc, &["person", "--remove-avatar"]).unwrap();
    assert!(read(&doc).avatar.is_none());
}

#[test]
fn test_person_edit_keeps_omitted_fields() {
    let (_dir, doc) = setup();
    run(&doc, &["person", "--company", "Royal Society"]).unwrap();

    let person = read(&doc);
    assert_eq!(person.name, "Ada Lovelace");
    assert_eq!(person.company, "Royal Society");
}

#[test]
fn test_commands_without_document_fail() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("missing.json");

    let result = run(&doc, &["stage", "add", "Junior"]);
    assert_eq!(result, Err(ProgressError::NoDocument));
    assert!(!doc.exists());
}

#[test]
fn test_close_deletes_document() {
    let (_dir, doc) = setup();
    run(&doc, &["close", "--yes"]).unwrap();
    assert!(!doc.exists());
}

// =============================================================================
// ENTITY EDITING
// =============================================================================

#[test]
fn test_build_and_toggle() {
    let (_dir, doc) = setup();
    populate(&doc);

    run(&doc, &["task", "toggle", "--stage", "2", "--objective", "3", "4"]).unwrap();
    run(&doc, &["outcome", "add", "--stage", "2", "--objective", "3", "Ship it", "--done"]).unwrap();

    let person = read(&doc);
    let stage = &person.stages[0];
    assert_eq!(stage.status, Status::InProgress);

    let objective = &stage.objectives[0];
    assert!(objective.tasks[0].completed);
    assert!(objective.tasks[0].completed_at.is_some());
    assert!(!objective.tasks[1].completed);
    assert!(objective.outcomes[0].achieved);
    assert!(objective.outcomes[0].achieved_at.is_some());

    // 2 of 3 items done
    assert_eq!(objective_progress(objective), 67);
    assert_eq!(stage_progress(stage), 67);

    run(&doc, &["show"]).unwrap();
    run(&doc, &["--json-mode", "status"]).unwrap();
}

#[test]
fn test_blank_name_saves_nothing() {
    let (_dir, doc) = setup();
    let before = std::fs::read(&doc).unwrap();

    run(&doc, &["stage", "add", "   "]).unwrap();

    assert_eq!(std::fs::read(&doc).unwrap(), before);
}

#[test]
fn test_stage_edit_merges_fields() {
    let (_dir, doc) = setup();
    populate(&doc);

    run(
        &doc,
        &["stage", "edit", "2", "--description", "First year", "--status", "completed"],
    )
    .unwrap();

    let stage = &read(&doc).stages[0];
    assert_eq!(stage.name, "Junior");
    assert_eq!(stage.description.as_deref(), Some("First year"));
    assert_eq!(stage.status, Status::Completed);
    assert_eq!(stage.objectives.len(), 1);
}

#[test]
fn test_unknown_ids_are_errors() {
    let (_dir, doc) = setup();
    populate(&doc);

    assert_eq!(
        run(&doc, &["stage", "edit", "99", "--name", "Ghost"]),
        Err(ProgressError::StageNotFound(EntityId(99)))
    );
    assert_eq!(
        run(&doc, &["task", "toggle", "--stage", "2", "--objective", "3", "99"]),
        Err(ProgressError::TaskNotFound(EntityId(99)))
    );
    assert_eq!(
        run(&doc, &["--yes", "objective", "rm", "--stage", "2", "99"]),
        Err(ProgressError::ObjectiveNotFound(EntityId(99)))
    );
}

#[test]
fn test_stage_rm_cascades() {
    let (_dir, doc) = setup();
    populate(&doc);
    run(&doc, &["feedback", "add", "--stage", "2", "--author", "Grace", "Solid start"]).unwrap();

    run(&doc, &["--yes", "stage", "rm", "2"]).unwrap();

    let person = read(&doc);
    assert!(person.stages.is_empty());
    assert_eq!(person.max_id(), EntityId(1));
}

#[test]
fn test_feedback_is_prepended_and_editable() {
    let (_dir, doc) = setup();
    populate(&doc);
    run(&doc, &["feedback", "add", "--stage", "2", "--author", "Grace", "Solid start"]).unwrap();
    run(&doc, &["feedback", "add", "--stage", "2", "--author", "Alan", "Keep going"]).unwrap();

    let feedback = &read(&doc).stages[0].feedback;
    assert_eq!(feedback[0].author, "Alan");
    let grace = feedback[1].id;

    run(
        &doc,
        &["feedback", "edit", "--stage", "2", &grace.to_string(), "--comment", "Great year"],
    )
    .unwrap();

    let feedback = &read(&doc).stages[0].feedback;
    assert_eq!(feedback[1].author, "Grace");
    assert_eq!(feedback[1].comment, "Great year");
}

#[test]
fn test_ids_stay_unique_across_runs() {
    let (_dir, doc) = setup();
    populate(&doc);
    run(&doc, &["stage", "add", "Senior"]).unwrap();

    let person = read(&doc);
    assert_eq!(person.stages[1].id, EntityId(6));
}

// =============================================================================
// SHOW
// =============================================================================

fn tree(doc: &Path, args: &ShowArgs) -> Result<String, ProgressError> {
    let person = read(doc);
    let mut view = ViewState::new();
    apply_show_args(&mut view, &person, args)?;
    Ok(render_tree(&person, &view))
}

#[test]
fn test_show_expands_everything_by_default() {
    let (_dir, doc) = setup();
    populate(&doc);

    let text = tree(&doc, &ShowArgs::default()).unwrap();

    assert!(text.starts_with("Ada Lovelace (Analytical Engines)\n"));
    assert!(text.contains("- [2] Junior - In Progress - 0%"));
    assert!(text.contains("    - [3] Learn Rust - Planned - 0%"));
    assert!(text.contains("        [ ] task 4: Read the book"));
    run(&doc, &["show"]).unwrap();
}

#[test]
fn test_show_collapsed_prints_stage_headers_only() {
    let (_dir, doc) = setup();
    populate(&doc);
    let args = ShowArgs {
        collapsed: true,
        ..ShowArgs::default()
    };

    let text = tree(&doc, &args).unwrap();

    assert!(text.contains("+ [2] Junior - In Progress - 0%"));
    assert!(!text.contains("Learn Rust"));
    assert!(!text.contains("task 4"));
    run(&doc, &["show", "--collapsed"]).unwrap();
}

#[test]
fn test_show_expanding_an_objective_opens_its_stage() {
    let (_dir, doc) = setup();
    populate(&doc);
    let args = ShowArgs {
        collapsed: true,
        expand: vec![3],
        ..ShowArgs::default()
    };

    let text = tree(&doc, &args).unwrap();

    assert!(text.contains("- [2] Junior"));
    assert!(text.contains("    - [3] Learn Rust"));
    assert!(text.contains("task 5: Write a CLI"));
    run(&doc, &["show", "--collapsed", "--expand", "3"]).unwrap();
}

#[test]
fn test_show_collapse_and_toggle() {
    let (_dir, doc) = setup();
    populate(&doc);

    let collapsed_objective = tree(
        &doc,
        &ShowArgs {
            collapse: vec![3],
            ..ShowArgs::default()
        },
    )
    .unwrap();
    assert!(collapsed_objective.contains("    + [3] Learn Rust"));
    assert!(!collapsed_objective.contains("task 4"));

    let toggled_stage = tree(
        &doc,
        &ShowArgs {
            toggle: vec![2],
            ..ShowArgs::default()
        },
    )
    .unwrap();
    assert!(toggled_stage.contains("+ [2] Junior"));
    assert!(!toggled_stage.contains("Learn Rust"));
}

#[test]
fn test_show_rejects_unknown_ids() {
    let (_dir, doc) = setup();
    populate(&doc);

    assert_eq!(
        run(&doc, &["show", "--expand", "99"]),
        Err(ProgressError::StageNotFound(EntityId(99)))
    );
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_config_can_disable_confirmation() {
    let (dir, doc) = setup();
    populate(&doc);
    let config = dir.path().join("myprogress.toml");
    std::fs::write(&config, "confirm = false\n").unwrap();

    run(
        &doc,
        &["--config", config.to_str().unwrap(), "task", "rm", "--stage", "2", "--objective", "3", "5"],
    )
    .unwrap();

    let tasks = &read(&doc).stages[0].objectives[0].tasks;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, EntityId(4));
}

#[test]
fn test_config_names_document() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("career.json");
    let config = dir.path().join("myprogress.toml");
    std::fs::write(&config, format!("document = {:?}\n", doc.display().to_string())).unwrap();

    let argv = [
        "myprogress",
        "--config",
        config.to_str().unwrap(),
        "new",
        "--name",
        "Ada",
        "--company",
        "Engines",
    ];
    execute(Cli::parse_from(argv)).unwrap();

    assert_eq!(read(&doc).name, "Ada");
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

#[test]
fn test_export_to_dir_uses_person_name() {
    let (dir, doc) = setup();
    populate(&doc);
    let out = dir.path().join("exports");
    std::fs::create_dir(&out).unwrap();

    run(&doc, &["export", "--dir", out.to_str().unwrap()]).unwrap();

    let exported = out.join("Ada_Lovelace_development.json");
    assert_eq!(read(&exported), read(&doc));
}

#[test]
fn test_export_name_cannot_escape_dir() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("progress.json");
    run(&doc, &["new", "--name", "../escaped", "--company", "Engines"]).unwrap();
    let out = dir.path().join("exports");
    std::fs::create_dir(&out).unwrap();

    run(&doc, &["export", "--dir", out.to_str().unwrap()]).unwrap();

    let exported = out.join("_escaped_development.json");
    assert_eq!(read(&exported).name, "../escaped");
    assert!(!dir.path().join("escaped_development.json").exists());

    let mut root: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    root.sort();
    assert_eq!(root, ["exports", "progress.json"]);
}

#[test]
fn test_import_replaces_document() {
    let (dir, doc) = setup();
    populate(&doc);
    let exported = dir.path().join("backup.json");
    run(&doc, &["export", "--output", exported.to_str().unwrap()]).unwrap();

    let other = dir.path().join("other.json");
    run(&other, &["import", exported.to_str().unwrap()]).unwrap();

    assert_eq!(read(&other), read(&doc));
}

#[test]
fn test_malformed_import_keeps_document() {
    let (dir, doc) = setup();
    populate(&doc);
    let before = std::fs::read(&doc).unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{\"id\": 1, \"name\": ").unwrap();

    let result = run(&doc, &["import", broken.to_str().unwrap()]);

    assert!(matches!(result, Err(ProgressError::Parse(_))));
    assert_eq!(std::fs::read(&doc).unwrap(), before);
}

#[test]
fn test_import_respects_size_limit() {
    let (dir, doc) = setup();
    let config = dir.path().join("myprogress.toml");
    std::fs::write(&config, "max_import_bytes = 10\n").unwrap();
    let big = dir.path().join("big.json");
    std::fs::write(&big, "x".repeat(100)).unwrap();

    let result = run(
        &doc,
        &["--config", config.to_str().unwrap(), "import", big.to_str().unwrap()],
    );

    assert!(matches!(result, Err(ProgressError::Io(_))));
}
