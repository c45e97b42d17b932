//! # MyProgress CLI Module
//!
//! This module implements the CLI interface for MyProgress.
//!
//! ## Available Commands
//!
//! - `new` - Start a new working document
//! - `person` - Edit name, company or avatar
//! - `show` - Print the stage tree with progress, optionally collapsed
//! - `status` - Show document counts
//! - `stage`, `objective`, `task`, `outcome`, `feedback` - Entity editing
//! - `import` - Replace the working document with a JSON file
//! - `export` - Write the working document to a named JSON file
//! - `close` - Discard the working document

mod commands;

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use myprogress_core::{ProgressError, Status};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// MyProgress - personal development tracker
///
/// Stages contain objectives; objectives are measured by tasks and outcomes.
#[derive(Parser, Debug)]
#[command(name = "myprogress")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the working document (default: config, else progress.json)
    #[arg(short, long, global = true)]
    pub document: Option<PathBuf>,

    /// Path to a TOML config file (default: ./myprogress.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Confirm destructive actions without prompting
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new document
    New {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        company: String,

        /// Image file to use as avatar (max 5 MB)
        #[arg(short, long)]
        avatar: Option<PathBuf>,

        /// Replace an existing document
        #[arg(short, long)]
        force: bool,
    },

    /// Edit the person's profile
    Person {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        company: Option<String>,

        /// Image file to use as avatar (max 5 MB)
        #[arg(short, long, conflicts_with = "remove_avatar")]
        avatar: Option<PathBuf>,

        /// Drop the current avatar
        #[arg(long)]
        remove_avatar: bool,
    },

    /// Print the stage tree with progress
    Show(ShowArgs),

    /// Show document counts
    Status,

    /// Manage stages
    Stage {
        #[command(subcommand)]
        action: StageAction,
    },

    /// Manage objectives within a stage
    Objective {
        #[command(subcommand)]
        action: ObjectiveAction,
    },

    /// Manage tasks within an objective
    Task {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Manage expected outcomes within an objective
    Outcome {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Manage feedback on a stage
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },

    /// Replace the working document with a JSON export
    Import {
        /// Input file path
        file: PathBuf,
    },

    /// Write the working document to a JSON file
    Export {
        /// Output file path
        #[arg(short, long, conflicts_with = "dir")]
        output: Option<PathBuf>,

        /// Directory for the generated `<name>_development.json` file
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Discard the working document
    Close,
}

/// Which stages and objectives `show` prints expanded. Ids may name a
/// stage or an objective.
#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Start with every stage and objective collapsed
    #[arg(long)]
    pub collapsed: bool,

    /// Expand a stage or objective (repeatable)
    #[arg(long, value_name = "ID")]
    pub expand: Vec<u64>,

    /// Collapse a stage or objective (repeatable)
    #[arg(long, value_name = "ID")]
    pub collapse: Vec<u64>,

    /// Flip a stage or objective (repeatable, applied last)
    #[arg(long, value_name = "ID")]
    pub toggle: Vec<u64>,
}

#[derive(Subcommand, Debug)]
pub enum StageAction {
    /// Add a stage
    Add {
        name: String,

        /// Start date (YYYY-MM-DD, default today)
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// planned, in_progress, completed or discarded
        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Edit a stage; omitted fields are kept, empty strings clear them
    Edit {
        id: u64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Remove a stage with all its objectives and feedback
    Rm { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum ObjectiveAction {
    /// Add an objective
    Add {
        /// Owning stage id
        #[arg(long)]
        stage: u64,

        title: String,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        motivation: Option<String>,

        #[arg(long)]
        expected_results: Option<String>,

        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Edit an objective; omitted fields are kept, empty strings clear them
    Edit {
        #[arg(long)]
        stage: u64,

        id: u64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        motivation: Option<String>,

        #[arg(long)]
        expected_results: Option<String>,

        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Remove an objective with its tasks and outcomes
    Rm {
        #[arg(long)]
        stage: u64,

        id: u64,
    },
}

/// Shared by tasks and outcomes. `done` is "completed" for a task and
/// "achieved" for an outcome.
#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// Add an item
    Add {
        #[arg(long)]
        stage: u64,

        #[arg(long)]
        objective: u64,

        description: String,

        /// Mark as done immediately
        #[arg(long)]
        done: bool,
    },

    /// Edit an item
    Edit {
        #[arg(long)]
        stage: u64,

        #[arg(long)]
        objective: u64,

        id: u64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        done: Option<bool>,
    },

    /// Flip an item between done and not done
    Toggle {
        #[arg(long)]
        stage: u64,

        #[arg(long)]
        objective: u64,

        id: u64,
    },

    /// Remove an item
    Rm {
        #[arg(long)]
        stage: u64,

        #[arg(long)]
        objective: u64,

        id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum FeedbackAction {
    /// Add feedback to a stage
    Add {
        #[arg(long)]
        stage: u64,

        #[arg(short, long)]
        author: String,

        comment: String,
    },

    /// Edit a feedback entry
    Edit {
        #[arg(long)]
        stage: u64,

        id: u64,

        #[arg(short, long)]
        author: Option<String>,

        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Remove a feedback entry
    Rm {
        #[arg(long)]
        stage: u64,

        id: u64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ProgressError> {
    let config = Config::discover(cli.config.as_deref())?;
    let workspace = Workspace::new(&cli, &config);

    match cli.command {
        Some(Commands::New {
            name,
            company,
            avatar,
            force,
        }) => cmd_new(&workspace, &name, &company, avatar.as_deref(), force),
        Some(Commands::Person {
            name,
            company,
            avatar,
            remove_avatar,
        }) => cmd_person(&workspace, name, company, avatar.as_deref(), remove_avatar),
        Some(Commands::Show(args)) => cmd_show(&workspace, &args),
        None => cmd_show(&workspace, &ShowArgs::default()),
        Some(Commands::Status) => cmd_status(&workspace),
        Some(Commands::Stage { action }) => cmd_stage(&workspace, action),
        Some(Commands::Objective { action }) => cmd_objective(&workspace, action),
        Some(Commands::Task { action }) => cmd_item(&workspace, ItemKind::Task, action),
        Some(Commands::Outcome { action }) => cmd_item(&workspace, ItemKind::Outcome, action),
        Some(Commands::Feedback { action }) => cmd_feedback(&workspace, action),
        Some(Commands::Import { file }) => cmd_import(&workspace, &file),
        Some(Commands::Export { output, dir }) => {
            cmd_export(&workspace, output.as_deref(), dir.as_deref())
        }
        Some(Commands::Close) => cmd_close(&workspace),
    }
}
