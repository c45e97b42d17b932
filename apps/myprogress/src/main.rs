//! # MyProgress - Personal Development Tracker
//!
//! The binary for the MyProgress document model.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           apps/myprogress (THE BINARY)        │
//! │                                               │
//! │   ┌─────────────┐        ┌───────────────┐    │
//! │   │    CLI      │        │    Config     │    │
//! │   │   (clap)    │        │    (toml)     │    │
//! │   └──────┬──────┘        └───────┬───────┘    │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │             ┌─────────────────┐               │
//! │             │ myprogress-core │               │
//! │             │   (THE LOGIC)   │               │
//! │             └─────────────────┘               │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! myprogress new --name "Ada Lovelace" --company "Analytical Engines"
//! myprogress stage add "Junior Engineer" --status in_progress
//! myprogress objective add --stage 2 "Learn Rust"
//! myprogress task add --stage 2 --objective 3 "Read the book"
//! myprogress task toggle --stage 2 --objective 3 4
//! myprogress show
//! myprogress export --dir exports
//! ```

use clap::Parser;
use myprogress::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. MYPROGRESS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MYPROGRESS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "myprogress=debug"
    } else {
        "myprogress=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
