//! # MyProgress
//!
//! Command-line front end for `myprogress-core`: one working JSON document
//! on disk, loaded and saved around each command.

pub mod cli;
pub mod config;
