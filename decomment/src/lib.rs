// decomment/src/lib.rs
//! # decomment CLI Application
//!
//! This crate provides the command-line front end for `decomment-core`:
//! argument parsing, directory traversal, parallel processing and console
//! output. The comment removal itself lives in the core crate.
//! License: MIT OR APACHE 2.0

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

use anyhow::Result;
use std::process::ExitCode;

use crate::cli::{Cli, Commands};

/// Dispatches a parsed command line.
pub fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Strip(cmd) => commands::strip::run_strip(cmd),
        Commands::Scan(cmd) => commands::scan::run_scan(cmd),
        Commands::Filter(cmd) => commands::filter::run_filter(cmd),
    }
}
