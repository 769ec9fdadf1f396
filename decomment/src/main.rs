// decomment/src/main.rs
//! decomment entry point.
//!
//! Parses the command line, sets up logging and hands off to the selected
//! subcommand.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use decomment::cli::Cli;
use decomment::logger;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug, cli.disable_debug));

    decomment::run(cli)
}
