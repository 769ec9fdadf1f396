//! `filter` command: strip stdin to stdout.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use decomment_core::headless_strip_by_extension;

use crate::cli::FilterCommand;
use crate::commands::common::build_config;

/// Strips `input` as a file with extension `cmd.ext` would be stripped.
pub fn filter_text(cmd: &FilterCommand, input: &str) -> Result<String> {
    let config = build_config(&cmd.engine, None, Some(&cmd.whitespace))?;
    headless_strip_by_extension(&config, input, &cmd.ext)
}

pub fn run_filter(cmd: &FilterCommand) -> Result<ExitCode> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    let input = String::from_utf8(bytes).context("Input is not valid UTF-8")?;
    debug!("Read {} bytes from stdin.", input.len());

    let output = filter_text(cmd, &input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(output.as_bytes())?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
