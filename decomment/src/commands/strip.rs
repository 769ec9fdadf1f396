//! `strip` command: remove comments from files in place.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use decomment_core::{CommentEngine, ExcludeSet, ScanStats, WhitespacePolicy};

use crate::cli::StripCommand;
use crate::commands::common::{build_config, build_engine, build_pool, error_msg, info_msg, warn_msg};
use crate::ui::diff_viewer;
use crate::ui::theme::ThemeEntry;
use crate::utils::walker::{collect_files, SourceFile};

/// What happened to one file.
#[derive(Debug)]
pub enum FileStatus {
    Unchanged,
    /// Rewritten, or would be under `--dry-run`. Both texts are kept only
    /// when a diff was requested.
    Changed {
        original: Option<String>,
        stripped: Option<String>,
    },
    SkippedNonUtf8,
    Failed(String),
}

#[derive(Debug)]
pub struct FileReport {
    pub file: SourceFile,
    pub status: FileStatus,
    pub stats: ScanStats,
}

/// Options for one strip run, independent of the CLI structs.
#[derive(Debug, Clone, Copy)]
pub struct StripOptions {
    pub dry_run: bool,
    pub keep_texts: bool,
    pub policy: WhitespacePolicy,
}

/// Strips one file and writes it back unless `dry_run` is set.
pub fn process_file(engine: &dyn CommentEngine, file: SourceFile, opts: StripOptions) -> FileReport {
    let mut stats = ScanStats::default();
    let status = match strip_file(engine, &file, opts, &mut stats) {
        Ok(status) => status,
        Err(e) => FileStatus::Failed(format!("{:#}", e)),
    };
    FileReport { file, status, stats }
}

fn strip_file(
    engine: &dyn CommentEngine,
    file: &SourceFile,
    opts: StripOptions,
    stats: &mut ScanStats,
) -> Result<FileStatus> {
    let Some(original) = file.read()? else {
        return Ok(FileStatus::SkippedNonUtf8);
    };

    let outcome = engine
        .strip(&original, file.family)
        .with_context(|| format!("Failed to strip {}", file.path.display()))?;
    if outcome.used_fallback {
        debug!("{} was stripped by a fallback scanner.", file.rel);
    }
    *stats = outcome.stats;

    let stripped = opts.policy.apply(&outcome.text);
    if stripped == original {
        return Ok(FileStatus::Unchanged);
    }

    if !opts.dry_run {
        fs::write(&file.path, &stripped)
            .with_context(|| format!("Failed to write {}", file.path.display()))?;
    }

    Ok(if opts.keep_texts {
        FileStatus::Changed {
            original: Some(original),
            stripped: Some(stripped),
        }
    } else {
        FileStatus::Changed {
            original: None,
            stripped: None,
        }
    })
}

pub fn run_strip(cmd: &StripCommand) -> Result<ExitCode> {
    info!("Starting strip of {}.", cmd.target.display());

    let config = build_config(&cmd.engine, Some(&cmd.exclude), Some(&cmd.whitespace))?;
    let excludes = ExcludeSet::from_config(&config)?;
    let engine = build_engine(&config)?;
    let files = collect_files(&cmd.target, &excludes)?;
    if files.is_empty() {
        info_msg(format!("No supported files found under {}.", cmd.target.display()));
    }

    let opts = StripOptions {
        dry_run: cmd.dry_run,
        keep_texts: cmd.diff,
        policy: WhitespacePolicy::from_config(&config),
    };

    let pool = build_pool(cmd.exclude.jobs)?;
    let reports: Vec<FileReport> = pool.install(|| {
        files
            .into_par_iter()
            .map(|file| process_file(&engine, file, opts))
            .collect()
    });

    let stdout = io::stdout();
    let colors = stdout.is_terminal();
    let mut out = stdout.lock();
    let mut changed = 0usize;
    let mut failed = 0usize;
    let mut totals = ScanStats::default();

    for report in &reports {
        totals.merge(report.stats);
        match &report.status {
            FileStatus::Unchanged => {}
            FileStatus::Changed { original, stripped } => {
                changed += 1;
                let line = if cmd.dry_run {
                    format!("[DRY] Would update: {}", report.file.path.display())
                } else {
                    format!("Updated: {}", report.file.path.display())
                };
                writeln!(out, "{}", ThemeEntry::Success.paint(&line, colors))?;
                if let (Some(original), Some(stripped)) = (original, stripped) {
                    diff_viewer::print_diff(&report.file.rel, original, stripped, &mut out, colors)?;
                }
            }
            FileStatus::SkippedNonUtf8 => {
                warn_msg(format!("Skipping {}: not valid UTF-8.", report.file.path.display()));
            }
            FileStatus::Failed(e) => {
                failed += 1;
                error_msg(e);
            }
        }
    }

    writeln!(out, "Done. Files changed: {}", changed)?;
    info!(
        "Removed {} comment(s), kept {} across {} file(s).",
        totals.comments_removed,
        totals.comments_kept,
        reports.len()
    );

    if failed > 0 {
        error_msg(format!("{} file(s) could not be processed.", failed));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
