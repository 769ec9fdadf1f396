//! `scan` command: count removable comments without writing anything.
//!
//! The console report lists every file that has comments, followed by a
//! total. `--json-stdout` prints the same data as JSON instead.
//! `--fail-over-threshold` turns the run into a CI gate.

use anyhow::Result;
use is_terminal::IsTerminal;
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

use decomment_core::{CommentEngine, ExcludeSet, ScanStats};

use crate::cli::ScanCommand;
use crate::commands::common::{build_config, build_engine, build_pool, error_msg, warn_msg};
use crate::ui::theme::ThemeEntry;
use crate::utils::walker::{collect_files, SourceFile};

/// Per-file entry of the scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    pub path: String,
    pub grammar: String,
    pub comments_removed: usize,
    pub comments_kept: usize,
}

/// The full scan report, as printed by `--json-stdout`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileScan>,
    pub files_scanned: usize,
    /// Paths that were not valid UTF-8 or could not be read.
    pub skipped: Vec<String>,
    pub total_removable: usize,
    pub total_kept: usize,
}

impl ScanReport {
    fn record(&mut self, file: &SourceFile, result: Result<Option<ScanStats>>) {
        match result {
            Ok(Some(stats)) => {
                self.files_scanned += 1;
                self.total_removable += stats.comments_removed;
                self.total_kept += stats.comments_kept;
                self.files.push(FileScan {
                    path: file.rel.clone(),
                    grammar: file.family.to_string(),
                    comments_removed: stats.comments_removed,
                    comments_kept: stats.comments_kept,
                });
            }
            Ok(None) => {
                warn_msg(format!("Skipping {}: not valid UTF-8.", file.path.display()));
                self.skipped.push(file.rel.clone());
            }
            Err(e) => {
                error_msg(format!("{:#}", e));
                self.skipped.push(file.rel.clone());
            }
        }
    }

    /// Whether the removable total is above `threshold`.
    pub fn exceeds(&self, threshold: Option<usize>) -> bool {
        threshold.is_some_and(|limit| self.total_removable > limit)
    }
}

fn scan_file(engine: &dyn CommentEngine, file: &SourceFile) -> Result<Option<ScanStats>> {
    match file.read()? {
        Some(content) => Ok(Some(engine.analyze(&content, file.family)?)),
        None => Ok(None),
    }
}

/// Writes the human-readable report.
pub fn print_report<W: Write>(report: &ScanReport, writer: &mut W, enable_colors: bool) -> io::Result<()> {
    writeln!(writer, "{}", ThemeEntry::Header.paint("Comment scan", enable_colors))?;
    for file in report.files.iter().filter(|f| f.comments_removed + f.comments_kept > 0) {
        writeln!(
            writer,
            "  {} ({}): {} removable, {} kept",
            file.path, file.grammar, file.comments_removed, file.comments_kept
        )?;
    }
    writeln!(
        writer,
        "Total: {} removable comment(s), {} kept, in {} file(s).",
        report.total_removable, report.total_kept, report.files_scanned
    )
}

pub fn run_scan(cmd: &ScanCommand) -> Result<ExitCode> {
    info!("Starting scan of {}.", cmd.target.display());

    let config = build_config(&cmd.engine, Some(&cmd.exclude), None)?;
    let excludes = ExcludeSet::from_config(&config)?;
    let engine = build_engine(&config)?;
    let files = collect_files(&cmd.target, &excludes)?;

    let pool = build_pool(cmd.exclude.jobs)?;
    let results: Vec<Result<Option<ScanStats>>> =
        pool.install(|| files.par_iter().map(|file| scan_file(&engine, file)).collect());

    let mut report = ScanReport::default();
    for (file, result) in files.iter().zip(results) {
        report.record(file, result);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cmd.json_stdout {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        print_report(&report, &mut out, stdout.is_terminal())?;
    }

    if report.exceeds(cmd.fail_over_threshold) {
        error_msg(format!(
            "Found {} removable comment(s), over the threshold of {}.",
            report.total_removable,
            cmd.fail_over_threshold.unwrap_or_default()
        ));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScanReport {
        ScanReport {
            files: vec![
                FileScan {
                    path: "src/a.py".to_string(),
                    grammar: "python".to_string(),
                    comments_removed: 3,
                    comments_kept: 1,
                },
                FileScan {
                    path: "src/clean.js".to_string(),
                    grammar: "script".to_string(),
                    comments_removed: 0,
                    comments_kept: 0,
                },
            ],
            files_scanned: 2,
            skipped: Vec::new(),
            total_removable: 3,
            total_kept: 1,
        }
    }

    #[test]
    fn test_threshold() {
        let report = report();
        assert!(!report.exceeds(None));
        assert!(!report.exceeds(Some(3)));
        assert!(report.exceeds(Some(2)));
    }

    #[test]
    fn test_console_report_lists_files_with_comments() {
        let mut buf = Vec::new();
        print_report(&report(), &mut buf, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "Comment scan\n  src/a.py (python): 3 removable, 1 kept\nTotal: 3 removable comment(s), 1 kept, in 2 file(s).\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["total_removable"], 3);
        assert_eq!(value["files"][0]["grammar"], "python");
        assert!(value["skipped"].as_array().unwrap().is_empty());
    }
}
