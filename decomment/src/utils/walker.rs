// decomment/src/utils/walker.rs
//! Collects the files a command should visit.
//!
//! A directory target is walked recursively. Only files whose extension is
//! in the classification table are returned, and exclusion rules are
//! matched against `/`-separated paths relative to the target. A file
//! target is matched relative to its parent directory.
//! License: MIT OR APACHE 2.0

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use decomment_core::exclude::to_slash_path;
use decomment_core::{ExcludeSet, GrammarFamily};

/// A file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the target base, `/`-separated.
    pub rel: String,
    pub family: GrammarFamily,
}

impl SourceFile {
    /// Reads the file as UTF-8. `Ok(None)` means the bytes are not valid
    /// UTF-8 and the file should be skipped.
    pub fn read(&self) -> Result<Option<String>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(String::from_utf8(bytes).ok())
    }
}

/// Returns the supported, non-excluded files under `target`, sorted by path.
pub fn collect_files(target: &Path, excludes: &ExcludeSet) -> Result<Vec<SourceFile>> {
    if !target.exists() {
        bail!("Invalid target: {}", target.display());
    }

    if target.is_file() {
        return Ok(single_file(target, excludes).into_iter().collect());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(target)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            // a directory whose contents all match `dir/**` is skipped whole
            let rel = relative(entry.path(), target);
            !excludes.is_excluded(&format!("{}/", rel))
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", target.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(family) = GrammarFamily::from_path(entry.path()) else {
            continue;
        };
        let rel = relative(entry.path(), target);
        if excludes.is_excluded(&rel) {
            continue;
        }
        files.push(SourceFile {
            path: entry.into_path(),
            rel,
            family,
        });
    }

    debug!("Collected {} file(s) under {}.", files.len(), target.display());
    Ok(files)
}

fn single_file(path: &Path, excludes: &ExcludeSet) -> Option<SourceFile> {
    let rel = path
        .file_name()
        .map(|name| to_slash_path(Path::new(name)))
        .unwrap_or_default();
    if excludes.is_excluded(&rel) {
        debug!("{} is excluded.", path.display());
        return None;
    }
    match GrammarFamily::from_path(path) {
        Some(family) => Some(SourceFile {
            path: path.to_path_buf(),
            rel,
            family,
        }),
        None => {
            warn!("Skipping {}: unsupported file type.", path.display());
            None
        }
    }
}

fn relative(path: &Path, base: &Path) -> String {
    to_slash_path(path.strip_prefix(base).unwrap_or(path))
}
