// decomment-core/src/engine.rs
//! Defines the core `CommentEngine` trait and its result type.
//!
//! The `CommentEngine` trait provides a pluggable interface for different
//! comment-removal strategies. The lexical engine in
//! [`crate::engines::lexical`] is the one shipped here; a syntax-tree engine
//! could sit behind the same contract.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use serde::Serialize;

use crate::grammar::GrammarFamily;
use crate::keep::KeepDirectives;
use crate::span::ScanStats;

/// The result of stripping one file's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripOutcome {
    /// The content with comments removed. Whitespace is not normalized.
    pub text: String,
    pub stats: ScanStats,
    /// True when the primary path for the grammar gave up and a less
    /// precise scanner produced `text` (Python tokenizer error, PHP
    /// delegate unavailable).
    pub used_fallback: bool,
}

/// A trait that defines the core functionality of a comment engine.
///
/// Engines are built once per run and shared across worker threads, hence
/// `Send + Sync`.
pub trait CommentEngine: Send + Sync {
    /// Removes comments from `content`, interpreted under `family`.
    fn strip(&self, content: &str, family: GrammarFamily) -> Result<StripOutcome>;

    /// Counts comments without producing output the caller keeps.
    fn analyze(&self, content: &str, family: GrammarFamily) -> Result<ScanStats> {
        Ok(self.strip(content, family)?.stats)
    }

    /// The keep directives the engine was built with.
    fn keep_directives(&self) -> &KeepDirectives;

    /// A short identifier used in logs and reports.
    fn name(&self) -> &'static str;
}
