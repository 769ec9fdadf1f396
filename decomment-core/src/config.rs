//! Configuration management for `decomment-core`.
//!
//! This module defines the run configuration: keep directives, exclusion
//! patterns, whitespace cleanup and PHP delegate settings. It handles
//! (de)serialization of YAML configurations and provides utilities for
//! loading, merging and validating them.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::keep::compile_patterns;

/// Maximum allowed length for a user-supplied regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Blank-line runs longer than this (plus one) are collapsed by default.
pub const DEFAULT_COLLAPSE_BLANK_LINES: i64 = 2;

pub const DEFAULT_PHP_BINARY: &str = "php";
pub const DEFAULT_PHP_TIMEOUT_MS: u64 = 10_000;

/// Whitespace cleanup applied after stripping.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WhitespaceConfig {
    /// Right-trim lines and collapse blank runs. When off, only a trailing
    /// newline is ensured.
    pub normalize: Option<bool>,
    /// Maximum blank lines kept in a row; negative disables collapsing.
    pub collapse_blank_lines: Option<i64>,
}

/// Settings for the external PHP tokenizer.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PhpConfig {
    pub enabled: Option<bool>,
    pub binary: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// The top-level configuration structure for decomment.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StripConfig {
    /// Regexes; a comment matching any of them is kept verbatim.
    pub keep_directives: Vec<String>,
    /// Glob patterns over `/`-separated paths relative to the target.
    pub excludes: Vec<String>,
    /// Regexes searched (unanchored) in the same relative paths.
    pub exclude_regexes: Vec<String>,
    pub whitespace: WhitespaceConfig,
    pub php: PhpConfig,
}

impl StripConfig {
    /// Loads a configuration from a YAML file and validates it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: StripConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        info!(
            "Loaded {} keep directive(s) and {} exclude(s) from {}.",
            config.keep_directives.len(),
            config.excludes.len() + config.exclude_regexes.len(),
            path.display()
        );

        Ok(config)
    }

    /// Loads the built-in defaults from the embedded configuration.
    pub fn load_default_config() -> Result<Self> {
        debug!("Loading default configuration from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: StripConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;

        debug!("Loaded {} default exclude pattern(s).", config.excludes.len());
        Ok(config)
    }

    pub fn normalize_whitespace(&self) -> bool {
        self.whitespace.normalize.unwrap_or(true)
    }

    /// `None` when blank-line collapsing is disabled.
    pub fn collapse_blank_lines(&self) -> Option<usize> {
        let limit = self
            .whitespace
            .collapse_blank_lines
            .unwrap_or(DEFAULT_COLLAPSE_BLANK_LINES);
        usize::try_from(limit).ok()
    }

    pub fn php_enabled(&self) -> bool {
        self.php.enabled.unwrap_or(true)
    }

    pub fn php_binary(&self) -> &str {
        self.php.binary.as_deref().unwrap_or(DEFAULT_PHP_BINARY)
    }

    pub fn php_timeout(&self) -> Duration {
        Duration::from_millis(self.php.timeout_ms.unwrap_or(DEFAULT_PHP_TIMEOUT_MS))
    }
}

/// Merges a user configuration over the defaults.
///
/// Lists are appended (defaults first, duplicates dropped). Scalar settings
/// from the user replace the defaults when present.
pub fn merge_config(default_config: StripConfig, user_config: Option<StripConfig>) -> StripConfig {
    let mut merged = default_config;
    let user = match user_config {
        Some(user) => user,
        None => return merged,
    };

    debug!(
        "Merging user configuration: {} keep directive(s), {} exclude(s), {} exclude regex(es).",
        user.keep_directives.len(),
        user.excludes.len(),
        user.exclude_regexes.len()
    );

    append_unique(&mut merged.keep_directives, user.keep_directives);
    append_unique(&mut merged.excludes, user.excludes);
    append_unique(&mut merged.exclude_regexes, user.exclude_regexes);

    if let Some(normalize) = user.whitespace.normalize {
        debug!("Overriding whitespace normalization with user value: {}", normalize);
        merged.whitespace.normalize = Some(normalize);
    }
    if let Some(limit) = user.whitespace.collapse_blank_lines {
        debug!("Overriding blank-line collapse limit with user value: {}", limit);
        merged.whitespace.collapse_blank_lines = Some(limit);
    }
    if user.php.enabled.is_some() {
        merged.php.enabled = user.php.enabled;
    }
    if user.php.binary.is_some() {
        merged.php.binary = user.php.binary;
    }
    if user.php.timeout_ms.is_some() {
        merged.php.timeout_ms = user.php.timeout_ms;
    }

    merged
}

fn append_unique(into: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

/// Validates a configuration: every regex must compile and every glob must
/// be non-empty. All problems are reported together.
pub fn validate_config(config: &StripConfig) -> Result<()> {
    let mut errors = Vec::new();

    if let Err(e) = compile_patterns(&config.keep_directives, "keep-directive") {
        errors.push(e.to_string());
    }
    if let Err(e) = compile_patterns(&config.exclude_regexes, "exclude-regex") {
        errors.push(e.to_string());
    }
    for (i, glob) in config.excludes.iter().enumerate() {
        if glob.trim().is_empty() {
            errors.push(format!("Exclude pattern #{} is empty.", i + 1));
        }
    }
    if config.php.timeout_ms == Some(0) {
        errors.push("`php.timeout_ms` must be greater than zero.".to_string());
    }
    if matches!(config.php.binary.as_deref(), Some(b) if b.trim().is_empty()) {
        errors.push("`php.binary` must not be empty.".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
    }
}
