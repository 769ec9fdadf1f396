// decomment/src/commands/common.rs
//! Setup shared by the `strip`, `scan` and `filter` commands: configuration
//! layering, engine construction, the worker pool and console messages.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io;

use decomment_core::config::{merge_config, validate_config, PhpConfig, StripConfig, WhitespaceConfig};
use decomment_core::{CommentEngine, LexicalEngine};

use crate::cli::{EngineArgs, ExcludeArgs, WhitespaceArgs};
use crate::ui::output_format;

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Turns command-line flags into a configuration layer. Flags that were not
/// given stay `None`/empty so they do not override the file or defaults.
fn cli_layer(
    engine: &EngineArgs,
    exclude: Option<&ExcludeArgs>,
    whitespace: Option<&WhitespaceArgs>,
) -> StripConfig {
    let mut layer = StripConfig {
        keep_directives: engine.keep_directives.clone(),
        php: PhpConfig {
            enabled: engine.no_php.then_some(false),
            binary: engine.php_binary.clone(),
            timeout_ms: engine.php_timeout_ms,
        },
        ..Default::default()
    };
    if let Some(exclude) = exclude {
        layer.excludes = exclude.excludes.clone();
        layer.exclude_regexes = exclude.exclude_regexes.clone();
    }
    if let Some(whitespace) = whitespace {
        layer.whitespace = WhitespaceConfig {
            normalize: whitespace.no_whitespace.then_some(false),
            collapse_blank_lines: whitespace.collapse_blank_lines,
        };
    }
    layer
}

/// Builds the run configuration: built-in defaults, then the `--config`
/// file, then command-line flags. The result is validated as a whole so
/// every bad pattern is reported before any file is touched.
pub fn build_config(
    engine: &EngineArgs,
    exclude: Option<&ExcludeArgs>,
    whitespace: Option<&WhitespaceArgs>,
) -> Result<StripConfig> {
    let defaults = StripConfig::load_default_config().context("Failed to load default configuration")?;

    let with_file = match &engine.config {
        Some(path) => {
            let user = StripConfig::load_from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            merge_config(defaults, Some(user))
        }
        None => defaults,
    };

    let config = merge_config(with_file, Some(cli_layer(engine, exclude, whitespace)));
    validate_config(&config)?;
    debug!(
        "Effective configuration: {} keep directive(s), {} exclude glob(s), {} exclude regex(es), php {}.",
        config.keep_directives.len(),
        config.excludes.len(),
        config.exclude_regexes.len(),
        if config.php_enabled() { "enabled" } else { "disabled" }
    );
    Ok(config)
}

pub fn build_engine(config: &StripConfig) -> Result<LexicalEngine> {
    let engine = LexicalEngine::from_config(config)?;
    info!(
        "Using the {} engine with {} keep directive(s).",
        engine.name(),
        engine.keep_directives().len()
    );
    Ok(engine)
}

/// A rayon pool with `jobs` workers; `None` uses rayon's default size.
pub fn build_pool(jobs: Option<usize>) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .thread_name(|i| format!("decomment-worker-{}", i))
        .build()
        .context("Failed to build the worker pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() -> Result<()> {
        let engine = EngineArgs {
            keep_directives: vec!["noqa".to_string()],
            no_php: true,
            ..Default::default()
        };
        let whitespace = WhitespaceArgs {
            collapse_blank_lines: Some(-1),
            no_whitespace: true,
        };
        let config = build_config(&engine, None, Some(&whitespace))?;
        assert_eq!(config.keep_directives, vec!["noqa"]);
        assert!(!config.php_enabled());
        assert!(!config.normalize_whitespace());
        assert_eq!(config.collapse_blank_lines(), None);
        assert!(config.excludes.iter().any(|g| g == "node_modules/**"));
        Ok(())
    }

    #[test]
    fn test_unset_flags_keep_defaults() -> Result<()> {
        let config = build_config(&EngineArgs::default(), Some(&ExcludeArgs::default()), None)?;
        assert!(config.php_enabled());
        assert!(config.normalize_whitespace());
        assert_eq!(config.collapse_blank_lines(), Some(2));
        Ok(())
    }

    #[test]
    fn test_invalid_patterns_reported_together() {
        let engine = EngineArgs {
            keep_directives: vec!["(open".to_string()],
            ..Default::default()
        };
        let exclude = ExcludeArgs {
            exclude_regexes: vec!["[bad".to_string()],
            ..Default::default()
        };
        let err = build_config(&engine, Some(&exclude), None).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("(open"), "{}", msg);
        assert!(msg.contains("[bad"), "{}", msg);
    }
}
