// decomment-core/src/headless.rs
//! `headless.rs`
//! Convenience wrappers for using the engine without the CLI.
//! Provides one-shot helpers that strip a string, with or without the
//! whitespace cleanup the CLI applies to files.

use anyhow::{anyhow, Result};

use crate::config::StripConfig;
use crate::engine::CommentEngine;
use crate::engines::lexical::LexicalEngine;
use crate::grammar::GrammarFamily;
use crate::whitespace::WhitespacePolicy;

/// Strips comments from `content` and applies the configured whitespace
/// policy, exactly as a file would be processed.
///
/// # Arguments
///
/// * `config` - The merged configuration (defaults plus user overrides).
/// * `content` - The text to strip.
/// * `family` - The grammar the text is written in.
pub fn headless_strip_string(
    config: &StripConfig,
    content: &str,
    family: GrammarFamily,
) -> Result<String> {
    let engine = LexicalEngine::from_config(config)?;
    let outcome = engine.strip(content, family)?;
    Ok(WhitespacePolicy::from_config(config).apply(&outcome.text))
}

/// Like [`headless_strip_string`], choosing the grammar from a file
/// extension such as `"py"` or `"blade.php"`.
pub fn headless_strip_by_extension(
    config: &StripConfig,
    content: &str,
    extension: &str,
) -> Result<String> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    let family = GrammarFamily::from_extension(&ext)
        .ok_or_else(|| anyhow!("Unsupported file extension: '{}'", extension))?;
    headless_strip_string(config, content, family)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Result<StripConfig> {
        let mut config = StripConfig::load_default_config()?;
        config.php.enabled = Some(false);
        Ok(config)
    }

    #[test]
    fn test_headless_strip_string_python() -> Result<()> {
        let out = headless_strip_string(&config()?, "x = 1  # inline", GrammarFamily::Python)?;
        assert_eq!(out, "x = 1\n");
        Ok(())
    }

    #[test]
    fn test_headless_strip_by_extension() -> Result<()> {
        let out = headless_strip_by_extension(&config()?, "a();   // c\n\n\n\n\nb();", ".JS")?;
        assert_eq!(out, "a();\n\n\n\nb();\n");
        Ok(())
    }

    #[test]
    fn test_unknown_extension() -> Result<()> {
        let err = headless_strip_by_extension(&config()?, "", "rs").unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
        Ok(())
    }
}
