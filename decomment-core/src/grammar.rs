// decomment-core/src/grammar.rs
//! File classification: maps a file extension to the grammar family that
//! decides which scanner runs. The table is fixed; content is never sniffed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The templating flavour of an HTML-family document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupVariant {
    Html,
    /// Laravel Blade: adds `@verbatim`, `@php` and `{{-- --}}`.
    Blade,
    /// Jinja/Twig: adds a `{# #}` comment pass.
    Jinja,
}

/// Lexical rule set applied to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarFamily {
    Python,
    /// JavaScript/TypeScript, optionally with JSX.
    Script { jsx: bool },
    /// CSS (`/* */` only) or SCSS (also `//`).
    Stylesheet { line_comments: bool },
    Php,
    Markup(MarkupVariant),
}

/// Every extension the classification table knows, without the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "php", "blade.php", "js", "jsx", "ts", "tsx", "css", "scss", "py", "html", "htm", "jinja",
    "jinja2", "j2", "twig",
];

impl GrammarFamily {
    /// Looks up an extension (lowercase, no leading dot; `blade.php` for Blade).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let family = match ext {
            "py" => GrammarFamily::Python,
            "js" | "ts" => GrammarFamily::Script { jsx: false },
            "jsx" | "tsx" => GrammarFamily::Script { jsx: true },
            "css" => GrammarFamily::Stylesheet { line_comments: false },
            "scss" => GrammarFamily::Stylesheet { line_comments: true },
            "php" => GrammarFamily::Php,
            "blade.php" => GrammarFamily::Markup(MarkupVariant::Blade),
            "html" | "htm" => GrammarFamily::Markup(MarkupVariant::Html),
            "jinja" | "jinja2" | "j2" | "twig" => GrammarFamily::Markup(MarkupVariant::Jinja),
            _ => return None,
        };
        Some(family)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        detect_extension(path).and_then(|ext| Self::from_extension(&ext))
    }
}

impl fmt::Display for GrammarFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarFamily::Python => write!(f, "python"),
            GrammarFamily::Script { jsx: false } => write!(f, "script"),
            GrammarFamily::Script { jsx: true } => write!(f, "script+jsx"),
            GrammarFamily::Stylesheet { line_comments: false } => write!(f, "css"),
            GrammarFamily::Stylesheet { line_comments: true } => write!(f, "scss"),
            GrammarFamily::Php => write!(f, "php"),
            GrammarFamily::Markup(MarkupVariant::Html) => write!(f, "html"),
            GrammarFamily::Markup(MarkupVariant::Blade) => write!(f, "blade"),
            GrammarFamily::Markup(MarkupVariant::Jinja) => write!(f, "jinja"),
        }
    }
}

/// Extracts the classification extension of a path: lowercase, no dot, with
/// the compound `blade.php` recognised before the plain suffix.
pub fn detect_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?.to_lowercase();
    if name.ends_with(".blade.php") {
        return Some("blade.php".to_string());
    }
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        // dotfiles such as `.py` have no extension
        return None;
    }
    Some(ext.to_string())
}
