// decomment-core/src/lib.rs
//! # decomment Core Library
//!
//! `decomment-core` provides the platform-independent logic for removing comments, and only
//! comments, from source files written in several unrelated grammars: Python, C-style languages
//! (JavaScript, TypeScript, JSX/TSX, CSS, SCSS), PHP, and HTML-family templates (HTML, Blade,
//! Jinja/Twig). String, regex and template-literal content that merely looks like a comment is
//! never modified.
//!
//! The library performs no file-system traversal and no write-back. It transforms text and
//! reports what it did; the `decomment` binary does the rest.
//!
//! ## Modules
//!
//! * `grammar`: Maps file extensions to a closed set of grammar families.
//! * `span`: Span and statistics types shared by the scanners.
//! * `keep`: Compiles keep directives, the patterns that exempt a comment from removal.
//! * `scanners`: The lexical scanners (Python tokenizer and line scanner, C-style alternation,
//!   markup dispatcher).
//! * `delegate`: The PHP delegate trait and its subprocess implementation.
//! * `engine`: Defines the `CommentEngine` trait.
//! * `engines`: Concrete implementations of `CommentEngine`.
//! * `config`: `StripConfig` loading, merging and validation.
//! * `exclude`: Glob and regex path exclusion.
//! * `whitespace`: Whitespace cleanup applied after stripping.
//! * `headless`: One-shot helpers for non-interactive use.
//!
//! ## Usage Example
//!
//! ```rust
//! use decomment_core::{CommentEngine, GrammarFamily, KeepDirectives, LexicalEngine};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let keep = KeepDirectives::compile(&["noqa"])?;
//!     let engine = LexicalEngine::without_php(keep)?;
//!
//!     let outcome = engine.strip("x = 1  # noqa: E501\ny = '#'  # gone\n", GrammarFamily::Python)?;
//!     assert_eq!(outcome.text, "x = 1  # noqa: E501\ny = '#'\n");
//!     assert_eq!(outcome.stats.comments_kept, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Scanners never fail on malformed input; they leave ambiguous content alone. Fallible
//! operations (pattern compilation, configuration loading) return [`DecommentError`] or
//! `anyhow::Error` with context.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod delegate;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod exclude;
pub mod grammar;
pub mod headless;
pub mod keep;
pub mod scanners;
pub mod span;
pub mod whitespace;

/// Re-exports the configuration types and functions.
pub use config::{merge_config, validate_config, StripConfig, MAX_PATTERN_LENGTH};

/// Re-exports the custom error type for clear error reporting.
pub use errors::DecommentError;

/// Re-exports the engine trait, its result type and the lexical implementation.
pub use engine::{CommentEngine, StripOutcome};
pub use engines::lexical::LexicalEngine;

pub use delegate::{DelegateError, NoPhpDelegate, PhpCliDelegate, PhpDelegate};
pub use exclude::ExcludeSet;
pub use grammar::{GrammarFamily, MarkupVariant, SUPPORTED_EXTENSIONS};
pub use keep::KeepDirectives;
pub use span::{ScanStats, Span, SpanKind};
pub use whitespace::WhitespacePolicy;

/// Re-exports functions for one-shot, non-interactive use.
pub use headless::{headless_strip_by_extension, headless_strip_string};
