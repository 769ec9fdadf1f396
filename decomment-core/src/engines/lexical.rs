// decomment-core/src/engines/lexical.rs
//! A `CommentEngine` implementation built from the lexical scanners.
//!
//! All patterns are compiled once when the engine is built. Dispatch is an
//! exhaustive match over `GrammarFamily`, and the fallbacks (Python line
//! scanner, C-style PHP scanner) are applied here and nowhere else.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;

use crate::config::StripConfig;
use crate::delegate::{NoPhpDelegate, PhpCliDelegate, PhpDelegate};
use crate::engine::{CommentEngine, StripOutcome};
use crate::errors::DecommentError;
use crate::grammar::GrammarFamily;
use crate::keep::KeepDirectives;
use crate::scanners::c_style::{CStyleOptions, CStyleScanner};
use crate::scanners::markup::{EmbeddedScanners, MarkupDispatcher};
use crate::scanners::{python, python_tokens};
use crate::span::ScanStats;

pub struct LexicalEngine {
    keep: KeepDirectives,
    script: CStyleScanner,
    jsx: CStyleScanner,
    css: CStyleScanner,
    scss: CStyleScanner,
    php_fallback: CStyleScanner,
    markup: MarkupDispatcher,
    delegate: Arc<dyn PhpDelegate>,
}

impl fmt::Debug for LexicalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexicalEngine")
            .field("keep_directives", &self.keep.patterns())
            .finish_non_exhaustive()
    }
}

impl LexicalEngine {
    pub fn new(keep: KeepDirectives, delegate: Arc<dyn PhpDelegate>) -> Result<Self, DecommentError> {
        Ok(Self {
            keep,
            script: CStyleScanner::new(CStyleOptions::script(false))?,
            jsx: CStyleScanner::new(CStyleOptions::script(true))?,
            css: CStyleScanner::new(CStyleOptions::stylesheet(false))?,
            scss: CStyleScanner::new(CStyleOptions::stylesheet(true))?,
            php_fallback: CStyleScanner::new(CStyleOptions::php_fallback())?,
            markup: MarkupDispatcher::new()?,
            delegate,
        })
    }

    /// An engine that never calls out to PHP.
    pub fn without_php(keep: KeepDirectives) -> Result<Self, DecommentError> {
        Self::new(keep, Arc::new(NoPhpDelegate))
    }

    /// Builds the engine for a validated configuration.
    pub fn from_config(config: &StripConfig) -> Result<Self> {
        let keep = KeepDirectives::compile(&config.keep_directives)
            .context("Failed to compile keep directives")?;
        let delegate: Arc<dyn PhpDelegate> = if config.php_enabled() {
            Arc::new(
                PhpCliDelegate::new(config.php_binary(), config.php_timeout())
                    .context("Failed to start the PHP delegate runtime")?,
            )
        } else {
            debug!("PHP delegate disabled by configuration.");
            Arc::new(NoPhpDelegate)
        };
        Ok(Self::new(keep, delegate)?)
    }

    fn embedded(&self) -> EmbeddedScanners<'_> {
        EmbeddedScanners {
            script: &self.script,
            style: &self.css,
            php_fallback: &self.php_fallback,
            delegate: self.delegate.as_ref(),
        }
    }

    fn strip_python(&self, content: &str) -> StripOutcome {
        match python_tokens::strip(content, &self.keep) {
            Ok((text, stats)) => StripOutcome {
                text,
                stats,
                used_fallback: false,
            },
            Err(e) => {
                debug!("Python tokenizer failed ({}); using line scanner.", e);
                let (text, stats) = python::scan(content, &self.keep);
                StripOutcome {
                    text,
                    stats,
                    used_fallback: true,
                }
            }
        }
    }

    fn strip_php(&self, content: &str) -> StripOutcome {
        let (fallback, stats) = self.php_fallback.scan(content, &self.keep);
        match self.delegate.strip(content, &self.keep.patterns()) {
            Ok(text) => StripOutcome {
                text,
                stats,
                used_fallback: false,
            },
            Err(e) => {
                debug!("PHP delegate failed ({}); using c-style scanner.", e);
                StripOutcome {
                    text: fallback,
                    stats,
                    used_fallback: true,
                }
            }
        }
    }

    fn c_style(scanner: &CStyleScanner, content: &str, keep: &KeepDirectives) -> StripOutcome {
        let (text, stats) = scanner.scan(content, keep);
        StripOutcome {
            text,
            stats,
            used_fallback: false,
        }
    }
}

impl CommentEngine for LexicalEngine {
    fn strip(&self, content: &str, family: GrammarFamily) -> Result<StripOutcome> {
        debug!("Stripping {} bytes as {}.", content.len(), family);
        let outcome = match family {
            GrammarFamily::Python => self.strip_python(content),
            GrammarFamily::Script { jsx: false } => Self::c_style(&self.script, content, &self.keep),
            GrammarFamily::Script { jsx: true } => Self::c_style(&self.jsx, content, &self.keep),
            GrammarFamily::Stylesheet { line_comments: false } => {
                Self::c_style(&self.css, content, &self.keep)
            }
            GrammarFamily::Stylesheet { line_comments: true } => {
                Self::c_style(&self.scss, content, &self.keep)
            }
            GrammarFamily::Php => self.strip_php(content),
            GrammarFamily::Markup(variant) => {
                let (text, stats) = self.markup.scan(content, variant, &self.keep, self.embedded());
                StripOutcome {
                    text,
                    stats,
                    used_fallback: false,
                }
            }
        };
        Ok(outcome)
    }

    fn analyze(&self, content: &str, family: GrammarFamily) -> Result<ScanStats> {
        // Counting never calls the delegate. PHP statistics always come from
        // the fallback classification.
        let stats = match family {
            GrammarFamily::Php => self.php_fallback.classify(content, &self.keep).1,
            GrammarFamily::Markup(variant) => {
                let scanners = EmbeddedScanners {
                    delegate: &NoPhpDelegate,
                    ..self.embedded()
                };
                self.markup.scan(content, variant, &self.keep, scanners).1
            }
            _ => self.strip(content, family)?.stats,
        };
        Ok(stats)
    }

    fn keep_directives(&self) -> &KeepDirectives {
        &self.keep
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}
