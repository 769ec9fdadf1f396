//! keep.rs - Compiles and evaluates keep directives.
//!
//! A keep directive is a user-supplied regular expression. Any comment whose
//! raw text (delimiters included) matches one of the directives is retained
//! verbatim instead of being removed. Compilation happens once per run, before
//! any file is touched: a pattern that fails to compile is fatal, because
//! silently ignoring it would strip comments the user asked to keep.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::config::MAX_PATTERN_LENGTH;
use crate::errors::DecommentError;

/// A single compiled keep directive.
#[derive(Debug, Clone)]
pub struct KeepDirective {
    /// The pattern as the user wrote it. Forwarded verbatim to the PHP delegate.
    pub pattern: String,
    /// The compiled expression used for matching.
    pub regex: Regex,
}

/// The ordered set of keep directives for one run.
#[derive(Debug, Clone, Default)]
pub struct KeepDirectives {
    directives: Vec<KeepDirective>,
}

impl KeepDirectives {
    /// A set with no directives: every comment is a removal candidate.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles every pattern, reporting all failures together.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, DecommentError> {
        let regexes = compile_patterns(patterns, "keep-directive")?;
        let directives = patterns
            .iter()
            .zip(regexes)
            .map(|(p, regex)| KeepDirective {
                pattern: p.as_ref().to_string(),
                regex,
            })
            .collect();
        Ok(Self { directives })
    }

    /// Returns true if any directive matches anywhere in `comment`.
    pub fn matches(&self, comment: &str) -> bool {
        self.directives.iter().any(|d| d.regex.is_match(comment))
    }

    /// The raw pattern strings, in the order they were supplied.
    pub fn patterns(&self) -> Vec<String> {
        self.directives.iter().map(|d| d.pattern.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Compiles a list of user-supplied regular expressions.
///
/// `option_name` names the option the patterns came from so that the error
/// report points the user at the right flag or config key. Every pattern is
/// checked; the error lists all failures, not just the first.
pub fn compile_patterns<S: AsRef<str>>(
    patterns: &[S],
    option_name: &str,
) -> Result<Vec<Regex>, DecommentError> {
    debug!("Compiling {} {} pattern(s).", patterns.len(), option_name);

    let mut compiled = Vec::with_capacity(patterns.len());
    let mut errors = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(DecommentError::PatternLengthExceeded(
                pattern.to_string(),
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        match RegexBuilder::new(pattern)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build()
        {
            Ok(regex) => {
                log::debug!(
                    target: "decomment_core::keep",
                    "Pattern '{}' compiled successfully.",
                    pattern
                );
                compiled.push(regex);
            }
            Err(e) => {
                errors.push(DecommentError::PatternCompilationError(
                    format!("{} '{}'", option_name, pattern),
                    e,
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(compiled)
    } else {
        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(DecommentError::Fatal(format!(
            "Invalid {} pattern(s) ({}):\n{}",
            option_name,
            errors.len(),
            message
        )))
    }
}
