//! exclude.rs - Path exclusion by glob and regex.
//!
//! Paths are matched relative to the target's base directory, with `/` as
//! the separator on every platform. Globs follow `fnmatch` without
//! `FNM_PATHNAME`: `*` and `?` also match `/`. A leading `**/` additionally
//! matches at the root, so `**/*.min.js` excludes `app.min.js` too.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::Regex;
use std::path::{Component, Path};

use crate::config::StripConfig;
use crate::errors::DecommentError;
use crate::keep::compile_patterns;

/// Translates an `fnmatch` glob into an anchored regular expression.
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut rest = glob;

    if let Some(stripped) = rest.strip_prefix("**/") {
        out.push_str("(?:.*/)?");
        rest = stripped;
    }

    let chars: Vec<char> = rest.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                while i + 1 < chars.len() && chars[i + 1] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match chars[i + 1..].iter().position(|&c| c == ']') {
                // `[]` and `[!]` are not classes; the `]` belongs to the set
                Some(close) if close > 0 && !(close == 1 && chars[i + 1] == '!') => {
                    let body: String = chars[i + 1..i + 1 + close].iter().collect();
                    out.push('[');
                    let body = match body.strip_prefix('!') {
                        Some(negated) => {
                            out.push('^');
                            negated.to_string()
                        }
                        None => body,
                    };
                    for c in body.chars() {
                        if matches!(c, '\\' | '[' | '&' | '~' | '^') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push(']');
                    i += close + 1;
                }
                _ => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Renders a relative path with `/` separators.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// A compiled set of exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    globs: Vec<(String, Regex)>,
    regexes: Vec<Regex>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(globs: &[S], regexes: &[S]) -> Result<Self, DecommentError> {
        let translated: Vec<String> = globs.iter().map(|g| glob_to_regex(g.as_ref())).collect();
        let compiled_globs = compile_patterns(&translated, "exclude")?;
        let globs = globs
            .iter()
            .map(|g| g.as_ref().to_string())
            .zip(compiled_globs)
            .collect();
        let regexes = compile_patterns(regexes, "exclude-regex")?;
        Ok(Self { globs, regexes })
    }

    pub fn from_config(config: &StripConfig) -> Result<Self, DecommentError> {
        let set = Self::new(&config.excludes, &config.exclude_regexes)?;
        debug!(
            "Compiled {} exclude glob(s) and {} exclude regex(es).",
            set.globs.len(),
            set.regexes.len()
        );
        Ok(set)
    }

    /// `rel` is a `/`-separated path relative to the target base.
    pub fn is_excluded(&self, rel: &str) -> bool {
        if let Some((glob, _)) = self.globs.iter().find(|(_, re)| re.is_match(rel)) {
            debug!("'{}' excluded by glob '{}'.", rel, glob);
            return true;
        }
        if self.regexes.iter().any(|re| re.is_match(rel)) {
            debug!("'{}' excluded by regex.", rel);
            return true;
        }
        false
    }

    pub fn is_excluded_path(&self, rel: &Path) -> bool {
        self.is_excluded(&to_slash_path(rel))
    }
}
