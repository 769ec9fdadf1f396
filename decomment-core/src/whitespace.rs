//! Whitespace cleanup applied after comments are removed.
//!
//! Blanking leaves trailing spaces and empty lines behind. With
//! normalization on, lines are right-trimmed, long runs of blank lines are
//! collapsed and the text ends with exactly one line break. With it off, only
//! a final line break is ensured.
//!
//! License: MIT OR APACHE 2.0

use crate::config::StripConfig;

/// How to tidy a file after stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespacePolicy {
    pub normalize: bool,
    /// Blank lines allowed in a row is `limit + 1`; `None` keeps them all.
    pub collapse_blank_lines: Option<usize>,
}

impl Default for WhitespacePolicy {
    fn default() -> Self {
        Self {
            normalize: true,
            collapse_blank_lines: Some(2),
        }
    }
}

impl WhitespacePolicy {
    pub fn from_config(config: &StripConfig) -> Self {
        Self {
            normalize: config.normalize_whitespace(),
            collapse_blank_lines: config.collapse_blank_lines(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        if self.normalize {
            normalize(text, self.collapse_blank_lines)
        } else {
            ensure_trailing_newline(text)
        }
    }
}

/// `"\r\n"` when the first line break in `text` is CRLF, `"\n"` otherwise.
pub fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

pub fn ensure_trailing_newline(text: &str) -> String {
    let mut out = text.to_string();
    if !out.ends_with('\n') {
        out.push_str(line_ending(text));
    }
    out
}

/// Right-trims every line, keeps at most `limit + 1` consecutive blank lines
/// and ends the text with a single line break. Line breaks are rewritten in
/// the file's own style.
pub fn normalize(text: &str, collapse_blank_lines: Option<usize>) -> String {
    let eol = line_ending(text);
    let body = text.trim_end_matches(['\r', '\n']);

    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for line in body.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if collapse_blank_lines.map_or(true, |limit| blank_run <= limit + 1) {
                lines.push(line);
            }
        } else {
            blank_run = 0;
            lines.push(line);
        }
    }

    let mut out = lines.join(eol);
    out.push_str(eol);
    out
}
