// decomment-core/src/span.rs
//! Span and statistics types shared by every scanner.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How a region of source text was classified by a scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Code,
    /// Quoted or otherwise protected literal content (strings, regex literals, CSS urls).
    String,
    Comment,
    /// The opening or closing delimiter of an embedded block, e.g. `<script>`.
    EmbeddedBlockOuter,
}

/// A half-open byte range `[start, end)` into the scanned text.
///
/// Spans produced by one pass never overlap and cover the text exhaustively.
/// Offsets always fall on `char` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        debug_assert!(start <= end);
        Self { start, end, kind }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text this span covers.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range()]
    }
}

/// Counters reported by a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Comments blanked or deleted.
    pub comments_removed: usize,
    /// Comments retained because a keep directive matched.
    pub comments_kept: usize,
}

impl ScanStats {
    pub fn merge(&mut self, other: ScanStats) {
        self.comments_removed += other.comments_removed;
        self.comments_kept += other.comments_kept;
    }

    pub fn record(&mut self, kept: bool) {
        if kept {
            self.comments_kept += 1;
        } else {
            self.comments_removed += 1;
        }
    }
}

/// Replaces every character except line terminators with a space.
///
/// Used for every comment that is blanked: line numbers and the columns of
/// the surrounding code stay where they were.
pub fn blank(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' { c } else { ' ' })
        .collect()
}

/// Drops every character except line terminators.
pub fn collapse(text: &str) -> String {
    text.chars().filter(|&c| c == '\n' || c == '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keeps_line_terminators() {
        assert_eq!(blank("/* a\r\n b */"), "    \r\n     ");
    }

    #[test]
    fn test_blank_counts_chars_not_bytes() {
        assert_eq!(blank("# 世界"), "    ");
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse("{/* a\n b */}"), "\n");
        assert_eq!(collapse("{/* note */}"), "");
    }
}
