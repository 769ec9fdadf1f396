// decomment-core/src/scanners/alternation.rs
//! Ordered-alternation driver shared by the C-style and markup scanners.
//!
//! All branches are joined into one regular expression, each wrapped in a
//! named group. The `regex` crate uses leftmost-first semantics, so at any
//! position the earliest branch that matches wins, exactly like a
//! backtracking engine would pick it. Context conditions the crate cannot
//! express (no look-around) are applied by the caller as a veto: a vetoed
//! hit is discarded and the search resumes one character later.

use regex::{Captures, Regex, RegexBuilder};

/// One accepted match.
#[derive(Debug)]
pub(crate) struct Hit<'t, T> {
    pub tag: T,
    pub start: usize,
    pub end: usize,
    pub caps: Captures<'t>,
}

#[derive(Debug)]
pub(crate) struct Alternation<T> {
    regex: Regex,
    /// Branch tags in priority order, paired with the name of the group that
    /// identifies the branch.
    branches: Vec<(T, &'static str)>,
}

impl<T: Copy> Alternation<T> {
    /// Builds the alternation. Each part's pattern must contain a named group
    /// called `group`; the group participates iff the branch fired.
    pub fn build(
        parts: Vec<(T, &'static str, String)>,
        case_insensitive: bool,
        dot_matches_new_line: bool,
    ) -> Result<Self, regex::Error> {
        let pattern = parts
            .iter()
            .map(|(_, _, p)| p.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(case_insensitive)
            .dot_matches_new_line(dot_matches_new_line)
            .build()?;
        let branches = parts.into_iter().map(|(tag, group, _)| (tag, group)).collect();
        Ok(Self { regex, branches })
    }

    fn tag_of(&self, caps: &Captures<'_>) -> Option<T> {
        self.branches
            .iter()
            .find(|(_, group)| caps.name(group).is_some())
            .map(|(tag, _)| *tag)
    }

    /// Collects every accepted hit, left to right, without overlap.
    ///
    /// `accept` receives the branch tag, the hit's start offset and its
    /// captures, and returns false to veto the hit.
    pub fn find_all<'t, F>(&self, text: &'t str, mut accept: F) -> Vec<Hit<'t, T>>
    where
        F: FnMut(T, usize, &Captures<'t>) -> bool,
    {
        let mut hits = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let caps = match self.regex.captures_at(text, pos) {
                Some(caps) => caps,
                None => break,
            };
            let (start, end) = match caps.get(0) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };

            match self.tag_of(&caps) {
                Some(tag) if end > start && accept(tag, start, &caps) => {
                    hits.push(Hit { tag, start, end, caps });
                    pos = end;
                }
                _ => pos = next_char_boundary(text, start),
            }
        }

        hits
    }
}

/// Offset of the character following the one at `i`.
pub(crate) fn next_char_boundary(text: &str, i: usize) -> usize {
    text[i..].chars().next().map_or(i + 1, |c| i + c.len_utf8())
}
