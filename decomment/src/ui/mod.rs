// decomment/src/ui/mod.rs
//! Console presentation: colors, status messages and diffs.

pub mod diff_viewer;
pub mod output_format;
pub mod theme;
