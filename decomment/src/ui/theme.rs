//! Colors for the CLI's console output.
//!
//! Each logical part of the output maps to one foreground color. Colors
//! are only applied when the destination stream is a terminal.

use owo_colors::{AnsiColors, OwoColorize};
use std::fmt;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeEntry {
    /// Section titles such as the scan report header.
    Header,
    /// "Updated:" lines and the final summary.
    Success,
    Info,
    Warn,
    Error,
    DiffAdded,
    DiffRemoved,
    /// The `---`/`+++` and `@@` lines of a diff.
    DiffHeader,
}

impl ThemeEntry {
    pub fn color(self) -> AnsiColors {
        match self {
            ThemeEntry::Header => AnsiColors::BrightWhite,
            ThemeEntry::Success => AnsiColors::Green,
            ThemeEntry::Info => AnsiColors::Cyan,
            ThemeEntry::Warn => AnsiColors::Yellow,
            ThemeEntry::Error => AnsiColors::Red,
            ThemeEntry::DiffAdded => AnsiColors::Green,
            ThemeEntry::DiffRemoved => AnsiColors::Red,
            ThemeEntry::DiffHeader => AnsiColors::BrightBlack,
        }
    }

    /// Wraps `text` for display, colored only when `enable_colors` is set.
    pub fn paint<'a>(self, text: &'a str, enable_colors: bool) -> Painted<'a> {
        Painted {
            text,
            color: enable_colors.then(|| self.color()),
        }
    }
}

/// Text with an optional foreground color.
pub struct Painted<'a> {
    text: &'a str,
    color: Option<AnsiColors>,
}

impl fmt::Display for Painted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{}", self.text.color(color)),
            None => f.write_str(self.text),
        }
    }
}
