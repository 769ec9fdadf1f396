//! Helpers for printing status messages.
//!
//! Every message is one line prefixed by its level, e.g. `WARN: ...`.

use std::io::{self, Write};

use crate::ui::theme::ThemeEntry;

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    entry: ThemeEntry,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(writer, "{} {}", entry.paint(prefix, enable_colors), msg)
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "INFO:", msg, ThemeEntry::Info, enable_colors)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "WARN:", msg, ThemeEntry::Warn, enable_colors)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "ERROR:", msg, ThemeEntry::Error, enable_colors)
}
