// decomment/src/ui/diff_viewer.rs
//! Unified diff output for `strip --diff`.
//!
//! Removed lines are shown in red, added lines in green, with the usual
//! `---`/`+++` header naming the file.

use diffy::{create_patch, Line as DiffLine};
use std::io::{self, Write};

use crate::ui::theme::ThemeEntry;

/// Writes the unified diff between `original` and `stripped` for `label`.
/// Writes nothing when the texts are equal.
pub fn print_diff<W: Write>(
    label: &str,
    original: &str,
    stripped: &str,
    writer: &mut W,
    enable_colors: bool,
) -> io::Result<()> {
    if original == stripped {
        return Ok(());
    }

    let patch = create_patch(original, stripped);
    let header = ThemeEntry::DiffHeader;
    writeln!(writer, "{}", header.paint(&format!("--- a/{}", label), enable_colors))?;
    writeln!(writer, "{}", header.paint(&format!("+++ b/{}", label), enable_colors))?;

    for hunk in patch.hunks() {
        let range = format!(
            "@@ -{},{} +{},{} @@",
            hunk.old_range().start(),
            hunk.old_range().len(),
            hunk.new_range().start(),
            hunk.new_range().len()
        );
        writeln!(writer, "{}", header.paint(&range, enable_colors))?;

        for line in hunk.lines() {
            let (entry, sign, body) = match line {
                DiffLine::Delete(s) => (Some(ThemeEntry::DiffRemoved), '-', *s),
                DiffLine::Insert(s) => (Some(ThemeEntry::DiffAdded), '+', *s),
                DiffLine::Context(s) => (None, ' ', *s),
            };
            let text = format!("{}{}", sign, body.trim_end_matches(['\r', '\n']));
            match entry {
                Some(entry) => writeln!(writer, "{}", entry.paint(&text, enable_colors))?,
                None => writeln!(writer, "{}", text)?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(original: &str, stripped: &str) -> String {
        let mut buf = Vec::new();
        print_diff("src/a.py", original, stripped, &mut buf, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_diff_marks_removed_comment() {
        let out = render("x = 1  # c\ny = 2\n", "x = 1\ny = 2\n");
        assert!(out.starts_with("--- a/src/a.py\n+++ b/src/a.py\n@@ "));
        assert!(out.contains("\n-x = 1  # c\n"));
        assert!(out.contains("\n+x = 1\n"));
        assert!(out.contains("\n y = 2\n"));
    }

    #[test]
    fn test_no_output_for_identical_text() {
        assert_eq!(render("a\n", "a\n"), "");
    }
}
