// decomment-core/src/scanners/python.rs
//! Line-oriented quote/comment state machine for Python.
//!
//! This is the degraded path: it runs when the tokenizer in
//! [`crate::scanners::python_tokens`] rejects the input. It only knows about
//! quotes, escapes and `#`, which is enough to never touch string content,
//! but it keeps a whole line whenever a keep directive matches its comment.
//!
//! License: MIT OR APACHE 2.0

use crate::keep::KeepDirectives;
use crate::span::ScanStats;

/// The kind of triple quote currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleQuote {
    /// `'''`
    Single,
    /// `"""`
    Double,
}

impl TripleQuote {
    fn delimiter(self) -> &'static [u8] {
        match self {
            TripleQuote::Single => b"'''",
            TripleQuote::Double => b"\"\"\"",
        }
    }
}

/// Scanner state. At most one quote kind is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexState {
    pub in_single_quote: bool,
    pub in_double_quote: bool,
    /// Carried across lines; everything else resets at a line break.
    pub in_triple_quote: Option<TripleQuote>,
    pub pending_escape: bool,
}

impl LexState {
    fn start_line(&mut self) {
        self.in_single_quote = false;
        self.in_double_quote = false;
        self.pending_escape = false;
    }

    /// Feeds one line (without its terminator) and returns the byte offset of
    /// the first unquoted `#`, if any. Scanning stops at that offset.
    pub fn feed_line(&mut self, line: &str) -> Option<usize> {
        self.start_line();
        let bytes = line.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];

            if let Some(triple) = self.in_triple_quote {
                if self.pending_escape {
                    self.pending_escape = false;
                } else if b == b'\\' {
                    self.pending_escape = true;
                } else if bytes[i..].starts_with(triple.delimiter()) {
                    self.in_triple_quote = None;
                    i += 3;
                    continue;
                }
                i += 1;
                continue;
            }

            if self.pending_escape {
                self.pending_escape = false;
                i += 1;
                continue;
            }

            if self.in_single_quote || self.in_double_quote {
                match b {
                    b'\\' => self.pending_escape = true,
                    b'\'' if self.in_single_quote => self.in_single_quote = false,
                    b'"' if self.in_double_quote => self.in_double_quote = false,
                    _ => {}
                }
                i += 1;
                continue;
            }

            if bytes[i..].starts_with(TripleQuote::Double.delimiter()) {
                self.in_triple_quote = Some(TripleQuote::Double);
                i += 3;
                continue;
            }
            if bytes[i..].starts_with(TripleQuote::Single.delimiter()) {
                self.in_triple_quote = Some(TripleQuote::Single);
                i += 3;
                continue;
            }

            match b {
                b'\'' => self.in_single_quote = true,
                b'"' => self.in_double_quote = true,
                b'#' => return Some(i),
                _ => {}
            }
            i += 1;
        }

        None
    }
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Strips `#` comments line by line.
///
/// A removed comment takes the trailing whitespace of its line with it. An
/// unterminated triple quote keeps the rest of the file quoted.
pub fn scan(text: &str, keep: &KeepDirectives) -> (String, ScanStats) {
    let mut state = LexState::default();
    let mut stats = ScanStats::default();
    let mut out = String::with_capacity(text.len());

    for (index, raw) in text.split_inclusive('\n').enumerate() {
        let (line, terminator) = split_terminator(raw);
        match state.feed_line(line) {
            Some(0) if index == 0 && line.starts_with("#!") => {
                stats.record(true);
                out.push_str(raw);
            }
            Some(hash) if keep.matches(&line[hash..]) => {
                stats.record(true);
                out.push_str(raw);
            }
            Some(hash) => {
                stats.record(false);
                out.push_str(line[..hash].trim_end());
                out.push_str(terminator);
            }
            None => out.push_str(raw),
        }
    }

    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(text: &str) -> String {
        scan(text, &KeepDirectives::empty()).0
    }

    #[test]
    fn test_inline_comment_removed() {
        assert_eq!(strip("x = 1  # inline"), "x = 1");
        assert_eq!(strip("x = 1  # inline\ny = 2\n"), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_hash_inside_string_untouched() {
        let src = "s = \"Hello # world\"\n";
        assert_eq!(strip(src), src);
        let src = "s = 'it\\'s # fine'  # gone\n";
        assert_eq!(strip(src), "s = 'it\\'s # fine'\n");
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let src = "doc = \"\"\"\n# not a comment\n\"\"\"  # real\n";
        assert_eq!(strip(src), "doc = \"\"\"\n# not a comment\n\"\"\"\n");
    }

    #[test]
    fn test_single_quote_triple() {
        let src = "x = '''a\n# b\n'''\n# c\n";
        assert_eq!(strip(src), "x = '''a\n# b\n'''\n\n");
    }

    #[test]
    fn test_keep_directive_keeps_line() {
        let keep = KeepDirectives::compile(&["noqa"]).unwrap();
        let (out, stats) = scan("x = 1  # noqa: E501\ny = 2  # drop\n", &keep);
        assert_eq!(out, "x = 1  # noqa: E501\ny = 2\n");
        assert_eq!(stats, ScanStats { comments_removed: 1, comments_kept: 1 });
    }

    #[test]
    fn test_shebang_kept() {
        assert_eq!(strip("#!/usr/bin/python\n#!x\n"), "#!/usr/bin/python\n\n");
    }

    #[test]
    fn test_crlf_terminator_reattached() {
        assert_eq!(strip("a = 1 # c\r\nb = 2\r\n"), "a = 1\r\nb = 2\r\n");
    }

    #[test]
    fn test_unterminated_triple_quote_stays_open() {
        let src = "x = \"\"\"never closed\n# still text\n";
        assert_eq!(strip(src), src);
    }

    #[test]
    fn test_bare_quote_resets_at_line_end() {
        let src = "broken = 'oops\ny = 3  # c\n";
        assert_eq!(strip(src), "broken = 'oops\ny = 3\n");
    }

    #[test]
    fn test_escaped_triple_delimiter_does_not_close() {
        let src = "s = \"\"\"a \\\"\"\" b\n# in string\n\"\"\"\n";
        assert_eq!(strip(src), src);
    }

    #[test]
    fn test_idempotent() {
        let src = "a = '#'  # one\n\"\"\"\n# doc\n\"\"\"\nb = 2 # two\n";
        let once = strip(src);
        assert_eq!(strip(&once), once);
    }
}
