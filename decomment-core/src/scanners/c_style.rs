// decomment-core/src/scanners/c_style.rs
//! Delimiter-alternation scanner for the C-style family: JavaScript,
//! TypeScript, JSX/TSX, CSS and SCSS. It is also reused for `<script>` and
//! `<style>` bodies and as the PHP fallback.
//!
//! The branches are tried in a fixed priority order at every position:
//!
//! 1. JSX comment expression `{/* ... */}` (JSX only)
//! 2. single-quoted string
//! 3. double-quoted string
//! 4. template literal
//! 5. CSS `url(...)`
//! 6. regex literal (only after a value-expecting token)
//! 7. block comment
//! 8. line comment (optional)
//! 9. hash comment (optional)
//!
//! Reordering them changes what gets stripped. Branches 2 to 6 are protected
//! content and are copied through. Branches 1 and 7 to 9 are comments.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::DecommentError;
use crate::keep::KeepDirectives;
use crate::scanners::alternation::Alternation;
use crate::span::{blank, collapse, ScanStats, Span, SpanKind};

/// Tokens after which a `/` starts a regex literal rather than a division.
const VALUE_CONTEXT_CHARS: &[u8] = b"=(,;:!&|?~^[{";
static VALUE_CONTEXT_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "return",
        "typeof",
        "instanceof",
        "case",
        "throw",
        "yield",
        "await",
        "void",
        "delete",
    ]
    .into_iter()
    .collect()
});

/// The branch of the alternation that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternationMatch {
    JsxCommentExpr,
    SingleQuoted,
    DoubleQuoted,
    TemplateLiteral,
    CssUrl,
    RegexLiteral,
    BlockComment,
    LineComment,
    HashComment,
}

impl AlternationMatch {
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            AlternationMatch::JsxCommentExpr
                | AlternationMatch::BlockComment
                | AlternationMatch::LineComment
                | AlternationMatch::HashComment
        )
    }

    fn group(self) -> &'static str {
        match self {
            AlternationMatch::JsxCommentExpr => "jsx",
            AlternationMatch::SingleQuoted => "sq",
            AlternationMatch::DoubleQuoted => "dq",
            AlternationMatch::TemplateLiteral => "tpl",
            AlternationMatch::CssUrl => "url",
            AlternationMatch::RegexLiteral => "re",
            AlternationMatch::BlockComment => "block",
            AlternationMatch::LineComment => "line",
            AlternationMatch::HashComment => "hash",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            AlternationMatch::JsxCommentExpr => {
                r"(?P<jsx>\{\s*(?:/\*(?:[^*]|\*+[^*/])*\*+/|//[^\n]*\n)\s*\})"
            }
            AlternationMatch::SingleQuoted => r"(?P<sq>'(?:\\[\s\S]|[^'\\])*')",
            AlternationMatch::DoubleQuoted => r#"(?P<dq>"(?:\\[\s\S]|[^"\\])*")"#,
            AlternationMatch::TemplateLiteral => r"(?P<tpl>`(?:\\[\s\S]|[^`\\])*`)",
            AlternationMatch::CssUrl => r"(?P<url>url\([^)]+\))",
            AlternationMatch::RegexLiteral => {
                r"(?P<re>/(?:\\.|\[(?:\\.|[^\]\\\n])*\]|[^/\\\n\[*])(?:\\.|\[(?:\\.|[^\]\\\n])*\]|[^/\\\n\[])*/[dgimsuvy]*)"
            }
            AlternationMatch::BlockComment => r"(?P<block>/\*[\s\S]*?\*/)",
            AlternationMatch::LineComment => r"(?P<line>//[^\r\n]*)",
            AlternationMatch::HashComment => r"(?P<hash>#[^\r\n]*)",
        }
    }
}

/// Which optional branches a scanner compiles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CStyleOptions {
    pub jsx: bool,
    pub line_comments: bool,
    pub hash_comments: bool,
    pub regex_literals: bool,
}

impl CStyleOptions {
    /// JavaScript and TypeScript, with or without JSX.
    pub fn script(jsx: bool) -> Self {
        Self {
            jsx,
            line_comments: true,
            hash_comments: false,
            regex_literals: true,
        }
    }

    /// CSS (`line_comments == false`) or SCSS.
    pub fn stylesheet(line_comments: bool) -> Self {
        Self {
            jsx: false,
            line_comments,
            hash_comments: false,
            regex_literals: false,
        }
    }

    /// Used for PHP when the native tokenizer is unavailable.
    pub fn php_fallback() -> Self {
        Self {
            jsx: false,
            line_comments: true,
            hash_comments: true,
            regex_literals: true,
        }
    }

    fn branches(&self) -> Vec<AlternationMatch> {
        use AlternationMatch::*;
        let mut branches = Vec::with_capacity(9);
        if self.jsx {
            branches.push(JsxCommentExpr);
        }
        branches.extend([SingleQuoted, DoubleQuoted, TemplateLiteral, CssUrl]);
        if self.regex_literals {
            branches.push(RegexLiteral);
        }
        branches.push(BlockComment);
        if self.line_comments {
            branches.push(LineComment);
        }
        if self.hash_comments {
            branches.push(HashComment);
        }
        branches
    }
}

/// A span together with the branch that produced it (`None` for plain code
/// between matches).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub span: Span,
    pub branch: Option<AlternationMatch>,
}

/// A compiled C-style scanner for one option set.
#[derive(Debug)]
pub struct CStyleScanner {
    alternation: Alternation<AlternationMatch>,
}

impl CStyleScanner {
    pub fn new(options: CStyleOptions) -> Result<Self, DecommentError> {
        let parts = options
            .branches()
            .into_iter()
            .map(|b| (b, b.group(), b.pattern().to_string()))
            .collect();
        let alternation = Alternation::build(parts, false, false).map_err(|e| {
            DecommentError::PatternCompilationError("c-style alternation".to_string(), e)
        })?;
        debug!("Built c-style scanner for {:?}", options);
        Ok(Self { alternation })
    }

    /// Partitions `text` into code, protected literals and comments.
    ///
    /// Comments matched by a keep directive come back as `Code`.
    pub fn classify(&self, text: &str, keep: &KeepDirectives) -> (Vec<Classified>, ScanStats) {
        let hits = self.alternation.find_all(text, |branch, start, _| match branch {
            AlternationMatch::RegexLiteral => expects_value(&text[..start]),
            AlternationMatch::JsxCommentExpr => accepts_jsx_expression(&text[..start]),
            // `#[` opens a PHP 8 attribute.
            AlternationMatch::HashComment => !text[start..].starts_with("#["),
            _ => true,
        });

        let mut out = Vec::with_capacity(hits.len() * 2 + 1);
        let mut stats = ScanStats::default();
        let mut last = 0;

        for hit in hits {
            if hit.start > last {
                out.push(Classified {
                    span: Span::new(last, hit.start, SpanKind::Code),
                    branch: None,
                });
            }

            let kind = if hit.tag.is_comment() {
                let raw = &text[hit.start..hit.end];
                let candidate = if hit.tag == AlternationMatch::JsxCommentExpr {
                    jsx_inner(raw)
                } else {
                    raw
                };
                let kept = keep.matches(candidate);
                stats.record(kept);
                if kept {
                    SpanKind::Code
                } else {
                    SpanKind::Comment
                }
            } else {
                SpanKind::String
            };

            out.push(Classified {
                span: Span::new(hit.start, hit.end, kind),
                branch: Some(hit.tag),
            });
            last = hit.end;
        }

        if last < text.len() {
            out.push(Classified {
                span: Span::new(last, text.len(), SpanKind::Code),
                branch: None,
            });
        }

        (out, stats)
    }

    /// The span partition of `text`, without branch information.
    pub fn spans(&self, text: &str, keep: &KeepDirectives) -> Vec<Span> {
        self.classify(text, keep).0.into_iter().map(|c| c.span).collect()
    }

    /// Removes comments: JSX comment expressions are deleted (line breaks
    /// kept), every other comment is blanked with spaces.
    pub fn scan(&self, text: &str, keep: &KeepDirectives) -> (String, ScanStats) {
        let (classified, stats) = self.classify(text, keep);
        let mut out = String::with_capacity(text.len());

        for c in classified {
            let slice = c.span.slice(text);
            match (c.span.kind, c.branch) {
                (SpanKind::Comment, Some(AlternationMatch::JsxCommentExpr)) => {
                    out.push_str(&collapse(slice))
                }
                (SpanKind::Comment, _) => out.push_str(&blank(slice)),
                _ => out.push_str(slice),
            }
        }

        (out, stats)
    }
}

/// The comment inside a JSX expression: braces and padding removed.
fn jsx_inner(raw: &str) -> &str {
    let inner = raw.strip_prefix('{').unwrap_or(raw);
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    inner.trim()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Whether a `/` following `before` starts a regex literal.
///
/// A heuristic: only operators, opening brackets and a few keywords are
/// treated as expecting a value. Anything else reads as division.
fn expects_value(before: &str) -> bool {
    let trimmed = before.trim_end();
    let last = match trimmed.as_bytes().last() {
        Some(&b) => b,
        None => return false,
    };
    if VALUE_CONTEXT_CHARS.contains(&last) {
        return true;
    }
    let word_start = trimmed
        .bytes()
        .rposition(|b| !is_ident_byte(b))
        .map_or(0, |i| i + 1);
    VALUE_CONTEXT_KEYWORDS.contains(&trimmed[word_start..])
        && !trimmed[..word_start].ends_with('.')
}

/// Whether a `{` following `before` can open a JSX child expression.
///
/// JSX children follow a tag (`>`), another expression (`}`) or a run of
/// text after a tag. An arrow (`=>`) or a generic argument list
/// (`Promise<void>`) means the brace opens a code block, which must keep its
/// braces.
fn accepts_jsx_expression(before: &str) -> bool {
    let trimmed = before.trim_end();
    match trimmed.as_bytes().last() {
        Some(b'}') => true,
        Some(b'>') => closes_tag(trimmed),
        Some(_) => follows_jsx_text(trimmed),
        None => false,
    }
}

/// `trimmed` ends with the `>` of an opening, closing or self-closing tag.
fn closes_tag(trimmed: &str) -> bool {
    let head = &trimmed[..trimmed.len() - 1];
    if head.ends_with('=') {
        return false;
    }
    if head.ends_with('/') {
        // self-closing tag
        return true;
    }
    match head.rfind('<') {
        Some(i) if head[i + 1..].starts_with('/') => true,
        Some(i) => !head[..i].as_bytes().last().map_or(false, |&b| is_ident_byte(b)),
        None => false,
    }
}

/// Text such as `<p>Hello {` where the last delimiter is a closing tag and
/// nothing in between reads as an expression.
fn follows_jsx_text(trimmed: &str) -> bool {
    let Some(i) = trimmed.rfind(['<', '>', '{', '}', ';']) else {
        return false;
    };
    let text = &trimmed[i + 1..];
    trimmed.as_bytes()[i] == b'>'
        && !text.contains(['=', '(', ')', '&', '|', '?'])
        && closes_tag(&trimmed[..=i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js() -> CStyleScanner {
        CStyleScanner::new(CStyleOptions::script(false)).unwrap()
    }

    fn jsx() -> CStyleScanner {
        CStyleScanner::new(CStyleOptions::script(true)).unwrap()
    }

    fn strip(scanner: &CStyleScanner, text: &str) -> String {
        scanner.scan(text, &KeepDirectives::empty()).0
    }

    #[test]
    fn test_regex_literal_after_return_is_protected() {
        let src = "return /abc/g;";
        assert_eq!(strip(&js(), src), src);
        let (classified, _) = js().classify(src, &KeepDirectives::empty());
        assert!(classified
            .iter()
            .any(|c| c.branch == Some(AlternationMatch::RegexLiteral) && c.span.slice(src) == "/abc/g"));
    }

    #[test]
    fn test_division_is_not_a_regex() {
        assert_eq!(strip(&js(), "a / b // trailing"), "a / b            ");
    }

    #[test]
    fn test_chained_division() {
        let src = "const r = total / count / 2; // avg\n";
        assert_eq!(strip(&js(), src), "const r = total / count / 2;       \n");
    }

    #[test]
    fn test_block_comment_shaped_regex_is_untouched() {
        let src = "const re = /[/*]/;\nconst x = 1; /* gone */\n";
        assert_eq!(strip(&js(), src), "const re = /[/*]/;\nconst x = 1;           \n");
    }

    #[test]
    fn test_escaped_slash_in_regex() {
        let src = "const regex = /pattern\\/\\//g;";
        assert_eq!(strip(&js(), src), src);
    }

    #[test]
    fn test_strings_with_comment_markers_survive() {
        let src = r#"const a = "/* x */"; const b = '// y'; const c = `/* t */`;"#;
        assert_eq!(strip(&js(), src), src);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let src = r#"const s = "say \"hi\" // not a comment"; // real"#;
        assert_eq!(
            strip(&js(), src),
            r#"const s = "say \"hi\" // not a comment";        "#
        );
    }

    #[test]
    fn test_template_literal_spans_lines() {
        let src = "const t = `\n  <!-- x -->\n  // nope\n`;\n";
        assert_eq!(strip(&js(), src), src);
    }

    #[test]
    fn test_multiline_block_comment_keeps_lines() {
        let src = "a();\n/* one\n   two */\nb();\n";
        let out = strip(&js(), src);
        assert_eq!(out, "a();\n      \n         \nb();\n");
        assert_eq!(out.matches('\n').count(), src.matches('\n').count());
    }

    #[test]
    fn test_crlf_preserved() {
        let src = "x(); // c\r\ny();\r\n";
        assert_eq!(strip(&js(), src), "x();     \r\ny();\r\n");
    }

    #[test]
    fn test_css_url_is_protected() {
        let css = CStyleScanner::new(CStyleOptions::stylesheet(false)).unwrap();
        let src = ".a { background: url(http://example.com/a.png); } /* c */";
        assert_eq!(
            strip(&css, src),
            ".a { background: url(http://example.com/a.png); }        "
        );
    }

    #[test]
    fn test_css_has_no_line_comments() {
        let css = CStyleScanner::new(CStyleOptions::stylesheet(false)).unwrap();
        let src = ".b { color: red; } // inline\n";
        assert_eq!(strip(&css, src), src);
    }

    #[test]
    fn test_scss_line_comments() {
        let scss = CStyleScanner::new(CStyleOptions::stylesheet(true)).unwrap();
        assert_eq!(strip(&scss, "$a: 1; // x"), "$a: 1;     ");
    }

    #[test]
    fn test_hash_comments_only_when_enabled() {
        let php = CStyleScanner::new(CStyleOptions::php_fallback()).unwrap();
        assert_eq!(strip(&php, "$a = 1; # note\n"), "$a = 1;       \n");
        assert_eq!(strip(&js(), "a = 1; # note\n"), "a = 1; # note\n");
    }

    #[test]
    fn test_php_attribute_is_not_a_hash_comment() {
        let php = CStyleScanner::new(CStyleOptions::php_fallback()).unwrap();
        let src = "<?php\n#[Route('/home')]\nfunction home() {}\n#[Override] # c\n#\n";
        assert_eq!(
            strip(&php, src),
            "<?php\n#[Route('/home')]\nfunction home() {}\n#[Override]    \n \n"
        );
    }

    #[test]
    fn test_jsx_comment_expression_removed_whole() {
        assert_eq!(strip(&jsx(), "<div>{/* note */}</div>"), "<div></div>");
    }

    #[test]
    fn test_jsx_multiline_expression_keeps_line_count() {
        let src = "<div>\n  {/*\n    a\n  */}\n</div>\n";
        let out = strip(&jsx(), src);
        assert_eq!(out, "<div>\n  \n\n\n</div>\n");
    }

    #[test]
    fn test_jsx_line_comment_expression() {
        let src = "<span>{ // line\n}</span>";
        assert_eq!(strip(&jsx(), src), "<span>\n</span>");
    }

    #[test]
    fn test_jsx_arrow_body_keeps_braces() {
        let src = "const noop = () => { /* nothing */ };";
        assert_eq!(strip(&jsx(), src), "const noop = () => {               };");
    }

    #[test]
    fn test_jsx_generic_return_type_keeps_braces() {
        let src = "function f(): Promise<void> { /* todo */ }";
        assert_eq!(strip(&jsx(), src), "function f(): Promise<void> {            }");
    }

    #[test]
    fn test_jsx_after_closing_tag() {
        let src = "<b>x</b>{/* c */}";
        assert_eq!(strip(&jsx(), src), "<b>x</b>");
    }

    #[test]
    fn test_jsx_comment_does_not_swallow_following_code() {
        let src = "<div>{/* note */ value}\n  <span>{x /* trailing */}</span>\n</div>\n";
        let expected = format!(
            "<div>{{{} value}}\n  <span>{{x {}}}</span>\n</div>\n",
            " ".repeat(10),
            " ".repeat(14)
        );
        assert_eq!(strip(&jsx(), src), expected);
    }

    #[test]
    fn test_jsx_line_comment_does_not_end_at_inner_brace() {
        let src = "<a>{ // see } here\n}</a>";
        assert_eq!(strip(&jsx(), src), "<a>\n</a>");
        let code = "<a>{ // x }\n  y}</a>";
        assert_eq!(strip(&jsx(), code), format!("<a>{{ {}\n  y}}</a>", " ".repeat(6)));
    }

    #[test]
    fn test_jsx_comment_after_text() {
        assert_eq!(strip(&jsx(), "<p>Hello {/* c */}</p>"), "<p>Hello </p>");
        assert_eq!(strip(&jsx(), "<p>Hi, there {/* c */}</p>"), "<p>Hi, there </p>");
    }

    #[test]
    fn test_code_after_comparison_keeps_braces() {
        let src = "if (a > b) { /* c */ }";
        assert_eq!(strip(&jsx(), src), "if (a > b) {         }");
        let src = "class A extends B<T> implements C { /* c */ }";
        assert_eq!(strip(&jsx(), src), "class A extends B<T> implements C {         }");
    }

    #[test]
    fn test_jsx_inline_comment_inside_expression() {
        let src = "{value /* inline */}";
        assert_eq!(strip(&jsx(), src), "{value             }");
    }

    #[test]
    fn test_jsx_branch_absent_outside_jsx() {
        let src = "<div>{/* note */}</div>";
        assert_eq!(strip(&js(), src), "<div>{          }</div>");
    }

    #[test]
    fn test_keep_directive_on_jsx_tests_inner_comment() {
        let keep = KeepDirectives::compile(&[r"^/\* keep"]).unwrap();
        let src = "<div>{ /* keep me */ }</div>";
        let (out, stats) = jsx().scan(src, &keep);
        assert_eq!(out, src);
        assert_eq!(stats.comments_kept, 1);
        assert_eq!(stats.comments_removed, 0);
    }

    #[test]
    fn test_keep_directive_block_comment() {
        let keep = KeepDirectives::compile(&["@license"]).unwrap();
        let src = "/* @license MIT */\n/* other */\n";
        let (out, stats) = js().scan(src, &keep);
        assert_eq!(out, "/* @license MIT */\n           \n");
        assert_eq!(stats, ScanStats { comments_removed: 1, comments_kept: 1 });
    }

    #[test]
    fn test_spans_cover_text() {
        let src = "let a = 'x'; // c\nlet b = /r/;";
        let spans = js().spans(src, &KeepDirectives::empty());
        let mut pos = 0;
        for span in &spans {
            assert_eq!(span.start, pos);
            pos = span.end;
        }
        assert_eq!(pos, src.len());
        assert!(spans.iter().any(|s| s.kind == SpanKind::Comment));
        assert_eq!(spans.iter().filter(|s| s.kind == SpanKind::String).count(), 2);
    }

    #[test]
    fn test_unterminated_block_comment_left_alone() {
        let src = "a(); /* never closed\nb();";
        assert_eq!(strip(&js(), src), src);
    }

    #[test]
    fn test_idempotent() {
        let src = "const s = '//'; /* a */ x = y / z; // q\nreturn /re/;\n";
        let once = strip(&js(), src);
        assert_eq!(strip(&js(), &once), once);
    }

    #[test]
    fn test_expects_value_contexts() {
        assert!(expects_value("x = "));
        assert!(expects_value("  return"));
        assert!(expects_value("if ("));
        assert!(!expects_value("a "));
        assert!(!expects_value("foo.return"));
        assert!(!expects_value("xreturn"));
        assert!(!expects_value(""));
    }
}
