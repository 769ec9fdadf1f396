// decomment-core/src/scanners/markup.rs
//! Embedded-block dispatcher for HTML, Blade and Jinja templates.
//!
//! Markup itself is copied through. The dispatcher finds the regions that
//! carry another grammar (`<script>`, `<style>`, Blade `@php`) and re-scans
//! their inner text, keeps `@verbatim` regions untouched, and blanks
//! template and HTML comments. Open and close delimiters are never changed.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::delegate::PhpDelegate;
use crate::errors::DecommentError;
use crate::grammar::MarkupVariant;
use crate::keep::KeepDirectives;
use crate::scanners::alternation::Alternation;
use crate::scanners::c_style::CStyleScanner;
use crate::span::{blank, ScanStats, Span, SpanKind};

/// Prepended to `@php` bodies so the PHP tokenizer lexes them as code.
const PHP_OPEN_TAG: &str = "<?php ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Script,
    Style,
    Verbatim,
    Php,
    BladeComment,
    HtmlComment,
}

impl Branch {
    fn open_group(self) -> &'static str {
        match self {
            Branch::Script => "script_open",
            Branch::Style => "style_open",
            Branch::Verbatim => "verbatim_open",
            Branch::Php => "php_open",
            Branch::BladeComment => "blade_comment",
            Branch::HtmlComment => "html_comment",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Branch::Script => {
                r"(?P<script_open><script\b[^>]*>)(?P<script_body>.*?)(?P<script_close></script\s*>)"
            }
            Branch::Style => {
                r"(?P<style_open><style\b[^>]*>)(?P<style_body>.*?)(?P<style_close></style\s*>)"
            }
            Branch::Verbatim => {
                r"(?P<verbatim_open>@verbatim\b)(?P<verbatim_body>.*?)(?P<verbatim_close>@endverbatim\b)"
            }
            Branch::Php => r"(?P<php_open>@php\b)(?P<php_body>.*?)(?P<php_close>@endphp\b)",
            Branch::BladeComment => r"(?P<blade_comment>\{\{--.*?--\}\})",
            Branch::HtmlComment => r"(?P<html_comment><!--.*?-->)",
        }
    }

    /// Group names of the (open, body, close) triple for block branches.
    fn block_groups(self) -> Option<(&'static str, &'static str, &'static str)> {
        match self {
            Branch::Script => Some(("script_open", "script_body", "script_close")),
            Branch::Style => Some(("style_open", "style_body", "style_close")),
            Branch::Verbatim => Some(("verbatim_open", "verbatim_body", "verbatim_close")),
            Branch::Php => Some(("php_open", "php_body", "php_close")),
            Branch::BladeComment | Branch::HtmlComment => None,
        }
    }

    fn inner_grammar(self) -> Option<InnerGrammar> {
        match self {
            Branch::Script => Some(InnerGrammar::Script),
            Branch::Style => Some(InnerGrammar::Style),
            Branch::Verbatim => Some(InnerGrammar::Verbatim),
            Branch::Php => Some(InnerGrammar::Php),
            Branch::BladeComment | Branch::HtmlComment => None,
        }
    }
}

/// The grammar applied to the inner span of an embedded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InnerGrammar {
    /// C-style with line comments and regex literals.
    Script,
    /// C-style with block comments only.
    Style,
    /// The PHP delegate, with the C-style PHP fallback.
    Php,
    /// Left byte-for-byte unchanged.
    Verbatim,
}

/// A region of markup governed by another grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedBlock {
    pub outer_open: Span,
    pub inner_span: Span,
    pub outer_close: Span,
    pub inner_grammar: InnerGrammar,
}

#[derive(Debug)]
enum Segment {
    Block(EmbeddedBlock),
    Comment(Span),
}

/// The scanners and delegate used for inner spans.
#[derive(Clone, Copy)]
pub struct EmbeddedScanners<'a> {
    pub script: &'a CStyleScanner,
    pub style: &'a CStyleScanner,
    pub php_fallback: &'a CStyleScanner,
    pub delegate: &'a dyn PhpDelegate,
}

#[derive(Debug)]
pub struct MarkupDispatcher {
    html: Alternation<Branch>,
    blade: Alternation<Branch>,
    jinja_comment: Regex,
}

fn build_alternation(branches: &[Branch]) -> Result<Alternation<Branch>, DecommentError> {
    let parts = branches
        .iter()
        .map(|&b| (b, b.open_group(), b.pattern().to_string()))
        .collect();
    Alternation::build(parts, true, true).map_err(|e| {
        DecommentError::PatternCompilationError("markup alternation".to_string(), e)
    })
}

/// `<!--[if IE]>` and `<!--<![endif]-->` style comments carry markup for old
/// browsers and must survive.
fn is_conditional_comment(raw: &str) -> bool {
    let body = raw.strip_prefix("<!--").unwrap_or(raw).trim_start();
    let lower = body.get(..9).unwrap_or(body).to_ascii_lowercase();
    lower.starts_with("[if ") || lower.starts_with("<![endif]")
}

/// `@php($x = 1)` is a one-line expression, not a block.
fn is_inline_php(after_open: &str) -> bool {
    after_open.trim_start().starts_with('(')
}

impl MarkupDispatcher {
    pub fn new() -> Result<Self, DecommentError> {
        use Branch::*;
        let html = build_alternation(&[Script, Style, HtmlComment])?;
        let blade = build_alternation(&[Script, Style, Verbatim, Php, BladeComment, HtmlComment])?;
        let jinja_comment = RegexBuilder::new(r"\{#.*?#\}")
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| DecommentError::PatternCompilationError("jinja comment".to_string(), e))?;
        Ok(Self {
            html,
            blade,
            jinja_comment,
        })
    }

    fn segments(&self, text: &str, variant: MarkupVariant) -> Vec<Segment> {
        let alternation = match variant {
            MarkupVariant::Blade => &self.blade,
            MarkupVariant::Html | MarkupVariant::Jinja => &self.html,
        };

        let hits = alternation.find_all(text, |branch, start, caps| match branch {
            Branch::HtmlComment => caps
                .get(0)
                .map_or(true, |m| !is_conditional_comment(&text[start..m.end()])),
            Branch::Php => caps
                .name("php_open")
                .map_or(true, |m| !is_inline_php(&text[m.end()..])),
            _ => true,
        });

        hits.into_iter()
            .filter_map(|hit| match (hit.tag.block_groups(), hit.tag.inner_grammar()) {
                (Some((open, body, close)), Some(inner_grammar)) => {
                    let span_of = |group: &str, kind: SpanKind| {
                        hit.caps
                            .name(group)
                            .map(|m| Span::new(m.start(), m.end(), kind))
                    };
                    Some(Segment::Block(EmbeddedBlock {
                        outer_open: span_of(open, SpanKind::EmbeddedBlockOuter)?,
                        inner_span: span_of(body, SpanKind::Code)?,
                        outer_close: span_of(close, SpanKind::EmbeddedBlockOuter)?,
                        inner_grammar,
                    }))
                }
                _ => Some(Segment::Comment(Span::new(hit.start, hit.end, SpanKind::Comment))),
            })
            .collect()
    }

    /// The embedded blocks of `text`, in document order.
    pub fn blocks(&self, text: &str, variant: MarkupVariant) -> Vec<EmbeddedBlock> {
        self.segments(text, variant)
            .into_iter()
            .filter_map(|s| match s {
                Segment::Block(block) => Some(block),
                Segment::Comment(_) => None,
            })
            .collect()
    }

    pub fn scan(
        &self,
        text: &str,
        variant: MarkupVariant,
        keep: &KeepDirectives,
        scanners: EmbeddedScanners<'_>,
    ) -> (String, ScanStats) {
        let mut out = String::with_capacity(text.len());
        let mut stats = ScanStats::default();
        let mut last = 0;

        for segment in self.segments(text, variant) {
            match segment {
                Segment::Comment(span) => {
                    out.push_str(&text[last..span.start]);
                    let raw = span.slice(text);
                    let kept = keep.matches(raw);
                    stats.record(kept);
                    if kept {
                        out.push_str(raw);
                    } else {
                        out.push_str(&blank(raw));
                    }
                    last = span.end;
                }
                Segment::Block(block) => {
                    out.push_str(&text[last..block.inner_span.start]);
                    let inner = block.inner_span.slice(text);
                    let (rewritten, inner_stats) =
                        self.scan_inner(inner, block.inner_grammar, keep, scanners);
                    stats.merge(inner_stats);
                    out.push_str(&rewritten);
                    out.push_str(&text[block.inner_span.end..block.outer_close.end]);
                    last = block.outer_close.end;
                }
            }
        }
        out.push_str(&text[last..]);

        if variant == MarkupVariant::Jinja {
            let (jinja, jinja_stats) = self.blank_jinja_comments(&out, keep);
            stats.merge(jinja_stats);
            out = jinja;
        }

        (out, stats)
    }

    fn scan_inner(
        &self,
        inner: &str,
        grammar: InnerGrammar,
        keep: &KeepDirectives,
        scanners: EmbeddedScanners<'_>,
    ) -> (String, ScanStats) {
        match grammar {
            InnerGrammar::Script => scanners.script.scan(inner, keep),
            InnerGrammar::Style => scanners.style.scan(inner, keep),
            InnerGrammar::Verbatim => (inner.to_string(), ScanStats::default()),
            InnerGrammar::Php => strip_php_block(inner, keep, scanners),
        }
    }

    fn blank_jinja_comments(&self, text: &str, keep: &KeepDirectives) -> (String, ScanStats) {
        let mut stats = ScanStats::default();
        let out = self.jinja_comment.replace_all(text, |caps: &regex::Captures| {
            let raw = &caps[0];
            let kept = keep.matches(raw);
            stats.record(kept);
            if kept {
                raw.to_string()
            } else {
                blank(raw)
            }
        });
        (out.into_owned(), stats)
    }
}

/// Runs a Blade `@php` body through the delegate, falling back to the
/// C-style scanner. Counts always come from the C-style classification.
fn strip_php_block(
    inner: &str,
    keep: &KeepDirectives,
    scanners: EmbeddedScanners<'_>,
) -> (String, ScanStats) {
    let (fallback, stats) = scanners.php_fallback.scan(inner, keep);
    let framed = format!("{}{}", PHP_OPEN_TAG, inner);

    match scanners.delegate.strip(&framed, &keep.patterns()) {
        Ok(reply) => match reply.strip_prefix(PHP_OPEN_TAG) {
            Some(stripped) => return (stripped.to_string(), stats),
            None => debug!("PHP delegate reply lost the open tag; using fallback scanner."),
        },
        Err(e) => debug!("PHP delegate unavailable for @php block ({}); using fallback scanner.", e),
    }
    (fallback, stats)
}
