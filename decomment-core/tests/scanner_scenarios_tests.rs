// decomment-core/tests/scanner_scenarios_tests.rs
//! End-to-end behaviour of the lexical engine across grammar families.

use anyhow::Result;

use decomment_core::{
    CommentEngine, GrammarFamily, KeepDirectives, LexicalEngine, MarkupVariant, ScanStats,
};

const JS: GrammarFamily = GrammarFamily::Script { jsx: false };
const JSX: GrammarFamily = GrammarFamily::Script { jsx: true };
const CSS: GrammarFamily = GrammarFamily::Stylesheet { line_comments: false };
const BLADE: GrammarFamily = GrammarFamily::Markup(MarkupVariant::Blade);
const JINJA: GrammarFamily = GrammarFamily::Markup(MarkupVariant::Jinja);

fn engine() -> LexicalEngine {
    LexicalEngine::without_php(KeepDirectives::empty()).unwrap()
}

fn strip(content: &str, family: GrammarFamily) -> String {
    engine().strip(content, family).unwrap().text
}

const PYTHON_SAMPLE: &str = r#"#!/usr/bin/env python3
"""Module docstring # with a hash."""

x = 1  # inline comment
s1 = "Hello # world"
s2 = 'Hello # world'
s3 = """
# This is NOT a comment
"""
f1 = f"Value: {name} # not a comment"
r1 = r"C:\path\to\file # not a comment"
escaped = "test \"value\" # not comment"
d = {"key#1": "value"}  # trailing
long_str = "line1 " \
           "line2"  # comment
final = "value"  # last comment"#;

const JS_SAMPLE: &str = r#"// header
let x = 1; // inline comment
let s1 = "http://example.com";
let s3 = "/* not a comment */";
let s5 = `template with // not comment`;
let r2 = /pattern\/with\/slashes/i;
let r3 = /pattern/; // regex comment
function test() {
    return /pattern/gi; // return regex
}
let div1 = a / b / 2;
let u1 = "Hello 世界 // not comment";
let e2 = 'test \'value\' // not comment';
let ml = "line1 \
line2"; // comment
/*
 * Multi-line block
 */
"#;

const BLADE_SAMPLE: &str = r#"{{-- blade comment --}}
@php
    $b = 2; // php comment in blade
    $c = 3; /* php block comment in blade */
@endphp
@verbatim
    {{-- this shouldn't be stripped because verbatim --}}
@endverbatim

<script>
    const obj = { "key//1": "value", "key/*2*/": "value" };
    const tpl = `
        <!-- not an html comment -->
    `;
    const regex = /pattern\/\//g;
    const a = 1 / 2; // this is a comment
</script>

<style>
    .a { background: url(http://example.com/a.png); }
    /* this is a comment */
</style>

<!--[if IE]><p>IE only</p><![endif]-->
<!-- normal html comment -->
"#;

#[test]
fn test_python_scenarios() {
    let out = strip(PYTHON_SAMPLE, GrammarFamily::Python);
    assert!(out.starts_with("#!/usr/bin/env python3\n"));
    assert!(out.contains("\nx = 1\n"));
    assert!(out.contains(r#"s1 = "Hello # world""#));
    assert!(out.contains("# This is NOT a comment"));
    assert!(out.contains(r#"r1 = r"C:\path\to\file # not a comment""#));
    assert!(out.contains("d = {\"key#1\": \"value\"}\n"));
    assert!(out.contains("           \"line2\"\n"));
    assert!(out.ends_with("final = \"value\""));
    assert!(!out.contains("inline comment"));
}

#[test]
fn test_python_keep_directive() -> Result<()> {
    let engine = LexicalEngine::without_php(KeepDirectives::compile(&["noqa"])?)?;
    let outcome = engine.strip("import os  # noqa: F401\nx = 1  # drop\n", GrammarFamily::Python)?;
    assert_eq!(outcome.text, "import os  # noqa: F401\nx = 1\n");
    assert_eq!(
        outcome.stats,
        ScanStats {
            comments_removed: 1,
            comments_kept: 1
        }
    );
    Ok(())
}

#[test]
fn test_js_strings_and_regexes_survive() {
    let out = strip(JS_SAMPLE, JS);
    for protected in [
        r#""http://example.com""#,
        r#""/* not a comment */""#,
        "`template with // not comment`",
        r"/pattern\/with\/slashes/i",
        "/pattern/gi;",
        "a / b / 2;",
        r#""Hello 世界 // not comment""#,
        r"'test \'value\' // not comment'",
    ] {
        assert!(out.contains(protected), "lost {:?} in:\n{}", protected, out);
    }
    for removed in ["header", "inline comment", "regex comment", "return regex", "Multi-line"] {
        assert!(!out.contains(removed), "kept {:?} in:\n{}", removed, out);
    }
}

#[test]
fn test_blanking_preserves_line_count() {
    for (src, family) in [(JS_SAMPLE, JS), (BLADE_SAMPLE, BLADE)] {
        let out = strip(src, family);
        assert_eq!(out.lines().count(), src.lines().count());
    }
}

#[test]
fn test_blade_sample() {
    let out = strip(BLADE_SAMPLE, BLADE);
    assert!(!out.contains("blade comment --}}"));
    assert!(!out.contains("php comment in blade"));
    assert!(!out.contains("php block comment"));
    assert!(out.contains("$b = 2;"));
    assert!(out.contains("{{-- this shouldn't be stripped because verbatim --}}"));
    assert!(out.contains(r#""key//1": "value", "key/*2*/": "value""#));
    assert!(out.contains("<!-- not an html comment -->"));
    assert!(out.contains(r"/pattern\/\//g"));
    assert!(!out.contains("this is a comment"));
    assert!(out.contains("url(http://example.com/a.png)"));
    assert!(out.contains("<!--[if IE]><p>IE only</p><![endif]-->"));
    assert!(!out.contains("normal html comment"));
}

#[test]
fn test_jsx_expressions() {
    let src = "<div>\n    {/* note */}\n    <span>{/* between */}</span>\n    {value /* inline */}\n</div>\n";
    let out = strip(src, JSX);
    assert_eq!(
        out,
        "<div>\n    \n    <span></span>\n    {value             }\n</div>\n"
    );
}

#[test]
fn test_jsx_arrow_block_keeps_braces() {
    let src = "<button onClick={() => {\n    // Handler comment\n    go();\n}}>x</button>\n";
    let out = strip(src, JSX);
    assert!(out.starts_with("<button onClick={() => {\n"));
    assert!(out.contains("    go();\n}}>x</button>"));
    assert!(!out.contains("Handler"));
}

#[test]
fn test_css_keeps_double_slash() {
    let src = ".b { color: red; } // not a css comment\n/* gone */\n";
    assert_eq!(strip(src, CSS), ".b { color: red; } // not a css comment\n          \n");
}

#[test]
fn test_jinja_comment_pass() {
    let out = strip("{# a #}<p>{{ x }}</p><!-- b -->\n", JINJA);
    assert_eq!(out, "       <p>{{ x }}</p>          \n");
}

#[test]
fn test_every_family_is_idempotent() {
    let samples = [
        (PYTHON_SAMPLE, GrammarFamily::Python),
        (JS_SAMPLE, JS),
        (BLADE_SAMPLE, BLADE),
        ("<a>{/* c */}</a> // d\n", JSX),
        ("<?php # a\n$x = '#'; // b\n", GrammarFamily::Php),
        ("{# a #}<!-- b -->", JINJA),
    ];
    for (src, family) in samples {
        let once = strip(src, family);
        assert_eq!(strip(&once, family), once, "not idempotent for {}", family);
    }
}

#[test]
fn test_jsx_comment_stops_at_its_own_terminator() {
    let src = "<div>{/* note */ value}\n  <span>{x /* trailing */}</span>\n</div>\n";
    let out = strip(src, JSX);
    assert!(out.contains(" value}\n  <span>{x "), "{}", out);
    assert!(out.ends_with("}</span>\n</div>\n"), "{}", out);
    assert!(!out.contains("note") && !out.contains("trailing"), "{}", out);
}

#[test]
fn test_jsx_comment_after_text() {
    assert_eq!(strip("<p>Hello {/* c */}</p>\n", JSX), "<p>Hello </p>\n");
}

#[test]
fn test_php_fallback_keeps_attributes() -> Result<()> {
    let src = "<?php\n#[Route('/home')]\nfunction home() {} # c\n";
    let outcome = engine().strip(src, GrammarFamily::Php)?;
    assert!(outcome.used_fallback);
    assert_eq!(outcome.text, "<?php\n#[Route('/home')]\nfunction home() {}    \n");
    assert_eq!(outcome.stats.comments_removed, 1);
    Ok(())
}

#[test]
fn test_python_fstring_with_nested_quotes() -> Result<()> {
    let outcome = engine().strip("x = f\"{\"#\"}\"  # c\n", GrammarFamily::Python)?;
    assert!(!outcome.used_fallback);
    assert_eq!(outcome.text, "x = f\"{\"#\"}\"\n");
    Ok(())
}
