// decomment-core/src/scanners/python_tokens.rs
//! Lossless Python tokenizer and the token-stream comment stripper.
//!
//! The tokenizer is small. It knows string prefixes, triple quotes and
//! brackets, f-string replacement fields with nested quotes, and line
//! continuations. That is enough to tell comments from everything else, and
//! it refuses input it cannot lex with certainty. Concatenating the text of every token
//! reproduces the input exactly.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keep::KeepDirectives;
use crate::span::ScanStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Name,
    Number,
    String,
    Op,
    Comment,
    /// End of a logical line.
    Newline,
    /// A line break inside brackets or after a blank/comment-only line.
    Nl,
    Whitespace,
    /// A backslash line continuation, terminator included.
    Continuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

/// Reasons the tokenizer gives up. Every variant carries the byte offset
/// where the problem starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenizeError {
    #[error("unterminated string literal at byte {0}")]
    UnterminatedString(usize),

    #[error("EOF in triple-quoted string starting at byte {0}")]
    UnterminatedTripleQuote(usize),

    #[error("unmatched '{found}' at byte {offset}")]
    UnbalancedBracket { offset: usize, found: char },

    #[error("EOF in multi-line statement: bracket opened at byte {offset} is never closed")]
    UnclosedBrackets { offset: usize },

    #[error("unexpected character after line continuation at byte {0}")]
    StrayBackslash(usize),

    #[error("comment inside an f-string replacement field at byte {0}")]
    CommentInReplacementField(usize),
}

const STRING_PREFIXES: &[&str] = &["r", "b", "u", "f", "rb", "br", "fr", "rf"];

struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
    brackets: Vec<(u8, usize)>,
    line_has_content: bool,
    tokens: Vec<Token>,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn closing_for(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            bytes: src.as_bytes(),
            pos: 0,
            brackets: Vec::new(),
            line_has_content: false,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token { kind, start, end: self.pos });
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        while let Some(b) = self.peek(0) {
            let start = self.pos;
            match b {
                b' ' | b'\t' | 0x0c => {
                    while matches!(self.peek(0), Some(b' ' | b'\t' | 0x0c)) {
                        self.pos += 1;
                    }
                    self.push(TokenKind::Whitespace, start);
                }
                b'\r' | b'\n' => {
                    self.skip_line_break();
                    let kind = if self.brackets.is_empty() && self.line_has_content {
                        TokenKind::Newline
                    } else {
                        TokenKind::Nl
                    };
                    self.line_has_content = false;
                    self.push(kind, start);
                }
                b'#' => {
                    while !matches!(self.peek(0), None | Some(b'\r' | b'\n')) {
                        self.pos += 1;
                    }
                    self.push(TokenKind::Comment, start);
                }
                b'\\' => {
                    self.pos += 1;
                    if !matches!(self.peek(0), Some(b'\r' | b'\n')) {
                        return Err(TokenizeError::StrayBackslash(start));
                    }
                    self.skip_line_break();
                    self.push(TokenKind::Continuation, start);
                }
                b'\'' | b'"' => {
                    self.string(start)?;
                }
                b'0'..=b'9' => self.number(start),
                b'.' if matches!(self.peek(1), Some(b'0'..=b'9')) => self.number(start),
                _ if is_name_byte(b) => {
                    while self.peek(0).map_or(false, is_name_byte) {
                        self.pos += 1;
                    }
                    let word = &self.bytes[start..self.pos];
                    let quoted = matches!(self.peek(0), Some(b'\'' | b'"'));
                    if quoted && is_string_prefix(word) {
                        self.string(start)?;
                    } else {
                        self.line_has_content = true;
                        self.push(TokenKind::Name, start);
                    }
                }
                b'(' | b'[' | b'{' => {
                    self.brackets.push((b, start));
                    self.op(start);
                }
                b')' | b']' | b'}' => {
                    match self.brackets.pop() {
                        Some((open, _)) if closing_for(open) == b => {}
                        _ => {
                            return Err(TokenizeError::UnbalancedBracket {
                                offset: start,
                                found: b as char,
                            })
                        }
                    }
                    self.op(start);
                }
                _ => self.op(start),
            }
        }

        if let Some(&(_, offset)) = self.brackets.last() {
            return Err(TokenizeError::UnclosedBrackets { offset });
        }
        Ok(self.tokens)
    }

    fn skip_line_break(&mut self) {
        if self.peek(0) == Some(b'\r') {
            self.pos += 1;
            if self.peek(0) == Some(b'\n') {
                self.pos += 1;
            }
        } else if self.peek(0) == Some(b'\n') {
            self.pos += 1;
        }
    }

    fn op(&mut self, start: usize) {
        self.pos += 1;
        self.line_has_content = true;
        self.push(TokenKind::Op, start);
    }

    fn number(&mut self, start: usize) {
        let hex = self.bytes[start..].starts_with(b"0x") || self.bytes[start..].starts_with(b"0X");
        self.pos += 1;
        loop {
            match self.peek(0) {
                Some(c) if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' => self.pos += 1,
                Some(b'+' | b'-')
                    if !hex && matches!(self.bytes[self.pos - 1], b'e' | b'E') =>
                {
                    self.pos += 1
                }
                _ => break,
            }
        }
        self.line_has_content = true;
        self.push(TokenKind::Number, start);
    }

    /// Lexes a string whose quote is at `self.pos` (any prefix already
    /// consumed); the token starts at `start`.
    fn string(&mut self, start: usize) -> Result<(), TokenizeError> {
        let prefix = StringPrefix::of(&self.bytes[start..self.pos]);
        self.string_body(start, prefix)?;
        self.line_has_content = true;
        self.push(TokenKind::String, start);
        Ok(())
    }

    /// Consumes one literal from its opening quote through its closing quote.
    fn string_body(&mut self, start: usize, prefix: StringPrefix) -> Result<(), TokenizeError> {
        let quote = self.bytes[self.pos];
        let triple = self.bytes[self.pos..].starts_with(&[quote; 3]);
        let delim = if triple { 3 } else { 1 };
        let unterminated = || {
            if triple {
                TokenizeError::UnterminatedTripleQuote(start)
            } else {
                TokenizeError::UnterminatedString(start)
            }
        };
        self.pos += delim;

        loop {
            match self.peek(0) {
                None => return Err(unterminated()),
                Some(b'\n' | b'\r') if !triple => return Err(unterminated()),
                Some(b'\\') => {
                    self.pos += 1;
                    if prefix.formatted && !prefix.raw && self.bytes[self.pos..].starts_with(b"N{") {
                        // \N{NAME}
                        match self.bytes[self.pos..].iter().position(|&b| b == b'}') {
                            Some(close) => self.pos += close + 1,
                            None => return Err(unterminated()),
                        }
                    } else if self.peek(0) == Some(b'\r') && self.peek(1) == Some(b'\n') {
                        self.pos += 2;
                    } else if self.peek(0).is_some() {
                        self.pos += 1;
                    }
                }
                Some(b'{') if prefix.formatted => {
                    if self.peek(1) == Some(b'{') {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                        self.replacement_field(start)?;
                    }
                }
                Some(c) if c == quote && self.bytes[self.pos..].starts_with(&[quote; 3][..delim]) => {
                    self.pos += delim;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Lexes an f-string replacement field from just after its `{` through
    /// the matching `}`. String literals inside are lexed in full, so they may
    /// reuse the enclosing quote.
    fn replacement_field(&mut self, start: usize) -> Result<(), TokenizeError> {
        let mut depth = 0usize;
        loop {
            let Some(b) = self.peek(0) else {
                return Err(TokenizeError::UnterminatedString(start));
            };
            match b {
                b'(' | b'[' | b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b')' | b']' | b'}' if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    return Ok(());
                }
                b')' | b']' => {
                    return Err(TokenizeError::UnbalancedBracket {
                        offset: self.pos,
                        found: b as char,
                    })
                }
                b':' if depth == 0 => {
                    self.pos += 1;
                    return self.format_spec(start);
                }
                b'#' => return Err(TokenizeError::CommentInReplacementField(self.pos)),
                b'\'' | b'"' => self.string_body(self.pos, StringPrefix::default())?,
                _ if is_name_byte(b) => {
                    let word_start = self.pos;
                    while self.peek(0).map_or(false, is_name_byte) {
                        self.pos += 1;
                    }
                    let word = &self.bytes[word_start..self.pos];
                    if matches!(self.peek(0), Some(b'\'' | b'"')) && is_string_prefix(word) {
                        self.string_body(word_start, StringPrefix::of(word))?;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// The format spec after `:` is literal text up to the field's closing
    /// `}`, with nested fields such as `{width}` allowed.
    fn format_spec(&mut self, start: usize) -> Result<(), TokenizeError> {
        loop {
            match self.peek(0) {
                None | Some(b'\n' | b'\r') => return Err(TokenizeError::UnterminatedString(start)),
                Some(b'{') => {
                    self.pos += 1;
                    self.replacement_field(start)?;
                }
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct StringPrefix {
    raw: bool,
    formatted: bool,
}

impl StringPrefix {
    fn of(prefix: &[u8]) -> Self {
        Self {
            raw: prefix.iter().any(|b| matches!(b, b'r' | b'R')),
            formatted: prefix.iter().any(|b| matches!(b, b'f' | b'F')),
        }
    }
}

fn is_string_prefix(word: &[u8]) -> bool {
    let lower = word.to_ascii_lowercase();
    STRING_PREFIXES.iter().any(|p| p.as_bytes() == lower.as_slice())
}

/// An interpreter line (`#!...`) at the very start of the file.
fn is_shebang(token: &Token, text: &str) -> bool {
    token.start == 0 && text.starts_with("#!")
}

/// Tokenizes `src` into a lossless token stream.
pub fn tokenize(src: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(src).run()
}

/// Drops every comment token not matched by `keep`, along with the spaces
/// and tabs before it on the same line. Everything else is re-emitted as is.
pub fn strip(src: &str, keep: &KeepDirectives) -> Result<(String, ScanStats), TokenizeError> {
    let tokens = tokenize(src)?;
    let mut out = String::with_capacity(src.len());
    let mut stats = ScanStats::default();

    for token in &tokens {
        let text = token.text(src);
        if token.kind != TokenKind::Comment {
            out.push_str(text);
            continue;
        }
        if is_shebang(token, text) || keep.matches(text) {
            stats.record(true);
            out.push_str(text);
        } else {
            stats.record(false);
            let len = out.trim_end_matches([' ', '\t', '\x0c']).len();
            out.truncate(len);
        }
    }

    Ok((out, stats))
}
