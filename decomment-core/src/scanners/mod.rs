//! The lexical scanners, one per grammar family.
//!
//! Each scanner is a pure in-memory transform: text in, text and
//! [`crate::span::ScanStats`] out. None of them fails on malformed input;
//! ambiguous content is left as it is.
//!
//! * `python_tokens`: tokenizer-based Python path (primary).
//! * `python`: line-oriented Python state machine (fallback).
//! * `c_style`: ordered alternation for JS/TS/JSX/CSS/SCSS and the PHP fallback.
//! * `markup`: embedded-block dispatcher for HTML, Blade and Jinja.
//!
//! License: MIT OR APACHE 2.0

pub(crate) mod alternation;
pub mod c_style;
pub mod markup;
pub mod python;
pub mod python_tokens;
