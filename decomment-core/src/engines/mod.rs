//! Concrete implementations of the `CommentEngine` trait.
//!
//! Each engine lives in its own file and is declared here with
//! `pub mod <engine_name>;`.
//!
//! License: MIT OR APACHE 2.0

pub mod lexical;
