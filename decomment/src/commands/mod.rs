// decomment/src/commands/mod.rs
//! Implementations of the `decomment` subcommands.

pub mod common;
pub mod filter;
pub mod scan;
pub mod strip;
