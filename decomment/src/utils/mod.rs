// decomment/src/utils/mod.rs
pub mod walker;
