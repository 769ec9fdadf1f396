// decomment/src/logger.rs
//! Logger setup for the decomment binary.
//!
//! Logs go to stderr so that `filter` and `scan --json-stdout` keep stdout
//! clean. `RUST_LOG` is honoured unless a level is forced.
//! License: MIT OR APACHE 2.0

use log::LevelFilter;
use std::io::Write;

/// Initializes `env_logger`. A `Some` level overrides `RUST_LOG` for the
/// decomment crates; calling this twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );

    if let Some(level) = level {
        builder
            .filter_module("decomment", level)
            .filter_module("decomment_core", level);
    }

    let _ = builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Resolves the global verbosity flags into a forced level, if any.
pub fn level_from_flags(quiet: bool, debug: bool, disable_debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug && !disable_debug {
        Some(LevelFilter::Debug)
    } else if disable_debug {
        Some(LevelFilter::Info)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins() {
        assert_eq!(level_from_flags(true, true, false), Some(LevelFilter::Off));
    }

    #[test]
    fn test_disable_debug_overrides_debug() {
        assert_eq!(level_from_flags(false, true, true), Some(LevelFilter::Info));
        assert_eq!(level_from_flags(false, true, false), Some(LevelFilter::Debug));
        assert_eq!(level_from_flags(false, false, false), None);
    }
}
