// discovery/src/logger.rs
//! Logger setup for the CLI.
//!
//! `RUST_LOG` wins when set. Otherwise the two discovery crates log at `info`
//! and everything else at `warn`. An explicit level from `--quiet` or
//! `--debug` overrides both.

use env_logger::{Builder, Env};
use log::LevelFilter;

const DEFAULT_FILTER: &str = "warn,discovery=info,discovery_core=info";

/// Initializes `env_logger` once. Later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut b = Builder::new();
            b.filter_level(level);
            b
        }
        None => Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)),
    };
    builder.format_timestamp(None).format_target(false);
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logger(Some(LevelFilter::Off));
        init_logger(Some(LevelFilter::Debug));
    }
}
