//! Tracing setup shared by the CLI and the unit tests.
//!
//! Diagnostics go to stderr so they never mix with command output on
//! stdout. `FITPLAN_LOG` takes precedence over `RUST_LOG`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LEVEL: &str = "warn";
const LOG_ENV: &str = "FITPLAN_LOG";

pub fn init() {
    init_with_level(DEFAULT_LEVEL)
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_with_level(default_level: &str) {
    let result = tracing_subscriber::registry()
        .with(filter(default_level))
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .try_init();
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_test();
        init_with_level("info");
        init();
    }

    #[test]
    fn test_explicit_level_is_used_without_env() {
        if std::env::var_os(LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(filter("debug").to_string(), "debug");
    }
}
