//! Logging setup
//!
//! The library logs through `tracing`. Binaries and tests embedding it can
//! call `init` or `init_from_env` to install a formatting subscriber.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `secret_mgt_core=trace`)
pub const LOG_FILTER_ENV: &str = "SECRET_MGT_LOG";

/// Filter used when none is configured
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global fmt subscriber with the given filter directive
///
/// Returns `false` if a global subscriber was already installed or the
/// directive does not parse.
pub fn init(filter: &str) -> bool {
    let Ok(filter) = EnvFilter::try_new(filter) else {
        return false;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install a subscriber using `SECRET_MGT_LOG`, falling back to `info`
pub fn init_from_env() -> bool {
    init(&filter_from_env())
}

/// The filter directive `init_from_env` would use
pub fn filter_from_env() -> String {
    std::env::var(LOG_FILTER_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
