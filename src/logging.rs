//! Optional log subscriber setup.
//!
//! The library only emits `tracing` events. Applications that do not install
//! a subscriber of their own can call [`init`] to get formatted output on
//! stderr at the configured level.

use tracing_subscriber::EnvFilter;

use crate::configuration::LogLevel;

/// Install a fmt subscriber filtered at `level`, unless `RUST_LOG` says otherwise.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("contentful_management={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
