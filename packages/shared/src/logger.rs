//! Logging setup utilities for the Parlor binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Library crates whose log output is enabled by default.
const WORKSPACE_CRATES: [&str; 3] = ["parlor_shared", "parlor_server", "parlor_client"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every workspace crate and the binary itself get `default_log_level`.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    WORKSPACE_CRATES
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "parlor-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Examples
///
/// ```no_run
/// use parlor_shared::logger::setup_logger;
///
/// setup_logger("parlor-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
