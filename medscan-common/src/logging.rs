//! Tracing subscriber setup shared by the service binaries

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the TOML `[logging] level` applies.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    // A second init (e.g. from tests) is harmless; ignore the error.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
