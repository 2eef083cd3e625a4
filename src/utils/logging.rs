// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable,
/// defaulting to "info". Logs go to stderr; stdout is reserved for the JSON payload.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let initialized = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if initialized.is_err() {
        // A subscriber is already installed (e.g. by an embedding host)
        return;
    }

    tracing::debug!("Logging setup complete.");
}
