//! # Observability
//!
//! Structured logging via the tracing ecosystem.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` for this crate and `warn` for
/// dependencies. Safe to call once per process; tests that want output
/// can set `RUST_LOG` and call it from their own harness.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,lockbox=info"));

    fmt().with_env_filter(filter).with_target(true).compact().init();
}

/// Log the effective configuration at startup, with secrets elided.
pub fn log_config_info(config: &crate::config::AppConfig) {
    tracing::info!(
        bind_address = %config.server.bind_address,
        port = config.server.port,
        sweep_interval_secs = config.sweeper.interval_secs,
        registered_clients = config.clients.len(),
        "Lockbox configuration"
    );
}
