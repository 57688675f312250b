//! Process-wide `tracing` subscriber setup: structured logs on stderr
//! with an `EnvFilter`. There is nothing in this library that emits
//! metrics, so no exporter stack lives here.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber for structured logging on
/// stderr. Safe to call once per process; a second call returns an error
/// rather than panicking.
pub fn init_tracing() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
}
