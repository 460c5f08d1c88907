//! Process-wide logging setup.
//!
//! Library code logs through the `log` macros and opens `tracing` spans
//! around store operations. Both end up in one `tracing` subscriber.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Builds the level filter. `RUST_LOG` wins over the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Returns false when one was already set,
/// which makes repeated calls harmless.
pub fn init_logging(config: &LoggingConfig) -> bool {
    if tracing_log::LogTracer::init().is_err() {
        log::debug!("log bridge already installed");
    }

    let json = config.json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
    });
    let plain = (!config.json).then(|| fmt::layer().with_target(true));

    let subscriber = Registry::default()
        .with(env_filter(config))
        .with(json)
        .with(plain);

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
