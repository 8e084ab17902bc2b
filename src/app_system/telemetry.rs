use tracing_subscriber::EnvFilter;

use super::{LogFormat, LoggingConfig};

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn setup_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime());

    match config.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
