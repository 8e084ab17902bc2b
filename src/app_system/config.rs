use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging settings consumed by [`setup_tracing`](super::setup_tracing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
}

/// Process configuration, read from flags, then the environment, then `.env`.
#[derive(Debug, Clone, Parser)]
#[command(name = "mix-orders", version, about = "Inventory-aware order engine for custom snack mixes")]
pub struct SystemConfig {
    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Request buffer of each store actor
    #[arg(long, env = "CHANNEL_CAPACITY", default_value_t = 100)]
    pub channel_capacity: usize,

    /// JSON seed catalog; the embedded catalog is used when absent
    #[arg(long, env = "CATALOG_PATH")]
    pub catalog: Option<PathBuf>,
}

impl SystemConfig {
    /// Loads `.env` if present, then parses the command line.
    pub fn load() -> Self {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            filter: self.log_level.clone(),
            format: self.log_format,
        }
    }
}
