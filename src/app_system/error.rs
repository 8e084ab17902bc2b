use std::path::PathBuf;

use thiserror::Error;

use crate::product_actor::ProductError;

/// Failures while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
    #[error("failed to seed catalog: {0}")]
    Seed(#[from] ProductError),
    #[error("actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}
