use std::path::Path;

use tracing::info;

use super::SystemError;
use crate::domain::ProductCreate;

const DEFAULT_CATALOG: &str = include_str!("../../data/catalog.json");

/// The catalog shipped with the binary.
pub fn default_catalog() -> Result<Vec<ProductCreate>, SystemError> {
    Ok(serde_json::from_str(DEFAULT_CATALOG)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<ProductCreate>, SystemError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SystemError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let products: Vec<ProductCreate> = serde_json::from_str(&raw)?;
    info!(path = %path.display(), products = products.len(), "Catalog file loaded");
    Ok(products)
}
