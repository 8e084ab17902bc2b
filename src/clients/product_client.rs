use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductId, ProductPatch};
use crate::product_actor::entity::same_code;
use crate::product_actor::{ProductAction, ProductActionResult, ProductError, StockLevel};

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductId, ProductError, product);

fn initial(name: &str) -> Option<String> {
    name.trim().chars().next().map(|c| c.to_uppercase().collect())
}

fn unexpected() -> ProductError {
    ProductError::ActorCommunicationError("Unexpected result".to_string())
}

impl ProductClient {
    /// Registers a product. Without a code, one is generated from the name's
    /// initial: the number of products already sharing it plus one, moved
    /// forward past codes that are taken, e.g. `G03`.
    ///
    /// # Errors
    /// `ValidationError` when the code is already used by another product.
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, mut params: ProductCreate) -> Result<Product, ProductError> {
        if params.code.as_deref().map_or(true, |code| code.trim().is_empty()) {
            let letter = initial(&params.name)
                .ok_or_else(|| ProductError::ValidationError("name is required".to_string()))?;
            let existing = self.inner.list(|_: &Product| true).await?;
            let sharing = existing
                .iter()
                .filter(|p| initial(&p.name).as_deref() == Some(letter.as_str()))
                .count();
            let code = (sharing + 1..)
                .map(|n| format!("{letter}{n:02}"))
                .find(|code| !existing.iter().any(|p| same_code(&p.code, code)))
                .ok_or_else(|| ProductError::ValidationError(format!("no free code for {letter}")))?;
            params.code = Some(code);
        }

        let product = self.inner.create(params).await?;
        info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    /// Active products only; inactive ones resolve as absent.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, ProductError> {
        debug!("Sending request");
        Ok(self.inner.get(id).await?.filter(Product::is_active))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.inner.list(Product::is_active).await?)
    }

    /// Case-insensitive substring match on code or name, active products only.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ProductError::ValidationError("search query is required".to_string()));
        }
        Ok(self
            .inner
            .list(move |p: &Product| {
                p.is_active()
                    && (p.code.to_lowercase().contains(&needle) || p.name.to_lowercase().contains(&needle))
            })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ProductError> {
        let product = self.inner.update(id, patch).await?;
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn deactivate_product(&self, id: ProductId) -> Result<Product, ProductError> {
        match self.inner.perform_action(id, ProductAction::Deactivate).await? {
            ProductActionResult::Deactivate(product) => {
                info!(product_id = %id, "Product deactivated");
                Ok(product)
            }
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<Decimal, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            _ => Err(unexpected()),
        }
    }

    /// Removes `quantity` if available, atomically.
    #[instrument(skip(self))]
    pub async fn deduct_stock(&self, id: ProductId, quantity: Decimal) -> Result<StockLevel, ProductError> {
        match self.inner.perform_action(id, ProductAction::Deduct(quantity)).await? {
            ProductActionResult::Deduct(level) => {
                if level.below_minimum {
                    warn!(product = %level.product_name, stock = %level.current, "Stock below minimum");
                }
                debug!(previous = %level.previous, current = %level.current, "Stock deducted");
                Ok(level)
            }
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn restore_stock(&self, id: ProductId, quantity: Decimal) -> Result<StockLevel, ProductError> {
        match self.inner.perform_action(id, ProductAction::Restore(quantity)).await? {
            ProductActionResult::Restore(level) => {
                debug!(previous = %level.previous, current = %level.current, "Stock restored");
                Ok(level)
            }
            _ => Err(unexpected()),
        }
    }
}
