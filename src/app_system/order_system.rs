use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::SystemError;
use crate::actor_framework::ResourceActor;
use crate::clients::{MixClient, OrderClient, ProductClient};
use crate::domain::{CustomMix, MixId, Order, OrderId, Product, ProductCreate, ProductId};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// The main application system that orchestrates all actors.
///
/// Starts the catalog, mix and order actors in dependency order and wires the
/// clients together. Actors stop once every client handle is dropped, so
/// clones handed out to callers must be released before [`shutdown`](Self::shutdown).
pub struct OrderSystem {
    pub product_client: ProductClient,
    pub mix_client: MixClient,
    pub order_client: OrderClient,
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        // 1. Catalog
        let (product_actor, product_resource_client) = ResourceActor::<Product>::new(capacity, ProductId::new);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Mixes (priced against the catalog)
        let (mix_actor, mix_resource_client) = ResourceActor::<CustomMix>::new(capacity, MixId::new);
        let mix_client = MixClient::new(mix_resource_client, product_client.clone());
        let mix_handle = tokio::spawn(mix_actor.run());

        // 3. Orders (catalog + mixes)
        let (order_actor, order_resource_client) = ResourceActor::<Order>::new(capacity, OrderId::new);
        let order_client = OrderClient::new(order_resource_client, product_client.clone(), mix_client.clone());
        let order_handle = tokio::spawn(order_actor.run());

        info!(capacity, "Order system started");
        Self {
            product_client,
            mix_client,
            order_client,
            handles: vec![product_handle, mix_handle, order_handle],
        }
    }

    /// Registers every product in order, stopping at the first rejection.
    #[instrument(skip(self, products), fields(products = products.len()))]
    pub async fn seed_catalog(&self, products: Vec<ProductCreate>) -> Result<Vec<Product>, SystemError> {
        let mut seeded = Vec::with_capacity(products.len());
        for params in products {
            seeded.push(self.product_client.create_product(params).await?);
        }
        info!(count = seeded.len(), "Catalog seeded");
        Ok(seeded)
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let Self {
            product_client,
            mix_client,
            order_client,
            handles,
        } = self;

        // Closing every sender lets each actor loop drain and exit.
        drop(order_client);
        drop(mix_client);
        drop(product_client);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new()
    }
}
