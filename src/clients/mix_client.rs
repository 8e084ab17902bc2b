use tracing::{info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::ProductClient;
use crate::domain::{Caller, CustomMix, EntityKind, MixCreate, MixId, MixRequest, MixTotals, ProductId, MIN_QUANTITY};
use crate::mix_actor::{MixError, PricedIngredient};

/// Client for the mix store. Composition prices every ingredient against the
/// live catalog before storing the mix; it never touches stock.
#[derive(Clone)]
pub struct MixClient {
    inner: ResourceClient<CustomMix>,
    product_client: ProductClient,
}

impl_client_methods!(MixClient, CustomMix, MixId, MixError, mix);

impl MixClient {
    pub fn new(inner: ResourceClient<CustomMix>, product_client: ProductClient) -> Self {
        Self { inner, product_client }
    }

    #[instrument(skip(self, request), fields(account = %caller.account, name = %request.name))]
    pub async fn create_mix(&self, caller: &Caller, request: MixRequest) -> Result<CustomMix, MixError> {
        if caller.is_admin() {
            return Err(MixError::Forbidden("only clients can compose mixes"));
        }
        if request.name.trim().is_empty() {
            return Err(MixError::MissingName);
        }
        if request.ingredients.is_empty() {
            return Err(MixError::EmptyMix);
        }

        let mut priced = Vec::with_capacity(request.ingredients.len());
        for wanted in &request.ingredients {
            if wanted.quantity_lbs < MIN_QUANTITY {
                return Err(MixError::InvalidQuantity(wanted.quantity_lbs));
            }
            let id: ProductId = wanted
                .product_id
                .parse()
                .map_err(|_| MixError::InvalidReference(wanted.product_id.clone()))?;
            let product = self
                .product_client
                .get_product(id)
                .await?
                .ok_or_else(|| MixError::NotFound { entity: EntityKind::Product, id: id.to_string() })?;
            if product.current_stock < wanted.quantity_lbs {
                return Err(MixError::InsufficientStock {
                    product: product.name,
                    requested: wanted.quantity_lbs,
                    available: product.current_stock,
                });
            }
            priced.push(PricedIngredient::from_product(&product, wanted.quantity_lbs));
        }

        let totals = MixTotals::compute(&priced);
        let params = MixCreate {
            owner: caller.account,
            name: request.name,
            ingredients: priced.into_iter().map(PricedIngredient::into_ingredient).collect(),
            totals,
        };
        let mix = self.inner.create(params).await?;
        info!(mix_id = %mix.id, total_price = %mix.total_price, "Mix created");
        Ok(mix)
    }

    /// The caller's mixes, newest first.
    #[instrument(skip(self), fields(account = %caller.account))]
    pub async fn list_own_mixes(&self, caller: &Caller) -> Result<Vec<CustomMix>, MixError> {
        if caller.is_admin() {
            return Err(MixError::Forbidden("only clients own mixes"));
        }
        let owner = caller.account;
        Ok(self.inner.list(move |mix: &CustomMix| mix.owner == owner).await?)
    }
}
