use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{AccountId, Id, ProductId};

pub type MixId = Id<CustomMix>;

/// One ingredient of a mix, with the product name and price frozen at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixIngredient {
    pub product: ProductId,
    pub product_name: String,
    pub quantity_lbs: Decimal,
    pub price_at_moment: Decimal,
}

/// A client-composed blend. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomMix {
    pub id: MixId,
    pub owner: AccountId,
    pub name: String,
    pub ingredients: Vec<MixIngredient>,
    pub total_price: Decimal,
    pub total_weight: Decimal,
    pub total_calories: u64,
    pub is_saved: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregates computed by the composer for a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixTotals {
    pub price: Decimal,
    pub weight: Decimal,
    pub calories: u64,
}

/// Fully priced mix, ready to be stored.
#[derive(Debug, Clone)]
pub struct MixCreate {
    pub owner: AccountId,
    pub name: String,
    pub ingredients: Vec<MixIngredient>,
    pub totals: MixTotals,
}

/// A requested ingredient, as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRequest {
    pub product_id: String,
    pub quantity_lbs: Decimal,
}

impl IngredientRequest {
    pub fn new(product_id: impl ToString, quantity_lbs: Decimal) -> Self {
        Self {
            product_id: product_id.to_string(),
            quantity_lbs,
        }
    }
}

/// A mix as requested by a client, before pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct MixRequest {
    pub name: String,
    pub ingredients: Vec<IngredientRequest>,
}
