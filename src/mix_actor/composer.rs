use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{MixIngredient, MixTotals, Product, ProductId};

/// An ingredient resolved against the catalog at composition time.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedIngredient {
    pub product: ProductId,
    pub product_name: String,
    pub quantity_lbs: Decimal,
    pub price_per_pound: Decimal,
    pub calories_per_pound: Decimal,
}

impl PricedIngredient {
    pub fn from_product(product: &Product, quantity_lbs: Decimal) -> Self {
        Self {
            product: product.id,
            product_name: product.name.clone(),
            quantity_lbs,
            price_per_pound: product.price_per_pound,
            calories_per_pound: product.nutritional_info.calories,
        }
    }

    pub fn cost(&self) -> Decimal {
        self.price_per_pound * self.quantity_lbs
    }

    pub fn calories(&self) -> Decimal {
        self.calories_per_pound * self.quantity_lbs
    }

    /// Freezes name and price into the stored ingredient.
    pub fn into_ingredient(self) -> MixIngredient {
        MixIngredient {
            product: self.product,
            product_name: self.product_name,
            quantity_lbs: self.quantity_lbs,
            price_at_moment: self.price_per_pound,
        }
    }
}

impl MixTotals {
    /// Price is rounded to cents and calories to a whole number, both with
    /// ties away from zero. Weight is the exact sum.
    pub fn compute(ingredients: &[PricedIngredient]) -> Self {
        let price: Decimal = ingredients.iter().map(PricedIngredient::cost).sum();
        let weight: Decimal = ingredients.iter().map(|i| i.quantity_lbs).sum();
        let calories: Decimal = ingredients.iter().map(PricedIngredient::calories).sum();

        Self {
            price: price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            weight,
            // Catalog nutrition is never negative, so only overflow is out of range.
            calories: calories
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u64()
                .unwrap_or(u64::MAX),
        }
    }
}
