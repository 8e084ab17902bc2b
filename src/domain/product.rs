use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Id;

pub type ProductId = Id<Product>;

/// Nutrition facts, expressed per pound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionalInfo {
    pub calories: Decimal,
    pub protein: Decimal,
    pub fat: Decimal,
    pub carbs: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// Represents a catalog product sold by the pound or by the bag.
///
/// Products are never removed; deactivation hides them from lookups while
/// keeping their stock reachable for restorations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_per_pound: Decimal,
    pub retail_price: Decimal,
    pub wholesale_price: Decimal,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub origin_country: String,
    pub nutritional_info: NutritionalInfo,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

fn default_category() -> String {
    "General".to_string()
}

/// Parameters for registering a product.
///
/// Also the record format of seed catalog files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductCreate {
    /// Catalog code; generated from the name initial when absent.
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub price_per_pound: Decimal,
    pub retail_price: Decimal,
    pub wholesale_price: Decimal,
    pub initial_stock: Decimal,
    #[serde(default)]
    pub min_stock: Decimal,
    pub origin_country: String,
    #[serde(default)]
    pub nutritional_info: NutritionalInfo,
}

impl ProductCreate {
    /// Minimal parameters with the given prices and stock; other fields take defaults.
    pub fn new(
        name: impl Into<String>,
        price_per_pound: Decimal,
        retail_price: Decimal,
        initial_stock: Decimal,
    ) -> Self {
        Self {
            code: None,
            name: name.into(),
            description: String::new(),
            category: default_category(),
            price_per_pound,
            retail_price,
            wholesale_price: retail_price,
            initial_stock,
            min_stock: Decimal::ZERO,
            origin_country: "Ecuador".to_string(),
            nutritional_info: NutritionalInfo::default(),
        }
    }

    #[must_use]
    pub fn with_calories(mut self, calories_per_pound: Decimal) -> Self {
        self.nutritional_info.calories = calories_per_pound;
        self
    }

    #[must_use]
    pub fn with_min_stock(mut self, min_stock: Decimal) -> Self {
        self.min_stock = min_stock;
        self
    }
}

/// Partial update of catalog fields. Stock moves go through stock actions instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price_per_pound: Option<Decimal>,
    pub retail_price: Option<Decimal>,
    pub wholesale_price: Option<Decimal>,
    pub current_stock: Option<Decimal>,
    pub origin_country: Option<String>,
}
