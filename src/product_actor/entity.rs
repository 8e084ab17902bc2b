use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult, StockLevel};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{NutritionalInfo, Product, ProductCreate, ProductId, ProductPatch, ProductStatus};

/// Prices must be strictly above one cent.
const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

fn require_text(field: &str, value: &str) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(ProductError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

fn require_price(field: &str, value: Decimal) -> Result<(), ProductError> {
    if value <= MIN_PRICE {
        return Err(ProductError::ValidationError(format!(
            "{field} must be greater than {MIN_PRICE}, got {value}"
        )));
    }
    Ok(())
}

fn require_stock(value: Decimal) -> Result<(), ProductError> {
    if value < Decimal::ZERO {
        return Err(ProductError::ValidationError(format!(
            "stock cannot be negative, got {value}"
        )));
    }
    Ok(())
}

fn require_nutrition(info: &NutritionalInfo) -> Result<(), ProductError> {
    for (field, value) in [
        ("calories", info.calories),
        ("protein", info.protein),
        ("fat", info.fat),
        ("carbs", info.carbs),
    ] {
        if value < Decimal::ZERO {
            return Err(ProductError::ValidationError(format!(
                "{field} cannot be negative, got {value}"
            )));
        }
    }
    Ok(())
}

/// Codes compare case-insensitively.
pub(crate) fn same_code(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl Product {
    fn level_after(&self, previous: Decimal) -> StockLevel {
        StockLevel {
            product_name: self.name.clone(),
            previous,
            current: self.current_stock,
            below_minimum: self.current_stock < self.min_stock,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects blank names or origins, missing codes, prices at or below one
    /// cent, negative initial stock, and negative nutrition values.
    fn from_create(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        let code = params
            .code
            .filter(|code| !code.trim().is_empty())
            .ok_or_else(|| ProductError::ValidationError("code is required".to_string()))?;
        require_text("name", &params.name)?;
        require_text("origin country", &params.origin_country)?;
        require_price("price per pound", params.price_per_pound)?;
        require_price("retail price", params.retail_price)?;
        require_price("wholesale price", params.wholesale_price)?;
        require_stock(params.initial_stock)?;
        require_nutrition(&params.nutritional_info)?;

        let now = Utc::now();
        Ok(Self {
            id,
            code: code.trim().to_string(),
            name: params.name.trim().to_string(),
            description: params.description,
            category: params.category,
            price_per_pound: params.price_per_pound,
            retail_price: params.retail_price,
            wholesale_price: params.wholesale_price,
            current_stock: params.initial_stock,
            min_stock: params.min_stock,
            origin_country: params.origin_country,
            nutritional_info: params.nutritional_info,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Product codes are unique across the catalog, inactive products included.
    fn check_unique(&self, existing: &Self) -> Result<(), ProductError> {
        if same_code(&self.code, &existing.code) {
            return Err(ProductError::ValidationError(format!(
                "code {} already exists",
                existing.code
            )));
        }
        Ok(())
    }

    /// Updates catalog fields of an active product.
    ///
    /// # Fields Updated
    /// - `name`, `origin_country`: must not be blank
    /// - prices: must stay above one cent
    /// - `current_stock`: must not be negative
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if !self.is_active() {
            return Err(ProductError::NotFound(self.id.to_string()));
        }
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if let Some(origin) = &patch.origin_country {
            require_text("origin country", origin)?;
        }
        for (field, price) in [
            ("price per pound", patch.price_per_pound),
            ("retail price", patch.retail_price),
            ("wholesale price", patch.wholesale_price),
        ] {
            if let Some(price) = price {
                require_price(field, price)?;
            }
        }
        if let Some(stock) = patch.current_stock {
            require_stock(stock)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(origin) = patch.origin_country {
            self.origin_country = origin;
        }
        if let Some(price) = patch.price_per_pound {
            self.price_per_pound = price;
        }
        if let Some(price) = patch.retail_price {
            self.retail_price = price;
        }
        if let Some(price) = patch.wholesale_price {
            self.wholesale_price = price;
        }
        if let Some(stock) = patch.current_stock {
            self.current_stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Errors
    /// `Deduct` and `Restore` reject non-positive amounts; `Deduct` rejects
    /// amounts above the current stock; `Deactivate` rejects products that are
    /// already inactive.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.current_stock)),
            ProductAction::Deduct(amount) => {
                if amount <= Decimal::ZERO {
                    return Err(ProductError::InvalidQuantity(amount));
                }
                if self.current_stock < amount {
                    return Err(ProductError::InsufficientStock {
                        product: self.name.clone(),
                        requested: amount,
                        available: self.current_stock,
                    });
                }
                let previous = self.current_stock;
                self.current_stock -= amount;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::Deduct(self.level_after(previous)))
            }
            ProductAction::Restore(amount) => {
                if amount <= Decimal::ZERO {
                    return Err(ProductError::InvalidQuantity(amount));
                }
                let previous = self.current_stock;
                self.current_stock += amount;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::Restore(self.level_after(previous)))
            }
            ProductAction::Deactivate => {
                if !self.is_active() {
                    return Err(ProductError::NotFound(self.id.to_string()));
                }
                self.status = ProductStatus::Inactive;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::Deactivate(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    fn granola() -> ProductCreate {
        let mut params = ProductCreate::new("Granola", dec!(3.50), dec!(4.00), dec!(10))
            .with_min_stock(dec!(5));
        params.code = Some("G01".to_string());
        params
    }

    #[test]
    fn from_create_copies_initial_stock_and_activates() -> TestResult {
        let product = Product::from_create(ProductId::new(), granola())?;

        assert_eq!(product.current_stock, dec!(10));
        assert_eq!(product.code, "G01");
        assert!(product.is_active());
        Ok(())
    }

    #[test]
    fn from_create_rejects_prices_at_one_cent_and_negative_stock() {
        let mut cheap = granola();
        cheap.retail_price = dec!(0.01);
        let mut negative = granola();
        negative.initial_stock = dec!(-1);
        let mut uncoded = granola();
        uncoded.code = None;

        for params in [cheap, negative, uncoded] {
            assert!(matches!(
                Product::from_create(ProductId::new(), params),
                Err(ProductError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn from_create_rejects_negative_nutrition() {
        let params = granola().with_calories(dec!(-1900));

        assert!(matches!(
            Product::from_create(ProductId::new(), params),
            Err(ProductError::ValidationError(message)) if message.contains("calories")
        ));
    }

    #[test]
    fn codes_conflict_regardless_of_case() -> TestResult {
        let stored = Product::from_create(ProductId::new(), granola())?;
        let mut params = granola();
        params.code = Some("g01".to_string());
        let clash = Product::from_create(ProductId::new(), params)?;
        let mut params = granola();
        params.code = Some("G02".to_string());
        let other = Product::from_create(ProductId::new(), params)?;

        assert!(clash.check_unique(&stored).is_err());
        assert!(other.check_unique(&stored).is_ok());
        Ok(())
    }

    #[test]
    fn deduct_down_to_exactly_zero_succeeds() -> TestResult {
        let mut product = Product::from_create(ProductId::new(), granola())?;

        let result = product.handle_action(ProductAction::Deduct(dec!(10)))?;

        assert!(matches!(
            result,
            ProductActionResult::Deduct(StockLevel { current, below_minimum: true, .. }) if current.is_zero()
        ));
        Ok(())
    }

    #[test]
    fn deduct_beyond_stock_fails_without_change() -> TestResult {
        let mut product = Product::from_create(ProductId::new(), granola())?;

        let result = product.handle_action(ProductAction::Deduct(dec!(10.01)));

        assert_eq!(
            result.err(),
            Some(ProductError::InsufficientStock {
                product: "Granola".to_string(),
                requested: dec!(10.01),
                available: dec!(10),
            })
        );
        assert_eq!(product.current_stock, dec!(10));
        Ok(())
    }

    #[test]
    fn restore_applies_to_inactive_products() -> TestResult {
        let mut product = Product::from_create(ProductId::new(), granola())?;
        product.handle_action(ProductAction::Deactivate)?;

        product.handle_action(ProductAction::Restore(dec!(2.5)))?;

        assert_eq!(product.current_stock, dec!(12.5));
        Ok(())
    }

    #[test]
    fn non_positive_moves_are_rejected() -> TestResult {
        let mut product = Product::from_create(ProductId::new(), granola())?;

        assert!(product.handle_action(ProductAction::Deduct(Decimal::ZERO)).is_err());
        assert!(product.handle_action(ProductAction::Restore(dec!(-1))).is_err());
        assert_eq!(product.current_stock, dec!(10));
        Ok(())
    }

    #[test]
    fn update_rejects_negative_stock_and_leaves_record_untouched() -> TestResult {
        let mut product = Product::from_create(ProductId::new(), granola())?;
        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            current_stock: Some(dec!(-3)),
            ..ProductPatch::default()
        };

        assert!(product.on_update(patch).is_err());
        assert_eq!(product.name, "Granola");
        Ok(())
    }

    #[test]
    fn inactive_products_cannot_be_updated_or_deactivated_again() -> TestResult {
        let mut product = Product::from_create(ProductId::new(), granola())?;
        product.handle_action(ProductAction::Deactivate)?;

        assert!(matches!(
            product.on_update(ProductPatch::default()),
            Err(ProductError::NotFound(_))
        ));
        assert!(matches!(
            product.handle_action(ProductAction::Deactivate),
            Err(ProductError::NotFound(_))
        ));
        Ok(())
    }
}
