use rust_decimal::Decimal;

use crate::domain::Product;

/// Custom actions for Product entities.
///
/// Stock moves run inside the catalog actor, so each one is a single atomic
/// read-check-write on the product record.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Removes stock.
    ///
    /// # Errors
    /// Fails, leaving stock untouched, when the requested amount exceeds what is available.
    Deduct(Decimal),
    /// Returns stock. Applies to inactive products too.
    Restore(Decimal),
    /// Soft-deletes the product.
    Deactivate,
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    CheckStock(Decimal),
    Deduct(StockLevel),
    Restore(StockLevel),
    Deactivate(Product),
}

/// Stock level around a single move.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLevel {
    pub product_name: String,
    pub previous: Decimal,
    pub current: Decimal,
    /// The level sits below the product's configured minimum after the move.
    pub below_minimum: bool,
}
