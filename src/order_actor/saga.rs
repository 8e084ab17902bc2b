//! Stock moves for one order, applied one product at a time through the
//! catalog's atomic stock actions.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::clients::ProductClient;
use crate::domain::{ProductId, StockMove};
use crate::product_actor::ProductError;

/// Per-product stock requirements of an order, merged per product in the
/// order each product was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPlan {
    moves: Vec<StockMove>,
}

/// A move the catalog refused, with its position in the plan.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("stock move {step} failed: {error}")]
pub struct StepFailure {
    pub step: usize,
    pub error: ProductError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeductionFailure {
    /// Every move before `failure.step` was given back.
    RolledBack(StepFailure),
    /// Giving the applied moves back failed as well; `still_applied` remain
    /// deducted.
    Stuck {
        failure: StepFailure,
        still_applied: Vec<StockMove>,
        error: ProductError,
    },
}

impl StockPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plan over moves that are already merged, such as an order's held stock.
    pub fn from_moves(moves: Vec<StockMove>) -> Self {
        Self { moves }
    }

    pub fn add(&mut self, product: ProductId, quantity: Decimal) {
        match self.moves.iter_mut().find(|m| m.product == product) {
            Some(existing) => existing.quantity += quantity,
            None => self.moves.push(StockMove { product, quantity }),
        }
    }

    /// Total already planned for `product`.
    pub fn required(&self, product: ProductId) -> Decimal {
        self.moves
            .iter()
            .find(|m| m.product == product)
            .map(|m| m.quantity)
            .unwrap_or_default()
    }

    pub fn moves(&self) -> &[StockMove] {
        &self.moves
    }

    /// Moves from `step` onwards, left untouched by a run that failed there.
    pub fn from_step(&self, step: usize) -> Vec<StockMove> {
        self.moves.get(step..).map(<[StockMove]>::to_vec).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Deducts every move in order. When move `k` is refused, moves `0..k`
    /// are restored in reverse before returning.
    #[instrument(skip(self, products), fields(moves = self.len()))]
    pub async fn deduct(&self, products: &ProductClient) -> Result<(), DeductionFailure> {
        for (step, stock_move) in self.moves.iter().enumerate() {
            if let Err(error) = products.deduct_stock(stock_move.product, stock_move.quantity).await {
                warn!(step, product_id = %stock_move.product, error = %error, "Deduction refused, compensating");
                let failure = StepFailure { step, error };
                return match self.compensate(products, step).await {
                    Ok(()) => Err(DeductionFailure::RolledBack(failure)),
                    Err((remaining, error)) => Err(DeductionFailure::Stuck {
                        failure,
                        still_applied: self.moves[..remaining].to_vec(),
                        error,
                    }),
                };
            }
        }
        info!("Stock deducted");
        Ok(())
    }

    async fn compensate(&self, products: &ProductClient, applied: usize) -> Result<(), (usize, ProductError)> {
        for (undone, stock_move) in self.moves[..applied].iter().rev().enumerate() {
            if let Err(e) = products.restore_stock(stock_move.product, stock_move.quantity).await {
                error!(product_id = %stock_move.product, error = %e, "Compensation failed");
                return Err((applied - undone, e));
            }
        }
        Ok(())
    }

    /// Returns every move to stock in order, stopping at the first failure.
    /// Products that no longer exist are skipped.
    #[instrument(skip(self, products), fields(moves = self.len()))]
    pub async fn restore(&self, products: &ProductClient) -> Result<(), StepFailure> {
        for (step, stock_move) in self.moves.iter().enumerate() {
            match products.restore_stock(stock_move.product, stock_move.quantity).await {
                Ok(_) => {}
                Err(ProductError::NotFound(id)) => {
                    warn!(product_id = %id, "Product no longer exists, skipping restoration");
                }
                Err(error) => {
                    error!(step, product_id = %stock_move.product, error = %error, "Restoration failed");
                    return Err(StepFailure { step, error });
                }
            }
        }
        info!("Stock restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductCreate;
    use crate::test_support::spawn_catalog;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    #[test]
    fn add_merges_per_product_in_first_seen_order() {
        let (a, b) = (ProductId::new(), ProductId::new());
        let mut plan = StockPlan::new();

        plan.add(a, dec!(1));
        plan.add(b, dec!(0.5));
        plan.add(a, dec!(2));

        assert_eq!(
            plan.moves(),
            &[
                StockMove { product: a, quantity: dec!(3) },
                StockMove { product: b, quantity: dec!(0.5) },
            ]
        );
        assert_eq!(plan.required(ProductId::new()), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn merged_plan_keeps_per_product_sums(entries in prop::collection::vec((0usize..4, 1i64..1_000), 0..20)) {
            let products: Vec<ProductId> = (0..4).map(|_| ProductId::new()).collect();
            let mut plan = StockPlan::new();
            for (index, tenths) in &entries {
                plan.add(products[*index], Decimal::new(*tenths, 1));
            }

            for (index, product) in products.iter().enumerate() {
                let expected: Decimal = entries
                    .iter()
                    .filter(|(i, _)| *i == index)
                    .map(|(_, tenths)| Decimal::new(*tenths, 1))
                    .sum();
                prop_assert_eq!(plan.required(*product), expected);
            }
            let mut distinct: Vec<usize> = entries.iter().map(|(i, _)| *i).collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(plan.len(), distinct.len());
        }
    }

    #[tokio::test]
    async fn refused_deduction_restores_earlier_moves() -> TestResult {
        let catalog = spawn_catalog();
        let granola = catalog.create_product(ProductCreate::new("Granola", dec!(3.50), dec!(4.00), dec!(10))).await?;
        let almonds = catalog.create_product(ProductCreate::new("Almonds", dec!(8.50), dec!(9.50), dec!(1))).await?;
        let mut plan = StockPlan::new();
        plan.add(granola.id, dec!(3));
        plan.add(almonds.id, dec!(2));

        let result = plan.deduct(&catalog).await;

        assert!(matches!(
            result,
            Err(DeductionFailure::RolledBack(StepFailure { step: 1, error: ProductError::InsufficientStock { .. } }))
        ));
        assert_eq!(catalog.check_stock(granola.id).await?, dec!(10));
        assert_eq!(catalog.check_stock(almonds.id).await?, dec!(1));
        Ok(())
    }

    #[test]
    fn from_step_lists_the_moves_a_failed_run_left_untouched() {
        let (a, b) = (ProductId::new(), ProductId::new());
        let plan = StockPlan::from_moves(vec![
            StockMove { product: a, quantity: dec!(3) },
            StockMove { product: b, quantity: dec!(2) },
        ]);

        assert_eq!(plan.from_step(1), vec![StockMove { product: b, quantity: dec!(2) }]);
        assert!(plan.from_step(2).is_empty());
        assert!(plan.from_step(5).is_empty());
    }

    #[tokio::test]
    async fn restore_skips_unknown_products() -> TestResult {
        let catalog = spawn_catalog();
        let granola = catalog.create_product(ProductCreate::new("Granola", dec!(3.50), dec!(4.00), dec!(10))).await?;
        let mut plan = StockPlan::new();
        plan.add(ProductId::new(), dec!(5));
        plan.add(granola.id, dec!(2));

        plan.restore(&catalog).await?;

        assert_eq!(catalog.check_stock(granola.id).await?, dec!(12));
        Ok(())
    }
}
