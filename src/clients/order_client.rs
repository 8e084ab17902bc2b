use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::{MixClient, ProductClient};
use crate::domain::{
    Caller, EntityKind, Id, LineRequest, Order, OrderCreate, OrderId, OrderLine, OrderPatch, OrderStatus,
    Product, ProductId, StockMove, MIN_QUANTITY,
};
use crate::order_actor::saga::DeductionFailure;
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, StockPlan};

/// Client for the order engine.
///
/// Orchestrates the catalog and mix stores around the order store. Creation
/// validates and prices every line before writing anything, then deducts
/// stock and records it on the order. Cancellation gives back exactly the
/// stock the order holds.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    product_client: ProductClient,
    mix_client: MixClient,
}

impl_client_methods!(OrderClient, Order, OrderId, OrderError, order);

fn unexpected() -> OrderError {
    OrderError::Internal("Unexpected result".to_string())
}

fn parse_id<T>(entity: EntityKind, value: &str) -> Result<Id<T>, OrderError> {
    value.parse().map_err(|_| OrderError::InvalidReference {
        entity,
        value: value.to_string(),
    })
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, product_client: ProductClient, mix_client: MixClient) -> Self {
        Self {
            inner,
            product_client,
            mix_client,
        }
    }

    async fn active_product(&self, id: ProductId) -> Result<Product, OrderError> {
        self.product_client
            .get_product(id)
            .await?
            .ok_or_else(|| OrderError::NotFound {
                entity: EntityKind::Product,
                id: id.to_string(),
            })
    }

    /// Adds `quantity` of `product` to the plan if the combined requirement still fits in stock.
    fn reserve_in_plan(plan: &mut StockPlan, product: &Product, quantity: Decimal) -> Result<(), OrderError> {
        let requested = plan.required(product.id) + quantity;
        if product.current_stock < requested {
            return Err(OrderError::InsufficientStock {
                product: product.name.clone(),
                requested,
                available: product.current_stock,
            });
        }
        plan.add(product.id, quantity);
        Ok(())
    }

    /// Validates and prices every line without writing anything.
    async fn price_lines(&self, lines: &[LineRequest]) -> Result<(Vec<OrderLine>, Decimal, StockPlan), OrderError> {
        let mut priced = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;
        let mut plan = StockPlan::new();

        for line in lines {
            let quantity = match line {
                LineRequest::Product { quantity, .. } | LineRequest::Mix { quantity, .. } => *quantity,
            };
            if quantity < MIN_QUANTITY {
                return Err(OrderError::InvalidQuantity(quantity));
            }

            let line = match line {
                LineRequest::Product { product_id, .. } => {
                    let product = self.active_product(parse_id(EntityKind::Product, product_id)?).await?;
                    Self::reserve_in_plan(&mut plan, &product, quantity)?;
                    OrderLine::Product {
                        product: product.id,
                        quantity,
                        price_at_purchase: product.retail_price,
                    }
                }
                LineRequest::Mix { mix_id, .. } => {
                    let id = parse_id(EntityKind::Mix, mix_id)?;
                    let mix = self.mix_client.find_mix(id).await?.ok_or_else(|| OrderError::NotFound {
                        entity: EntityKind::Mix,
                        id: id.to_string(),
                    })?;
                    for ingredient in &mix.ingredients {
                        let product = self.active_product(ingredient.product).await?;
                        Self::reserve_in_plan(&mut plan, &product, ingredient.quantity_lbs * quantity)?;
                    }
                    OrderLine::Mix {
                        mix: mix.id,
                        quantity,
                        price_at_purchase: mix.total_price,
                    }
                }
            };
            total += line.subtotal();
            priced.push(line);
        }

        Ok((priced, total, plan))
    }

    async fn hold_stock(&self, id: OrderId, moves: Vec<StockMove>) -> Result<Order, OrderError> {
        match self.inner.perform_action(id, OrderAction::HoldStock(moves)).await? {
            OrderActionResult::HoldStock(order) => Ok(order),
            _ => Err(unexpected()),
        }
    }

    /// Places an order on behalf of `caller`.
    ///
    /// # Errors
    /// Validation failures are reported before anything is written. If a
    /// deduction is refused after the order was stored, earlier deductions are
    /// given back, the order is marked `cancelado`, and the refusal is
    /// returned. Failing to mark it is reported as `Internal`; the order then
    /// holds no stock, so a later cancellation returns nothing.
    #[instrument(skip(self, lines), fields(account = %caller.account, lines = lines.len()))]
    pub async fn create_order(&self, caller: &Caller, lines: Vec<LineRequest>) -> Result<Order, OrderError> {
        info!("Processing create_order request");
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let (lines, total, plan) = self.price_lines(&lines).await?;
        info!(total = %total, "Order priced");

        let order = self
            .inner
            .create(OrderCreate {
                owner: caller.account,
                lines,
                total,
            })
            .await?;

        match plan.deduct(&self.product_client).await {
            Ok(()) => match self.hold_stock(order.id, plan.moves().to_vec()).await {
                Ok(order) => {
                    info!(order_id = %order.id, total = %order.total, "Order created");
                    Ok(order)
                }
                Err(e) => {
                    error!(order_id = %order.id, error = %e, "Failed to record held stock, returning it");
                    match plan.restore(&self.product_client).await {
                        Ok(()) => Err(OrderError::Internal(format!(
                            "order {} could not record its stock: {e}",
                            order.id
                        ))),
                        Err(failure) => Err(OrderError::CompensationFailed {
                            order: order.id,
                            remaining: plan.len() - failure.step,
                            reason: format!("{e}; rollback: {}", failure.error),
                        }),
                    }
                }
            },
            Err(DeductionFailure::RolledBack(failure)) => {
                let patch = OrderPatch {
                    status: OrderStatus::Cancelado,
                };
                if let Err(e) = self.inner.update(order.id, patch).await {
                    error!(order_id = %order.id, error = %e, "Failed to cancel order after rollback");
                    return Err(OrderError::Internal(format!(
                        "order {} was left pending after {}: {e}",
                        order.id, failure.error
                    )));
                }
                Err(failure.error.into())
            }
            Err(DeductionFailure::Stuck { failure, still_applied, error }) => {
                let remaining = still_applied.len();
                error!(order_id = %order.id, remaining, "Stock rollback incomplete");
                let mut reason = format!("{}; rollback: {}", failure.error, error);
                if let Err(e) = self.hold_stock(order.id, still_applied).await {
                    error!(order_id = %order.id, error = %e, "Failed to record stock left deducted");
                    reason = format!("{reason}; not recorded on the order: {e}");
                }
                Err(OrderError::CompensationFailed {
                    order: order.id,
                    remaining,
                    reason,
                })
            }
        }
    }

    /// Admins see every order; clients see their own. Newest first.
    #[instrument(skip(self), fields(account = %caller.account))]
    pub async fn list_orders(&self, caller: &Caller) -> Result<Vec<Order>, OrderError> {
        let caller = *caller;
        Ok(self.inner.list(move |order: &Order| caller.can_access(order.owner)).await?)
    }

    /// Orders the caller may not see are reported as not found.
    #[instrument(skip(self), fields(account = %caller.account))]
    pub async fn get_order(&self, caller: &Caller, order_id: &str) -> Result<Order, OrderError> {
        let id: OrderId = parse_id(EntityKind::Order, order_id)?;
        self.inner
            .get(id)
            .await?
            .filter(|order| caller.can_access(order.owner))
            .ok_or_else(|| OrderError::NotFound {
                entity: EntityKind::Order,
                id: id.to_string(),
            })
    }

    /// Cancels an order and returns the stock it holds.
    ///
    /// # Errors
    /// `InvalidTransition` for orders already cancelled or shipped, checked
    /// atomically in the order store so two cancellations cannot both return
    /// stock. If a restoration fails partway, the previous status comes back
    /// with the unreturned moves still held, and `PartialRestoration` reports
    /// how far it got.
    #[instrument(skip(self), fields(account = %caller.account))]
    pub async fn cancel_order(&self, caller: &Caller, order_id: &str) -> Result<Order, OrderError> {
        let id: OrderId = parse_id(EntityKind::Order, order_id)?;
        let order = self.find_order(id).await?.ok_or_else(|| OrderError::NotFound {
            entity: EntityKind::Order,
            id: id.to_string(),
        })?;
        if !caller.can_access(order.owner) {
            return Err(OrderError::Forbidden("only the owner or an admin can cancel this order"));
        }

        let (previous, held, cancelled) = match self.inner.perform_action(id, OrderAction::BeginCancel).await? {
            OrderActionResult::BeginCancel { previous, held, order } => (previous, held, order),
            _ => return Err(unexpected()),
        };

        let plan = StockPlan::from_moves(held);
        if plan.is_empty() {
            debug!(order_id = %id, "Order holds no stock");
        } else if let Err(failure) = plan.restore(&self.product_client).await {
            let mut reason = failure.error.to_string();
            let abort = OrderAction::AbortCancel {
                status: previous,
                unreturned: plan.from_step(failure.step),
            };
            if let Err(e) = self.inner.perform_action(id, abort).await {
                error!(order_id = %id, error = %e, "Failed to revert cancellation");
                reason = format!("{reason}; order left cancelled: {e}");
            }
            return Err(OrderError::PartialRestoration {
                order: id,
                restored: failure.step,
                total: plan.len(),
                reason,
            });
        }

        info!(order_id = %id, "Order cancelled");
        Ok(cancelled)
    }

    /// Sets any status except `cancelado`. Admin only; no stock side effects.
    #[instrument(skip(self), fields(account = %caller.account))]
    pub async fn update_status(&self, caller: &Caller, order_id: &str, status: &str) -> Result<Order, OrderError> {
        if !caller.is_admin() {
            return Err(OrderError::Forbidden("only admins can change order status"));
        }
        let status: OrderStatus = status
            .parse()
            .map_err(|_| OrderError::InvalidStatus(status.to_string()))?;
        if status == OrderStatus::Cancelado {
            return Err(OrderError::InvalidTransition(
                "use cancel_order to cancel an order so its stock is restored".to_string(),
            ));
        }
        let id: OrderId = parse_id(EntityKind::Order, order_id)?;

        let order = self.inner.update(id, OrderPatch { status }).await?;
        info!(order_id = %id, status = %status, "Order status updated");
        Ok(order)
    }
}
