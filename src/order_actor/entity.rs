use chrono::Utc;

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId, OrderPatch, OrderStatus};

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order starts as `pendiente` holding no stock. Lines and total
    /// arrive already priced.
    fn from_create(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let now = Utc::now();
        Ok(Self {
            id,
            owner: params.owner,
            lines: params.lines,
            total: params.total,
            status: OrderStatus::Pendiente,
            held_stock: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets the status. No other field changes.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        self.status = patch.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::HoldStock(moves) => {
                self.held_stock.extend(moves);
                self.updated_at = Utc::now();
                Ok(OrderActionResult::HoldStock(self.clone()))
            }
            OrderAction::BeginCancel => {
                if self.status == OrderStatus::Cancelado {
                    return Err(OrderError::InvalidTransition(format!(
                        "order {} is already cancelled",
                        self.id
                    )));
                }
                if self.status.is_shipped() {
                    return Err(OrderError::InvalidTransition(format!(
                        "order {} is {} and can no longer be cancelled",
                        self.id, self.status
                    )));
                }
                let previous = self.status;
                self.status = OrderStatus::Cancelado;
                let held = std::mem::take(&mut self.held_stock);
                self.updated_at = Utc::now();
                Ok(OrderActionResult::BeginCancel {
                    previous,
                    held,
                    order: self.clone(),
                })
            }
            OrderAction::AbortCancel { status, unreturned } => {
                self.status = status;
                self.held_stock.extend(unreturned);
                self.updated_at = Utc::now();
                Ok(OrderActionResult::AbortCancel(self.clone()))
            }
        }
    }
}
