use crate::domain::{Order, OrderStatus, StockMove};

/// Custom actions for Order entities.
///
/// These keep the order's stock ledger in step with its status; each runs
/// atomically inside the order actor.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Records stock now deducted on behalf of the order.
    HoldStock(Vec<StockMove>),
    /// Moves the order to `cancelado` and hands over the stock it held.
    ///
    /// # Errors
    /// Fails for orders already cancelled, dispatched or completed.
    BeginCancel,
    /// Reverts a cancellation whose restoration failed partway, keeping the
    /// moves that were not returned.
    AbortCancel {
        status: OrderStatus,
        unreturned: Vec<StockMove>,
    },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    HoldStock(Order),
    BeginCancel {
        previous: OrderStatus,
        held: Vec<StockMove>,
        order: Order,
    },
    AbortCancel(Order),
}
