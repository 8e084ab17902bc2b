use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{EntityKind, OrderId, MIN_QUANTITY};
use crate::mix_actor::MixError;
use crate::product_actor::ProductError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: Decimal,
        available: Decimal,
    },
    #[error("Invalid {entity} reference: {value}")]
    InvalidReference { entity: EntityKind, value: String },
    #[error("Order has no line items")]
    EmptyOrder,
    #[error("Invalid quantity {0}: minimum is {min}", min = MIN_QUANTITY)]
    InvalidQuantity(Decimal),
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
    #[error("Order {order} was not cancelled: restored {restored} of {total} stock moves before failing: {reason}")]
    PartialRestoration {
        order: OrderId,
        restored: usize,
        total: usize,
        reason: String,
    },
    #[error("Order {order} left {remaining} stock deductions applied after a failed rollback: {reason}")]
    CompensationFailed {
        order: OrderId,
        remaining: usize,
        reason: String,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FrameworkError<OrderError>> for OrderError {
    fn from(error: FrameworkError<OrderError>) -> Self {
        match error {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => Self::NotFound { entity: EntityKind::Order, id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ProductError> for OrderError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(id) => Self::NotFound { entity: EntityKind::Product, id },
            ProductError::InsufficientStock { product, requested, available } => {
                Self::InsufficientStock { product, requested, available }
            }
            ProductError::InvalidQuantity(quantity) => Self::InvalidQuantity(quantity),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<MixError> for OrderError {
    fn from(error: MixError) -> Self {
        match error {
            MixError::NotFound { entity, id } => Self::NotFound { entity, id },
            MixError::InsufficientStock { product, requested, available } => {
                Self::InsufficientStock { product, requested, available }
            }
            other => Self::Internal(other.to_string()),
        }
    }
}
