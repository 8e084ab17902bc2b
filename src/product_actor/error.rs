use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: Decimal,
        available: Decimal,
    },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<ProductError>> for ProductError {
    fn from(error: FrameworkError<ProductError>) -> Self {
        match error {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => Self::NotFound(id),
            other @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                Self::ActorCommunicationError(other.to_string())
            }
        }
    }
}
