use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{EntityKind, MIN_QUANTITY};
use crate::product_actor::ProductError;

/// Errors that can occur while composing or reading mixes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MixError {
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
    #[error("Mix name is required")]
    MissingName,
    #[error("A mix needs at least one ingredient")]
    EmptyMix,
    #[error("Invalid quantity {0} lb: minimum is {min} lb", min = MIN_QUANTITY)]
    InvalidQuantity(Decimal),
    #[error("Invalid product reference: {0}")]
    InvalidReference(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: Decimal,
        available: Decimal,
    },
    #[error("Mixes cannot be modified after creation")]
    Immutable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FrameworkError<MixError>> for MixError {
    fn from(error: FrameworkError<MixError>) -> Self {
        match error {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => Self::NotFound { entity: EntityKind::Mix, id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ProductError> for MixError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(id) => Self::NotFound { entity: EntityKind::Product, id },
            ProductError::InsufficientStock { product, requested, available } => {
                Self::InsufficientStock { product, requested, available }
            }
            other => Self::Internal(other.to_string()),
        }
    }
}
