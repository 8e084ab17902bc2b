//! Pure data structures managed by the resource actors.

pub mod caller;
pub mod ids;
pub mod mix;
pub mod order;
pub mod product;

pub use caller::*;
pub use ids::*;
pub use mix::*;
pub use order::*;
pub use product::*;

use std::fmt;

use rust_decimal::Decimal;

/// Smallest quantity accepted for an order line or a mix ingredient (0.1 lb / unit).
pub const MIN_QUANTITY: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Kind of record a lookup failed on, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    Mix,
    Order,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Product => "product",
            Self::Mix => "mix",
            Self::Order => "order",
        })
    }
}
