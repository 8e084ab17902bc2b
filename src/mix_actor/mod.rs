//! Mix store and the pricing arithmetic behind mix composition.

pub mod composer;
pub mod entity;
pub mod error;

pub use composer::PricedIngredient;
pub use error::*;
