//! Order store plus the stock saga the order engine runs against the catalog.

mod actions;
pub mod entity;
pub mod error;
pub mod saga;

pub use actions::*;
pub use error::*;
pub use saga::StockPlan;
