//! Typed handles over the resource actors. Cross-store orchestration lives here.

#[macro_use]
mod macros;

pub mod mix_client;
pub mod order_client;
pub mod product_client;

pub use mix_client::MixClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
