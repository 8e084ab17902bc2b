//! Inventory-aware order engine for a custom snack-mix shop.
//!
//! Catalog, mix and order stores each run as a [`ResourceActor`](actor_framework::ResourceActor);
//! the domain clients in [`clients`] orchestrate them.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod mix_actor;
pub mod order_actor;
pub mod product_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod test_support;
