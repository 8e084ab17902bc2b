//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod error;
pub mod order_system;
pub mod seed;
pub mod telemetry;

pub use config::*;
pub use error::*;
pub use order_system::*;
pub use seed::*;
pub use telemetry::*;
