//! Runtime orchestration and lifecycle management.
//!
//! - [`KitchenSystem`] starts the order actor and the tasks around it, and shuts them down
//!   in dependency order
//! - [`run_sweeper`] evicts completed orders after the retention window
//! - [`setup_tracing`] initializes logging

pub mod eviction;
pub mod kitchen_system;
pub mod tracing;

pub use eviction::run_sweeper;
pub use kitchen_system::*;
pub use self::tracing::setup_tracing;
