//! Domain types: orders, their items, and their JSON forms.

pub mod order;
pub mod wire;

pub use order::*;
pub use wire::*;
