//! Type-safe wrappers around [`ResourceClient`](tracker_actor::ResourceClient).

pub mod order_client;

pub use order_client::*;
