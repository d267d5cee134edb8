//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber. Every component logs with
//! structured fields, so a single order can be followed from ingestion to notification by
//! its `order_id`.
//!
//! ## Configuration
//!
//! The filter comes from `RUST_LOG` and falls back to the given default. The compact
//! format shows spans inline and hides module paths (`with_target(false)`).
//!
//! ```bash
//! # State transitions only (default)
//! RUST_LOG=info kitchen-tracker
//!
//! # Every store request, queue message and delivery attempt
//! RUST_LOG=debug kitchen-tracker
//!
//! # Quiet the HTTP stack, keep the tracker verbose
//! RUST_LOG=kitchen_tracker=debug,tracker_actor=info kitchen-tracker
//! ```
//!
//! ## What Gets Traced
//!
//! - **Ingestion**: orders added, events dropped on decode, failed acknowledgments
//! - **Readiness**: items marked ready, unknown orders and items, completion edges
//! - **Notifications**: each attempt, retries with their delay, dead letters
//! - **Store**: every actor request with `entity_type`, plus eviction counts
//!
//! With `RUST_LOG=info` a completed order reads:
//!
//! ```text
//! INFO Added order to pending orders order_id=3f2a.. items=2 replaced=false
//! INFO handle: Item is ready order_id=3f2a.. item=Taco newly_ready=1
//! INFO handle: Item is ready order_id=3f2a.. item=Churro newly_ready=1
//! INFO handle: Order is ready order_id=3f2a.. item=Churro
//! INFO Order sent to check endpoint order_id=3f2a.. attempt=1
//! ```
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, before anything logs.
pub fn setup_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
