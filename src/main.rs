//! # Kitchen Tracker
//!
//! Runs the order readiness tracker as a service:
//! 1. Parses [`Config`] from flags and the environment.
//! 2. Starts the [`KitchenSystem`] fed by an in-process queue.
//! 3. Serves the HTTP API until Ctrl-C, then shuts everything down in order.

use anyhow::Context;
use clap::Parser;
use kitchen_tracker::api;
use kitchen_tracker::config::Config;
use kitchen_tracker::ingestion::MemoryQueue;
use kitchen_tracker::lifecycle::{build_notifier, setup_tracing, KitchenSystem};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing("info");

    let config = Config::parse();
    config.validate().context("invalid configuration")?;
    info!(listen = %config.listen_addr, "Starting kitchen tracker");

    let queue = Arc::new(MemoryQueue::new(config.visibility_timeout()));
    let notifier = build_notifier(&config).context("failed to build check endpoint client")?;
    let system = KitchenSystem::start(&config, queue.clone(), notifier);

    let stop = system.stop_token();
    tokio::spawn({
        let stop = stop.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl-C, shutting down"),
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
            }
            stop.cancel();
        }
    });

    let app = api::router(system.app_state(Some(queue)));
    let served = api::serve(config.listen_addr, app, stop.clone()).await;
    // Shut down whether or not the server exited cleanly
    stop.cancel();

    let stats = system.shutdown().await.context("shutdown failed")?;
    served.context("HTTP server failed")?;
    info!(
        delivered = stats.delivered,
        dead_lettered = stats.dead_lettered,
        "Kitchen tracker stopped"
    );
    Ok(())
}
