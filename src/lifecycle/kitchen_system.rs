use crate::api::AppState;
use crate::clients::OrderClient;
use crate::config::Config;
use crate::ingestion::{IngestionAdapter, IngestionSource, MemoryQueue};
use crate::lifecycle::eviction::run_sweeper;
use crate::notifier::{
    CompletionNotifier, HttpNotifier, LogNotifier, NotificationError, NotificationOutbox,
    OutboxStats,
};
use crate::readiness::ReadinessHandler;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("{task} task failed: {source}")]
    TaskFailed {
        task: &'static str,
        #[source]
        source: JoinError,
    },
}

/// The runtime orchestrator for the kitchen tracker.
///
/// `KitchenSystem` owns every long-lived task:
/// - the order actor (the Order Store)
/// - the ingestion loop feeding it
/// - the notification outbox worker
/// - the eviction sweeper
///
/// The HTTP server is not owned here. Build its state with [`KitchenSystem::app_state`]
/// and bind its graceful shutdown to [`KitchenSystem::stop_token`].
///
/// # Example
///
/// ```ignore
/// let queue = Arc::new(MemoryQueue::new(config.visibility_timeout()));
/// let system = KitchenSystem::start(&config, queue.clone(), build_notifier(&config)?);
///
/// let app = api::router(system.app_state(Some(queue)));
/// api::serve(config.listen_addr, app, system.stop_token()).await?;
///
/// system.shutdown().await?;
/// ```
pub struct KitchenSystem {
    pub orders: OrderClient,
    pub readiness: ReadinessHandler,
    stop: CancellationToken,
    outbox_stop: CancellationToken,
    actor: JoinHandle<()>,
    ingestion: JoinHandle<()>,
    sweeper: JoinHandle<()>,
    outbox: JoinHandle<OutboxStats>,
}

impl KitchenSystem {
    /// Spawns the order actor and every task that feeds or drains it.
    pub fn start(
        config: &Config,
        source: Arc<dyn IngestionSource>,
        notifier: Arc<dyn CompletionNotifier>,
    ) -> Self {
        let stop = CancellationToken::new();
        // Cancelled only once ingestion has finished
        let outbox_stop = CancellationToken::new();

        let (order_actor, order_client) = crate::order_actor::new();
        let actor = tokio::spawn(order_actor.run());
        let orders = OrderClient::new(order_client);

        let (outbox, outbox_handle) =
            NotificationOutbox::start(notifier, config.retry_policy(), outbox_stop.clone());
        let readiness = ReadinessHandler::new(orders.clone(), outbox.clone());

        let adapter =
            IngestionAdapter::new(source, orders.clone(), outbox, config.ingestion_settings());
        let ingestion = tokio::spawn(adapter.run(stop.clone()));

        let sweeper = tokio::spawn(run_sweeper(
            orders.clone(),
            config.retention(),
            config.sweep_interval(),
            stop.clone(),
        ));

        info!("Kitchen system started");
        Self {
            orders,
            readiness,
            stop,
            outbox_stop,
            actor,
            ingestion,
            sweeper,
            outbox: outbox_handle,
        }
    }

    /// Cancelled when shutdown begins.
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// State for the HTTP router. `queue` enables `POST /order`.
    pub fn app_state(&self, queue: Option<Arc<MemoryQueue>>) -> AppState {
        AppState {
            orders: self.orders.clone(),
            readiness: self.readiness.clone(),
            queue,
            hostname: std::env::var("HOSTNAME").ok(),
        }
    }

    /// Stops every task and waits for it.
    ///
    /// 1. Ingestion and the sweeper stop at their next cycle.
    /// 2. The outbox gives each queued notification one last attempt.
    /// 3. The order actor exits once the last client is dropped.
    ///
    /// Clients cloned out of the system (including any [`AppState`]) must be dropped
    /// before calling this, or step 3 never finishes.
    pub async fn shutdown(self) -> Result<OutboxStats, SystemError> {
        info!("Shutting down kitchen system...");
        self.stop.cancel();
        join("ingestion", self.ingestion).await?;
        join("sweeper", self.sweeper).await?;

        self.outbox_stop.cancel();
        let stats = join("outbox", self.outbox).await?;

        drop(self.readiness);
        drop(self.orders);
        join("order actor", self.actor).await?;

        info!(
            delivered = stats.delivered,
            dead_lettered = stats.dead_lettered,
            "Kitchen system shutdown complete."
        );
        Ok(stats)
    }
}

async fn join<T>(task: &'static str, handle: JoinHandle<T>) -> Result<T, SystemError> {
    handle.await.map_err(|source| {
        error!(task, error = %source, "Task failed");
        SystemError::TaskFailed { task, source }
    })
}

/// The check endpoint notifier when one is configured, otherwise a logging stand-in.
pub fn build_notifier(config: &Config) -> Result<Arc<dyn CompletionNotifier>, NotificationError> {
    match &config.check_url {
        Some(url) => {
            info!(url = %url, "Sending completed orders to check endpoint");
            Ok(Arc::new(HttpNotifier::new(url.clone(), config.notify_timeout())?))
        }
        None => {
            info!("No check endpoint configured, completed orders will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}
