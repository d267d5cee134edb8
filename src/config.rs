//! Runtime configuration, read from command-line flags or the environment.

use crate::ingestion::IngestionSettings;
use crate::notifier::RetryPolicy;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max batch size must be at least 1")]
    ZeroBatchSize,

    #[error("notifications need at least one attempt")]
    ZeroAttempts,

    #[error("max backoff ({max_ms} ms) is below the initial backoff ({initial_ms} ms)")]
    BackoffRange { initial_ms: u64, max_ms: u64 },

    #[error("poll wait must be at least one second")]
    ZeroPollWait,

    #[error("sweep interval must be non-zero")]
    ZeroSweepInterval,
}

/// Kitchen order readiness tracker.
#[derive(Debug, Clone, Parser)]
#[command(name = "kitchen-tracker", version, about)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "KITCHEN_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Endpoint that receives completed orders. Without it notifications are only logged.
    #[arg(long, env = "CHECK")]
    pub check_url: Option<String>,

    /// Order events pulled per ingestion cycle.
    #[arg(long, env = "KITCHEN_MAX_BATCH", default_value_t = 5)]
    pub max_batch: usize,

    /// Longest a single ingestion pull waits for events. Also bounds shutdown latency.
    #[arg(long, env = "KITCHEN_POLL_WAIT_SECS", default_value_t = 3)]
    pub poll_wait_secs: u64,

    #[arg(long, env = "KITCHEN_VISIBILITY_TIMEOUT_SECS", default_value_t = 30)]
    pub visibility_timeout_secs: u64,

    #[arg(long, env = "KITCHEN_NOTIFY_MAX_ATTEMPTS", default_value_t = 5)]
    pub notify_max_attempts: u32,

    #[arg(long, env = "KITCHEN_NOTIFY_BACKOFF_MS", default_value_t = 200)]
    pub notify_initial_backoff_ms: u64,

    #[arg(long, env = "KITCHEN_NOTIFY_MAX_BACKOFF_MS", default_value_t = 10_000)]
    pub notify_max_backoff_ms: u64,

    /// Per-request timeout for the check endpoint.
    #[arg(long, env = "KITCHEN_NOTIFY_TIMEOUT_SECS", default_value_t = 5)]
    pub notify_timeout_secs: u64,

    /// How long completed orders are kept before eviction.
    #[arg(long, env = "KITCHEN_RETENTION_SECS", default_value_t = 600)]
    pub retention_secs: u64,

    #[arg(long, env = "KITCHEN_SWEEP_INTERVAL_SECS", default_value_t = 30)]
    pub sweep_interval_secs: u64,

    /// Notify for orders that arrive with no items.
    #[arg(
        long,
        env = "KITCHEN_NOTIFY_EMPTY_ORDERS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub notify_empty_orders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            check_url: None,
            max_batch: 5,
            poll_wait_secs: 3,
            visibility_timeout_secs: 30,
            notify_max_attempts: 5,
            notify_initial_backoff_ms: 200,
            notify_max_backoff_ms: 10_000,
            notify_timeout_secs: 5,
            retention_secs: 600,
            sweep_interval_secs: 30,
            notify_empty_orders: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.notify_max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.notify_max_backoff_ms < self.notify_initial_backoff_ms {
            return Err(ConfigError::BackoffRange {
                initial_ms: self.notify_initial_backoff_ms,
                max_ms: self.notify_max_backoff_ms,
            });
        }
        if self.poll_wait_secs == 0 {
            return Err(ConfigError::ZeroPollWait);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }

    pub fn ingestion_settings(&self) -> IngestionSettings {
        IngestionSettings {
            max_batch: self.max_batch,
            poll_wait: Duration::from_secs(self.poll_wait_secs),
            notify_empty_orders: self.notify_empty_orders,
            ..IngestionSettings::default()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.notify_max_attempts,
            initial_backoff: Duration::from_millis(self.notify_initial_backoff_ms),
            max_backoff: Duration::from_millis(self.notify_max_backoff_ms),
            ..RetryPolicy::default()
        }
    }

    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
