use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use crate::db;

/// Sweep cadence for dead session rows.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Background job that deletes expired and revoked sessions on a cadence.
///
/// Session lookups already filter out dead rows, so the sweep exists only to
/// keep the table from growing without bound.
#[derive(Clone)]
pub struct SessionSweepJob {
    pool: PgPool,
    interval: Duration,
}

impl SessionSweepJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Run the sweep loop. Intended to be spawned on the Tokio runtime.
    pub async fn run(self) {
        let mut ticker = interval_at(Instant::now() + Duration::from_secs(60), self.interval);
        info!("Session sweep job started (interval: {:?})", self.interval);

        loop {
            ticker.tick().await;

            match db::sessions::delete_dead_sessions(&self.pool).await {
                Ok(0) => debug!("No dead sessions to sweep"),
                Ok(count) => info!(count, "Swept dead sessions"),
                Err(err) => error!("Session sweep failed: {}", err),
            }
        }
    }

    /// Spawn the sweep loop as a Tokio task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
