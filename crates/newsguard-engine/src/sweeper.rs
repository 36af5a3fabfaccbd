//! Cooldown and lifecycle sweeper
//!
//! Background task that periodically asks the store to release expired
//! cooldowns and evict idle clusters. Runs on its own schedule and takes the
//! same lane locks as ingestion, so cancellation can never leave a cluster
//! mid-update.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::store::{epoch_ms_now, ClusterStore};

/// Handle to the periodic sweep task.
///
/// Dropping the manager without calling [`stop`](Self::stop) aborts the task
/// on the next tick boundary via the shutdown notify.
pub struct CooldownManager {
    shutdown: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CooldownManager {
    /// Spawn the sweep loop against a shared store.
    pub fn start(store: Arc<ClusterStore>) -> Self {
        let shutdown = Arc::new(Notify::new());
        let notified = shutdown.clone();
        let period = Duration::from_millis(store.config().sweep_interval_ms);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(period_ms = period.as_millis() as u64, "sweeper started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let stats = store.sweep(epoch_ms_now()).await;
                        debug!(
                            released = stats.released_cooldowns,
                            evicted = stats.evicted,
                            "sweep tick"
                        );
                    }
                    _ = notified.notified() => {
                        info!("sweeper stopping");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Request shutdown and wait for the loop to finish its current pass.
    pub async fn stop(&self) {
        self.shutdown.notify_one();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for CooldownManager {
    fn drop(&mut self) {
        // best effort: wake the loop so it exits even without stop()
        self.shutdown.notify_one();
    }
}
