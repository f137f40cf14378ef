//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! The cache never schedules its own sweeps; whoever builds the cache is
//! expected to spawn this task (and to abort it on shutdown).

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;

/// Spawns a background task that periodically calls [`ResponseCache::cleanup`].
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. The returned `JoinHandle` can be used to abort the task
/// during graceful shutdown.
///
/// # Arguments
/// * `cache` - A handle to the cache to sweep
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
pub fn spawn_cleanup_task<V>(
    cache: ResponseCache<V>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
