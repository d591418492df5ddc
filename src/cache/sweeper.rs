//! Background purge of expired entries

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::ExpiringCache;

/// Shortest allowed sweep period
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to a running sweeper task
///
/// The task stops when this handle is dropped or when the last strong
/// reference to the cache goes away, whichever happens first.
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Whether the sweeper task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Spawns a task that calls [`purge_expired`](Self::purge_expired) every
    /// `interval`
    ///
    /// The task only holds a weak reference, so it never keeps the cache
    /// alive. Must be called from within a Tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let cache: Weak<Self> = Arc::downgrade(self);
        let interval = interval.max(MIN_SWEEP_INTERVAL);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Cache dropped, stopping sweeper");
                    break;
                };
                cache.purge_expired().await;
            }
        });

        SweeperHandle { task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_unread_entries() {
        let cache = Arc::new(ExpiringCache::new());
        cache.set("once", 1, Duration::from_secs(5)).await;
        cache.set("kept", 2, Duration::from_secs(500)).await;

        let _sweeper = cache.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_when_cache_dropped() {
        let cache = Arc::new(ExpiringCache::<u32>::new());
        let sweeper = cache.spawn_sweeper(Duration::from_secs(1));

        drop(cache);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(sweeper.is_finished());
    }
}
