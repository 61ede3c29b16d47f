//! Expiration Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::Cache;

// == Sweeper ==
/// The sweeping half of a built cache, tagged by execution context.
///
/// Returned by [`CacheBuilder::build`](crate::CacheBuilder::build) alongside
/// the cache handle so the owner holds the sweeper's lifecycle explicitly
/// rather than it being an invisible side effect of construction.
#[derive(Debug)]
pub enum Sweeper {
    /// No task was scheduled; the host calls
    /// [`Cache::sweep`](crate::Cache::sweep) from its own periodic tick
    /// loop.
    Inline,
    /// A recurring background task is sweeping; the handle cancels it.
    Background(SweeperHandle),
}

impl Sweeper {
    /// Returns true if a background task is sweeping.
    pub fn is_background(&self) -> bool {
        matches!(self, Sweeper::Background(_))
    }

    /// Returns the background task handle, if any.
    pub fn handle(&self) -> Option<&SweeperHandle> {
        match self {
            Sweeper::Inline => None,
            Sweeper::Background(handle) => Some(handle),
        }
    }

    /// Stops the background task, if any. Inline sweeping has nothing to
    /// stop; the host simply stops calling sweep.
    pub fn shutdown(self) {
        if let Sweeper::Background(handle) = self {
            handle.shutdown();
        }
    }
}

// == Sweeper Handle ==
/// Cancellation handle for a running background sweeper.
///
/// The task is aborted by [`SweeperHandle::shutdown`] or when the handle is
/// dropped; entries already in the cache stay readable either way, they just
/// stop being reclaimed.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the recurring sweep task.
    pub fn shutdown(self) {
        self.handle.abort();
        debug!("expiration sweeper stopped");
    }

    /// Returns true once the task has fully terminated.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// == Spawn ==
/// Spawns the recurring background sweep task.
///
/// The task sweeps immediately on start and then once per interval, for the
/// lifetime of the handle. Must be called from within a Tokio runtime.
///
/// A sweep that removes nothing is the common case and logs at debug level
/// only; removals are logged with their count.
pub(crate) fn spawn_sweeper<K, V>(cache: Cache<K, V>, interval: Duration) -> SweeperHandle
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    let handle = tokio::spawn(async move {
        info!(
            "starting expiration sweeper with interval of {:?}",
            interval
        );

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = cache.sweep();

            if removed > 0 {
                info!("expiration sweep removed {} entries", removed);
            } else {
                debug!("expiration sweep found no expired entries");
            }
        }
    });

    SweeperHandle { handle }
}
