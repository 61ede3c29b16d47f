//! Cache Builder Module
//!
//! The only way to obtain a cache. The builder fixes the sweep mode, TTL,
//! sweep interval and invalidation hook for the cache's entire life, and
//! validates the configuration before anything starts running.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::handle::{Cache, InvalidateHook};
use crate::config::{CacheConfig, SweepMode};
use crate::error::Result;
use crate::tasks::{spawn_sweeper, Sweeper};

// == Cache Builder ==
/// Builder for [`Cache`] instances.
///
/// ```
/// use std::time::Duration;
/// use cinder_cache::CacheBuilder;
///
/// let (cache, _sweeper) = CacheBuilder::new()
///     .ttl(Duration::from_secs(30))
///     .build()
///     .unwrap();
///
/// cache.put("greeting", "hello");
/// assert_eq!(cache.get(&"greeting"), Some("hello"));
/// ```
pub struct CacheBuilder<K, V> {
    config: CacheConfig,
    on_invalidate: Option<InvalidateHook<K, V>>,
}

impl<K, V> CacheBuilder<K, V> {
    // == Constructor ==
    /// Creates a builder with the default configuration: inline sweeping,
    /// 60 second TTL, 1 second sweep interval, no invalidation hook.
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
            on_invalidate: None,
        }
    }

    // == Mode ==
    /// Sets where the expiration sweeper runs.
    pub fn mode(mut self, mode: SweepMode) -> Self {
        self.config.mode = mode;
        self
    }

    // == TTL ==
    /// Sets the duration after which entries become eligible for expiry.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl = ttl;
        self
    }

    // == Sweep Interval ==
    /// Sets the interval between expiration sweeps.
    ///
    /// In [`SweepMode::Inline`] this is advisory — the host's tick cadence
    /// governs — but it is still validated and reported by
    /// [`Cache::sweep_interval`].
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    // == Invalidation Hook ==
    /// Sets the hook invoked once for each entry that leaves the cache via
    /// removal, clear or expiry.
    pub fn on_invalidate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        self.on_invalidate = Some(Arc::new(hook));
        self
    }
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Build ==
    /// Validates the configuration and assembles the cache.
    ///
    /// Returns the cache handle together with its [`Sweeper`]: in
    /// [`SweepMode::Inline`] the host drives [`Cache::sweep`] itself; in
    /// [`SweepMode::Background`] the recurring sweep task is already running
    /// and the returned handle cancels it (explicitly or on drop).
    ///
    /// Background mode must be built from within a Tokio runtime, since the
    /// sweeper is spawned here.
    ///
    /// # Errors
    /// [`ConfigError`](crate::ConfigError) if the TTL or sweep interval is
    /// zero.
    pub fn build(self) -> Result<(Cache<K, V>, Sweeper)> {
        self.config.validate()?;

        let mode = self.config.mode;
        let sweep_interval = self.config.sweep_interval;
        let cache = Cache::new(self.config, self.on_invalidate);

        let sweeper = match mode {
            SweepMode::Inline => Sweeper::Inline,
            SweepMode::Background => {
                Sweeper::Background(spawn_sweeper(cache.clone(), sweep_interval))
            }
        };

        Ok((cache, sweeper))
    }
}

impl<K, V> Default for CacheBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_builder_defaults() {
        let (cache, sweeper) = CacheBuilder::<String, u32>::new().build().unwrap();

        assert_eq!(cache.mode(), SweepMode::Inline);
        assert_eq!(cache.ttl(), Duration::from_secs(60));
        assert_eq!(cache.sweep_interval(), Duration::from_secs(1));
        assert!(!sweeper.is_background());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_builder_rejects_zero_ttl() {
        let result = CacheBuilder::<String, u32>::new()
            .ttl(Duration::ZERO)
            .build();

        assert_eq!(result.err(), Some(ConfigError::ZeroTtl));
    }

    #[test]
    fn test_builder_rejects_zero_sweep_interval() {
        let result = CacheBuilder::<String, u32>::new()
            .sweep_interval(Duration::ZERO)
            .build();

        assert_eq!(result.err(), Some(ConfigError::ZeroSweepInterval));
    }

    #[test]
    fn test_builder_applies_settings() {
        let (cache, _sweeper) = CacheBuilder::<String, u32>::new()
            .ttl(Duration::from_millis(500))
            .sweep_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        assert_eq!(cache.ttl(), Duration::from_millis(500));
        assert_eq!(cache.sweep_interval(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_builder_background_mode_returns_handle() {
        let (cache, sweeper) = CacheBuilder::<String, u32>::new()
            .mode(SweepMode::Background)
            .build()
            .unwrap();

        assert_eq!(cache.mode(), SweepMode::Background);
        assert!(sweeper.is_background());

        sweeper.shutdown();
    }

    #[test]
    fn test_builder_hook_is_wired() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let fired = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&fired);
        let (cache, _sweeper) = CacheBuilder::new()
            .on_invalidate(move |_key: &String, _value: &u32| {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        cache.put("key1".to_string(), 1);
        cache.remove(&"key1".to_string());

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
