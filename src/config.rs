//! Configuration Module
//!
//! Defines the fixed parameters of a cache: sweep execution mode, entry
//! time-to-live and the interval between expiration sweeps. A configuration
//! is validated once, at build time, and never changes for the life of the
//! cache.

use std::time::Duration;

use crate::error::{ConfigError, Result};

// == Defaults ==
/// Default time-to-live for cache entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Default interval between expiration sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

// == Sweep Mode ==
/// Where the expiration sweeper runs.
///
/// The mode is chosen once at build time and fixed for the cache's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepMode {
    /// The host drives sweeping by calling [`Cache::sweep`] from its own
    /// periodic tick loop; the cache schedules nothing itself.
    ///
    /// [`Cache::sweep`]: crate::Cache::sweep
    #[default]
    Inline,
    /// A background Tokio task sweeps on a fixed interval. Building a cache
    /// in this mode requires an ambient Tokio runtime.
    Background,
}

// == Cache Config ==
/// Cache configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Sweep execution mode
    pub mode: SweepMode,
    /// Duration after which an entry becomes eligible for expiry
    pub ttl: Duration,
    /// Interval between expiration sweeps
    pub sweep_interval: Duration,
}

impl CacheConfig {
    /// Checks the configuration for values the cache cannot operate with.
    ///
    /// Rejected here, at build time, rather than surfacing as misbehavior
    /// on the first sweep.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: SweepMode::default(),
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.mode, SweepMode::Inline);
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_ttl() {
        let config = CacheConfig {
            ttl: Duration::ZERO,
            ..CacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTtl));
    }

    #[test]
    fn test_config_rejects_zero_sweep_interval() {
        let config = CacheConfig {
            sweep_interval: Duration::ZERO,
            ..CacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSweepInterval));
    }
}
