//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Configuration is the only failing surface of this crate: store operations
//! signal an absent key with `None` rather than an error, and invalidation
//! hook panics are contained where they occur.

use thiserror::Error;

// == Config Error Enum ==
/// Unified error type for cache configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured TTL is zero
    #[error("expire-after TTL must be greater than zero")]
    ZeroTtl,

    /// The configured sweep interval is zero
    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, ConfigError>;
