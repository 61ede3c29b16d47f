//! Cinder Cache - an embeddable in-memory TTL cache
//!
//! Entries live until removed, cleared, or reclaimed by a periodic
//! expiration sweep, which notifies an optional invalidation hook for every
//! entry that leaves the cache. Sweeping runs inline on the host's own tick
//! loop or on a background Tokio task, fixed at build time.
//!
//! ```
//! use std::time::Duration;
//! use cinder_cache::{CacheBuilder, SweepMode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (cache, sweeper) = CacheBuilder::new()
//!     .mode(SweepMode::Background)
//!     .ttl(Duration::from_secs(30))
//!     .sweep_interval(Duration::from_millis(250))
//!     .on_invalidate(|key: &String, _value: &u32| println!("dropped {key}"))
//!     .build()
//!     .unwrap();
//!
//! cache.put("session".to_string(), 7);
//! assert_eq!(cache.get(&"session".to_string()), Some(7));
//!
//! sweeper.shutdown();
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheBuilder, CacheStats, InvalidateHook};
pub use config::{CacheConfig, SweepMode};
pub use error::{ConfigError, Result};
pub use tasks::{Sweeper, SweeperHandle};
