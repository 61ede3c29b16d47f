//! Background Tasks Module
//!
//! Contains background tasks that run periodically during cache operation.
//!
//! # Tasks
//! - Expiration Sweeper: removes entries older than the TTL at configured
//!   intervals

mod sweeper;

pub use sweeper::{Sweeper, SweeperHandle};

pub(crate) use sweeper::spawn_sweeper;
