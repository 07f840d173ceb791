//! Cache decision core.
//!
//! This module contains the per-cache aggregate the host talks to and the
//! decision units behind it.

/// Per-cache state and host hooks.
pub mod instance;

/// Decision units (replacement policies, prefetchers).
pub mod units;

pub use self::instance::CacheInstance;
