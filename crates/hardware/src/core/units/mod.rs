//! Decision units consulted by the host cache.
//!
//! This module contains the replacement policies and the prefetchers. Neither
//! calls the other; both are driven by the host through a
//! [`CacheInstance`](crate::core::CacheInstance).

/// Replacement policies and their per-line metadata.
pub mod cache;

/// Hardware prefetcher implementations (stream).
pub mod prefetch;
