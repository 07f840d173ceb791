//! Replacement and stream-prefetch decision logic for trace-driven cache simulators.
//!
//! This crate implements what a memory-hierarchy simulator consults on every
//! cache access:
//! 1. **Replacement:** Which way to evict from a full set (BIP/LRU, FIFO, LFU).
//! 2. **Prefetching:** When to fetch ahead of a confirmed linear stream.
//! 3. **Configuration:** Per-cache JSON configuration with validation.
//! 4. **Statistics:** Per-cache decision counters and reports.
//!
//! The host simulator owns set-associative storage, translation, and fill
//! scheduling. It drives one [`CacheInstance`] per cache through the hooks
//! documented in [`core::instance`], and receives prefetch requests through
//! its own [`PrefetchSink`](core::units::prefetch::PrefetchSink).

/// Common types (block addresses, errors).
pub mod common;
/// Cache configuration (defaults, enums, loading).
pub mod config;
/// Cache instance, replacement policies, and prefetchers.
pub mod core;
/// Decision statistics collection and reporting.
pub mod stats;

/// Per-cache configuration; use `CacheConfig::default()` or load from JSON.
pub use crate::config::CacheConfig;
/// Per-cache decision state; construct with `CacheInstance::new`.
pub use crate::core::CacheInstance;
