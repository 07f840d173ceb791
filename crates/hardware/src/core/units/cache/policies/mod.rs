//! Cache Replacement Policies.
//!
//! Implements the algorithms the host consults to select victim lines in a
//! set-associative cache. Every policy keeps one record per line in a
//! [`LineMetadataStore`](super::metadata::LineMetadataStore) and picks the way
//! with the minimal ordering key, lowest way index on ties.
//!
//! # Policies
//!
//! - `Bip`: Recency ordering with bimodal insertion (plain LRU insertion when ε = 0).
//! - `Fifo`: First-In, First-Out by fill cycle.
//! - `Lfu`: Least Frequently Used by hits since fill.

use std::fmt;

use crate::stats::InsertionCounts;

/// Recency policy with bimodal insertion.
pub mod bip;

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Frequently Used replacement policy.
pub mod lfu;

pub use bip::{BipPolicy, RecencySlot};
pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating per-line state and selecting victim
/// lines. All calls for one cache are strictly sequential; implementations
/// hold no shared state.
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Short policy name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Allocates and zeroes all per-line state for a `sets` x `ways` cache.
    ///
    /// Calling this again is a full reset.
    fn initialize(&mut self, sets: usize, ways: usize);

    /// Selects a victim line to evict from a specific set.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// The way with the minimal ordering key, lowest index on ties.
    ///
    /// # Panics
    ///
    /// Panics if `set` is out of range.
    fn find_victim(&mut self, set: usize) -> usize;

    /// Updates the policy state after an access or fill resolves.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way that was hit or filled.
    /// * `hit` - `true` for a hit, `false` for a miss fill.
    /// * `cycle` - The host's current cycle.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    fn update_replacement_state(&mut self, set: usize, way: usize, hit: bool, cycle: u64);

    /// Returns the ordering key of `(set, way)`; the victim minimizes it.
    fn victim_key(&self, set: usize, way: usize) -> u64;

    /// Returns MRU/LRU insertion counts for policies that choose an
    /// insertion position. Policies without one report zeros.
    fn insertion_counts(&self) -> InsertionCounts {
        InsertionCounts::default()
    }
}
