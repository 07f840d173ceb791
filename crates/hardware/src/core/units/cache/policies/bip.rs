//! Recency Replacement Policy with Bimodal Insertion (BIP).
//!
//! Each line carries the cycle it was last promoted and a flag telling
//! whether it currently sits at the LRU position. The victim is the line with
//! the oldest timestamp.
//!
//! On a miss the filled line is normally inserted at the MRU position (its
//! timestamp is set to the current cycle). With a small probability ε it is
//! instead left at the LRU position: the timestamp is not touched (the victim
//! slot already holds the set's minimum) and the LRU flag is raised. A line
//! inserted that way only survives if it is hit before the next eviction in
//! its set, which keeps one-shot scans from flushing the working set.
//!
//! A hit promotes a line only while it is flagged LRU; hits on a line already
//! at MRU leave its state unchanged.
//!
//! With ε = 0 every miss is an MRU insertion, which is the configured `Lru`
//! policy.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update_replacement_state()`: O(1)
//!   - `find_victim()`: O(W) where W is the number of ways
//! - **Space Complexity:** O(S × W)
//! - **Best Case:** Working sets slightly larger than the cache, interleaved scans
//! - **Worst Case:** Recency-friendly workloads with large ε

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::ReplacementPolicy;
use crate::core::units::cache::metadata::LineMetadataStore;
use crate::stats::InsertionCounts;

/// Per-line recency state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencySlot {
    /// Cycle at which the line was last inserted at, or promoted to, MRU.
    pub last_used_cycle: u64,
    /// Whether the line currently sits at the LRU position.
    pub is_lru_position: bool,
}

impl Default for RecencySlot {
    /// Unfilled lines start at cycle zero in the LRU position.
    fn default() -> Self {
        Self {
            last_used_cycle: 0,
            is_lru_position: true,
        }
    }
}

/// BIP Policy state.
#[derive(Debug)]
pub struct BipPolicy {
    /// Reported name: "BIP", or "LRU" when built with [`BipPolicy::lru`].
    name: &'static str,
    slots: LineMetadataStore<RecencySlot>,
    /// Probability of an LRU-position insertion on a miss.
    epsilon: f64,
    seed: u64,
    rng: StdRng,
    counts: InsertionCounts,
}

impl BipPolicy {
    /// Creates a new BIP policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    /// * `epsilon` - Probability in `[0, 1]` of inserting a miss at the LRU position.
    /// * `seed` - Seed for the insertion generator; re-applied on every `initialize`.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` lies outside `[0, 1]` or the geometry is empty.
    pub fn new(sets: usize, ways: usize, epsilon: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&epsilon),
            "bimodal insertion probability {epsilon} outside [0, 1]"
        );
        Self {
            name: "BIP",
            slots: LineMetadataStore::new(sets, ways),
            epsilon,
            seed,
            rng: StdRng::seed_from_u64(seed),
            counts: InsertionCounts::default(),
        }
    }

    /// Creates a policy that always inserts at MRU (plain recency).
    pub fn lru(sets: usize, ways: usize) -> Self {
        Self {
            name: "LRU",
            ..Self::new(sets, ways, 0.0, 0)
        }
    }

    /// Returns the configured LRU-insertion probability.
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the recency record of `(set, way)`.
    pub fn slot(&self, set: usize, way: usize) -> RecencySlot {
        *self.slots.get(set, way)
    }
}

impl ReplacementPolicy for BipPolicy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&mut self, sets: usize, ways: usize) {
        self.slots.reset(sets, ways);
        self.rng = StdRng::seed_from_u64(self.seed);
        self.counts = InsertionCounts::default();
    }

    fn find_victim(&mut self, set: usize) -> usize {
        self.slots.min_way_by_key(set, |slot| slot.last_used_cycle)
    }

    fn update_replacement_state(&mut self, set: usize, way: usize, hit: bool, cycle: u64) {
        let slot = self.slots.get_mut(set, way);

        if hit {
            if slot.is_lru_position {
                slot.last_used_cycle = cycle;
                slot.is_lru_position = false;
            }
            return;
        }

        if self.rng.gen_bool(self.epsilon) {
            // Timestamp stays: the filled victim already holds the set minimum.
            slot.is_lru_position = true;
            self.counts.lru += 1;
            trace!(set, way, cycle, "bip: lru-position insertion");
        } else {
            slot.last_used_cycle = cycle;
            slot.is_lru_position = false;
            self.counts.mru += 1;
        }
    }

    fn victim_key(&self, set: usize, way: usize) -> u64 {
        self.slots.get(set, way).last_used_cycle
    }

    fn insertion_counts(&self) -> InsertionCounts {
        self.counts
    }
}
