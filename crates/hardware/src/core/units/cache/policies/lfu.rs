//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Each line carries an access counter and the victim is the line with the
//! smallest count. Every update increments the counter; a miss fill then
//! clears it, so after a fill the new line starts at zero.
//!
//! The counter therefore tracks hits accumulated since the slot was last
//! filled, not total lifetime accesses to the address. A freshly filled line
//! has the lowest possible count and is the preferred victim until it earns
//! a hit.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update_replacement_state()`: O(1)
//!   - `find_victim()`: O(W) where W is the number of ways
//! - **Space Complexity:** O(S × W)
//! - **Best Case:** Skewed reuse where a few lines take most hits
//! - **Worst Case:** Phase changes (stale hot lines linger)

use super::ReplacementPolicy;
use crate::core::units::cache::metadata::LineMetadataStore;

/// LFU Policy state.
#[derive(Debug)]
pub struct LfuPolicy {
    /// Hits since fill, per line.
    access_counts: LineMetadataStore<u64>,
}

impl LfuPolicy {
    /// Creates a new LFU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            access_counts: LineMetadataStore::new(sets, ways),
        }
    }

    /// Returns the access count of `(set, way)`.
    pub fn access_count(&self, set: usize, way: usize) -> u64 {
        *self.access_counts.get(set, way)
    }
}

impl ReplacementPolicy for LfuPolicy {
    fn name(&self) -> &'static str {
        "LFU"
    }

    fn initialize(&mut self, sets: usize, ways: usize) {
        self.access_counts.reset(sets, ways);
    }

    fn find_victim(&mut self, set: usize) -> usize {
        self.access_counts.min_way_by_key(set, |count| *count)
    }

    fn update_replacement_state(&mut self, set: usize, way: usize, hit: bool, _cycle: u64) {
        let count = self.access_counts.get_mut(set, way);
        *count += 1;
        if !hit {
            *count = 0;
        }
    }

    fn victim_key(&self, set: usize, way: usize) -> u64 {
        self.access_count(set, way)
    }
}
