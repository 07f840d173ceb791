//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the line that was filled earliest, regardless of how
//! recently or how often it was hit. Each line records the cycle it was
//! filled; hits leave that stamp alone.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update_replacement_state()`: O(1)
//!   - `find_victim()`: O(W) where W is the number of ways
//! - **Space Complexity:** O(S × W)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::ReplacementPolicy;
use crate::core::units::cache::metadata::LineMetadataStore;

/// FIFO Policy state.
#[derive(Debug)]
pub struct FifoPolicy {
    /// Fill cycle of every line.
    insertion_cycles: LineMetadataStore<u64>,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            insertion_cycles: LineMetadataStore::new(sets, ways),
        }
    }

    /// Returns the fill cycle of `(set, way)`.
    pub fn insertion_cycle(&self, set: usize, way: usize) -> u64 {
        *self.insertion_cycles.get(set, way)
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn initialize(&mut self, sets: usize, ways: usize) {
        self.insertion_cycles.reset(sets, ways);
    }

    /// Returns the way filled earliest.
    fn find_victim(&mut self, set: usize) -> usize {
        self.insertion_cycles.min_way_by_key(set, |cycle| *cycle)
    }

    /// Stamps the fill cycle on a miss; hits change nothing.
    fn update_replacement_state(&mut self, set: usize, way: usize, hit: bool, cycle: u64) {
        let slot = self.insertion_cycles.get_mut(set, way);
        if !hit {
            *slot = cycle;
        }
    }

    fn victim_key(&self, set: usize, way: usize) -> u64 {
        self.insertion_cycle(set, way)
    }
}
