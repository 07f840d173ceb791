//! Per-cache decision state and the host hook surface.
//!
//! A [`CacheInstance`] bundles everything one simulated cache needs from this
//! crate: its replacement policy, its optional prefetcher, and the counters
//! for both. The host simulator owns tag storage, translation, and fill
//! scheduling, and calls these hooks at the matching events:
//!
//! | Host event                    | Hook                                   |
//! |-------------------------------|----------------------------------------|
//! | fill needs an eviction        | [`CacheInstance::find_victim`]         |
//! | access or fill resolved       | [`CacheInstance::update_replacement_state`] |
//! | every access                  | [`CacheInstance::prefetcher_on_access`] |
//! | every fill                    | [`CacheInstance::prefetcher_on_fill`]  |
//! | every cycle (optional)        | [`CacheInstance::cycle_tick`]          |
//! | end of simulation (optional)  | [`CacheInstance::final_stats`]         |
//!
//! State is owned by the instance; separate instances share nothing.

use tracing::debug;

use crate::common::{BlockAddr, ConfigError};
use crate::config::{CacheConfig, Prefetcher as PrefetcherType, ReplacementPolicy as PolicyType};
use crate::core::units::cache::policies::{BipPolicy, FifoPolicy, LfuPolicy, ReplacementPolicy};
use crate::core::units::prefetch::{PrefetchSink, Prefetcher, StreamPrefetcher};
use crate::stats::{CacheStats, ReplacementStats};

/// Replacement and prefetch state of one simulated cache.
#[derive(Debug)]
pub struct CacheInstance {
    name: String,
    sets: usize,
    ways: usize,
    /// log2 of the line size, for byte/block conversion.
    line_shift: u32,
    policy: Box<dyn ReplacementPolicy>,
    prefetcher: Option<Box<dyn Prefetcher>>,
    replacement_stats: ReplacementStats,
    cycles: u64,
}

impl CacheInstance {
    /// Builds an initialized instance from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (sets, ways) = (config.sets, config.ways);

        let policy: Box<dyn ReplacementPolicy> = match config.policy {
            PolicyType::Lru => Box::new(BipPolicy::lru(sets, ways)),
            PolicyType::Bip => Box::new(BipPolicy::new(sets, ways, config.bip_epsilon, config.seed)),
            PolicyType::Fifo => Box::new(FifoPolicy::new(sets, ways)),
            PolicyType::Lfu => Box::new(LfuPolicy::new(sets, ways)),
        };

        let prefetcher: Option<Box<dyn Prefetcher>> = match config.prefetcher {
            PrefetcherType::Stream => Some(Box::new(
                StreamPrefetcher::new(
                    config.prefetch_degree,
                    config.prefetch_distance,
                    config.monitor_table_size,
                )
                .with_fill_level(config.fill_level),
            )),
            PrefetcherType::None => None,
        };

        debug!(
            cache = %config.name,
            sets,
            ways,
            policy = policy.name(),
            prefetcher = prefetcher.as_ref().map_or("None", |p| p.name()),
            "cache instance created"
        );

        Ok(Self {
            name: config.name.clone(),
            sets,
            ways,
            line_shift: config.line_shift(),
            policy,
            prefetcher,
            replacement_stats: ReplacementStats::default(),
            cycles: 0,
        })
    }

    /// Cache name from the configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Number of ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The replacement policy.
    pub fn policy(&self) -> &dyn ReplacementPolicy {
        self.policy.as_ref()
    }

    /// The prefetcher, if one is attached.
    pub fn prefetcher(&self) -> Option<&dyn Prefetcher> {
        self.prefetcher.as_deref()
    }

    /// Reallocates and zeroes the replacement state for a `sets` x `ways` cache.
    ///
    /// Calling this again is a full reset of replacement state and counters.
    ///
    /// # Panics
    ///
    /// Panics if `sets` or `ways` is zero.
    pub fn initialize(&mut self, sets: usize, ways: usize) {
        self.policy.initialize(sets, ways);
        self.sets = sets;
        self.ways = ways;
        self.replacement_stats = ReplacementStats::default();
        self.cycles = 0;
        debug!(cache = %self.name, sets, ways, "replacement state initialized");
    }

    /// Empties the prefetcher's learned state.
    pub fn prefetcher_initialize(&mut self) {
        if let Some(prefetcher) = self.prefetcher.as_mut() {
            prefetcher.initialize();
            debug!(cache = %self.name, "prefetcher initialized");
        }
    }

    /// Full reset of replacement and prefetch state, keeping the geometry.
    pub fn reset(&mut self) {
        self.initialize(self.sets, self.ways);
        self.prefetcher_initialize();
    }

    /// Selects the way to evict from `set`.
    ///
    /// # Panics
    ///
    /// Panics if `set` is out of range.
    #[inline]
    pub fn find_victim(&mut self, set: usize) -> usize {
        let way = self.policy.find_victim(set);
        debug_assert!(way < self.ways, "policy returned way {way} of {}", self.ways);
        self.replacement_stats.victim_selections += 1;
        way
    }

    /// Updates replacement state after an access or fill resolves.
    ///
    /// # Arguments
    ///
    /// * `set` - Set of the accessed or filled line.
    /// * `way` - Way of the accessed or filled line.
    /// * `hit` - `true` for a hit, `false` for a miss fill.
    /// * `cycle` - The host's current cycle.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    #[inline]
    pub fn update_replacement_state(&mut self, set: usize, way: usize, hit: bool, cycle: u64) {
        self.policy.update_replacement_state(set, way, hit, cycle);
        if hit {
            self.replacement_stats.hits += 1;
        } else {
            self.replacement_stats.fills += 1;
        }
    }

    /// Forwards an access to the prefetcher.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address of the access.
    /// * `hit` - Whether the access hit.
    /// * `metadata` - Host metadata attached to the access.
    /// * `sink` - Receiver for prefetch requests (block-granular).
    ///
    /// # Returns
    ///
    /// The metadata to keep with the access; unchanged without a prefetcher.
    #[inline]
    pub fn prefetcher_on_access(
        &mut self,
        addr: u64,
        hit: bool,
        metadata: u32,
        sink: &mut dyn PrefetchSink,
    ) -> u32 {
        let block = BlockAddr::from_byte_addr(addr, self.line_shift);
        match self.prefetcher.as_mut() {
            Some(prefetcher) => prefetcher.on_access(block, hit, metadata, sink),
            None => metadata,
        }
    }

    /// Forwards a fill to the prefetcher.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address of the filled line.
    /// * `set` - Set the line was filled into.
    /// * `way` - Way the line was filled into.
    /// * `prefetch` - Whether the fill was caused by a prefetch.
    /// * `evicted_addr` - Byte address of the evicted line.
    /// * `metadata` - Host metadata attached to the fill.
    ///
    /// # Returns
    ///
    /// The metadata to keep with the line; unchanged without a prefetcher.
    #[inline]
    pub fn prefetcher_on_fill(
        &mut self,
        addr: u64,
        set: usize,
        way: usize,
        prefetch: bool,
        evicted_addr: u64,
        metadata: u32,
    ) -> u32 {
        let block = BlockAddr::from_byte_addr(addr, self.line_shift);
        let evicted = BlockAddr::from_byte_addr(evicted_addr, self.line_shift);
        match self.prefetcher.as_mut() {
            Some(prefetcher) => prefetcher.on_fill(block, set, way, prefetch, evicted, metadata),
            None => metadata,
        }
    }

    /// Advances one host cycle.
    pub fn cycle_tick(&mut self) {
        self.cycles += 1;
        if let Some(prefetcher) = self.prefetcher.as_mut() {
            prefetcher.cycle_tick();
        }
    }

    /// Returns a snapshot of all counters.
    pub fn stats(&self) -> CacheStats {
        let mut replacement = self.replacement_stats.clone();
        replacement.insertions = self.policy.insertion_counts();
        CacheStats {
            name: self.name.clone(),
            policy: self.policy.name(),
            prefetcher: self.prefetcher.as_ref().map(|p| p.name()),
            cycles: self.cycles,
            replacement,
            prefetch: self.prefetcher.as_ref().map(|p| p.stats()),
        }
    }

    /// Prints the end-of-simulation report to stdout.
    pub fn final_stats(&self) {
        self.stats().print();
    }
}
