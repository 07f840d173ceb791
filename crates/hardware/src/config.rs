//! Configuration for a simulated cache instance.
//!
//! This module defines the structures used to parameterize replacement and
//! prefetching for one cache. It provides:
//! 1. **Defaults:** Baseline geometry and stream prefetcher constants.
//! 2. **Enums:** Replacement policy, prefetcher, and prefetch fill level.
//! 3. **Loading:** JSON deserialization from strings or files, with validation.
//!
//! The host simulator decides which caches exist; each one is configured with
//! a [`CacheConfig`] and turned into a [`CacheInstance`](crate::CacheInstance).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Default number of sets (2048 sets x 16 ways x 64 B = 2 MiB LLC slice).
    pub const SETS: usize = 2048;

    /// Default associativity.
    pub const WAYS: usize = 16;

    /// Default cache line size in bytes.
    pub const LINE_BYTES: usize = 64;

    /// Default bimodal insertion probability (1/32).
    ///
    /// Probability that a miss fill is inserted at the LRU position instead
    /// of the MRU position.
    pub const BIP_EPSILON: f64 = 1.0 / 32.0;

    /// Default seed for the bimodal insertion generator.
    pub const SEED: u64 = 0x5EED_CAC4E;

    /// Number of lines requested per stream trigger.
    pub const PREFETCH_DEGREE: u64 = 3;

    /// Lookahead distance of a stream's monitored window, in blocks.
    pub const PREFETCH_DISTANCE: u64 = 8;

    /// Number of streams tracked concurrently.
    pub const MONITOR_TABLE_SIZE: usize = 64;

    /// Largest supported `sets * ways`.
    ///
    /// Keeps a per-line record of up to 64 bytes within one allocation.
    pub const MAX_LINES: usize = isize::MAX as usize / 64;

    /// Largest stream degree or distance; stream offsets are signed 64-bit.
    pub const MAX_PREFETCH_STRIDE: u64 = i64::MAX as u64;

    /// Largest stream table; the table is allocated up front.
    pub const MAX_MONITOR_TABLE_SIZE: usize = 1 << 16;

    /// Default cache name used in logs and reports.
    pub const NAME: &str = "LLC";
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which line to evict when a new
/// line must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Recency ordering with every miss inserted at the MRU position.
    ///
    /// Equivalent to bimodal insertion with a probability of zero.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Bimodal insertion.
    ///
    /// Recency ordering where a miss is inserted at the LRU position with
    /// probability `bip_epsilon`, resisting pollution from large scans.
    #[serde(alias = "Bip")]
    Bip,
    /// First In First Out replacement policy.
    ///
    /// Evicts the line filled earliest, regardless of hits.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Least Frequently Used replacement policy.
    ///
    /// Evicts the line with the fewest hits since it was filled.
    #[serde(alias = "Lfu")]
    Lfu,
}

/// Hardware prefetcher types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Prefetcher {
    /// No prefetching enabled.
    #[default]
    None,
    /// Stream prefetcher.
    ///
    /// Tracks streams started by demand fills, confirms their direction from
    /// subsequent misses, and prefetches a burst of lines past each
    /// confirmed stream's window.
    Stream,
}

/// Level of the hierarchy a prefetched line should be filled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FillLevel {
    /// Fill the prefetched line into the cache that issued the request.
    #[default]
    ThisLevel,
    /// Fill only into the next level below the issuing cache.
    NextLevel,
}

/// Configuration of one cache instance.
///
/// # Examples
///
/// ```
/// use rvsim_cachepolicy::config::{CacheConfig, Prefetcher, ReplacementPolicy};
///
/// let json = r#"{
///     "name": "L2",
///     "sets": 1024,
///     "ways": 8,
///     "policy": "BIP",
///     "bip_epsilon": 0.03125,
///     "prefetcher": "Stream"
/// }"#;
///
/// let config = CacheConfig::from_json_str(json).unwrap();
/// assert_eq!(config.policy, ReplacementPolicy::Bip);
/// assert_eq!(config.prefetcher, Prefetcher::Stream);
/// assert_eq!(config.prefetch_degree, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Name used in logs and statistics reports
    #[serde(default = "CacheConfig::default_name")]
    pub name: String,

    /// Number of sets
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Cache line size in bytes (power of two)
    #[serde(default = "CacheConfig::default_line_bytes")]
    pub line_bytes: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Probability of LRU-position insertion (BIP only)
    #[serde(default = "CacheConfig::default_bip_epsilon")]
    pub bip_epsilon: f64,

    /// Seed for the insertion generator (BIP only)
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,

    /// Hardware prefetcher type
    #[serde(default)]
    pub prefetcher: Prefetcher,

    /// Lines requested per stream trigger
    #[serde(default = "CacheConfig::default_prefetch_degree")]
    pub prefetch_degree: u64,

    /// Monitored window length in blocks
    #[serde(default = "CacheConfig::default_prefetch_distance")]
    pub prefetch_distance: u64,

    /// Stream table capacity
    #[serde(default = "CacheConfig::default_monitor_table_size")]
    pub monitor_table_size: usize,

    /// Where prefetched lines are filled
    #[serde(default)]
    pub fill_level: FillLevel,
}

impl CacheConfig {
    fn default_name() -> String {
        defaults::NAME.to_string()
    }

    fn default_sets() -> usize {
        defaults::SETS
    }

    fn default_ways() -> usize {
        defaults::WAYS
    }

    fn default_line_bytes() -> usize {
        defaults::LINE_BYTES
    }

    fn default_bip_epsilon() -> f64 {
        defaults::BIP_EPSILON
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    fn default_prefetch_degree() -> u64 {
        defaults::PREFETCH_DEGREE
    }

    fn default_prefetch_distance() -> u64 {
        defaults::PREFETCH_DISTANCE
    }

    fn default_monitor_table_size() -> usize {
        defaults::MONITOR_TABLE_SIZE
    }

    /// Checks that the configuration describes a buildable cache.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: zero sets or ways, a line
    /// count above the supported maximum, a line size that is not a power of
    /// two, a BIP probability outside `[0, 1]`, or (when streaming is
    /// enabled) a stream prefetcher parameter that is zero or too large.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sets == 0 {
            return Err(ConfigError::ZeroSets(self.name.clone()));
        }
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays(self.name.clone()));
        }
        match self.sets.checked_mul(self.ways) {
            Some(lines) if lines <= defaults::MAX_LINES => {}
            _ => {
                return Err(ConfigError::GeometryTooLarge {
                    name: self.name.clone(),
                    sets: self.sets,
                    ways: self.ways,
                    max: defaults::MAX_LINES,
                });
            }
        }
        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::InvalidLineSize {
                name: self.name.clone(),
                line_bytes: self.line_bytes,
            });
        }
        if self.policy == ReplacementPolicy::Bip && !(0.0..=1.0).contains(&self.bip_epsilon) {
            return Err(ConfigError::InvalidEpsilon {
                name: self.name.clone(),
                epsilon: self.bip_epsilon,
            });
        }
        if self.prefetcher == Prefetcher::Stream {
            let zero = [
                ("prefetch_degree", self.prefetch_degree == 0),
                ("prefetch_distance", self.prefetch_distance == 0),
                ("monitor_table_size", self.monitor_table_size == 0),
            ]
            .into_iter()
            .find(|(_, is_zero)| *is_zero);
            if let Some((param, _)) = zero {
                return Err(ConfigError::ZeroPrefetchParam {
                    name: self.name.clone(),
                    param,
                });
            }
            let oversized = [
                ("prefetch_degree", self.prefetch_degree, defaults::MAX_PREFETCH_STRIDE),
                ("prefetch_distance", self.prefetch_distance, defaults::MAX_PREFETCH_STRIDE),
                (
                    "monitor_table_size",
                    self.monitor_table_size as u64,
                    defaults::MAX_MONITOR_TABLE_SIZE as u64,
                ),
            ]
            .into_iter()
            .find(|&(_, value, max)| value > max);
            if let Some((param, value, max)) = oversized {
                return Err(ConfigError::PrefetchParamTooLarge {
                    name: self.name.clone(),
                    param,
                    value,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Returns log2 of the line size, the shift from byte to block addresses.
    pub const fn line_shift(&self) -> u32 {
        self.line_bytes.trailing_zeros()
    }

    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or a validation
    /// error from [`CacheConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`CacheConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_json_str(&text)
    }
}

impl Default for CacheConfig {
    /// Creates a default configuration.
    ///
    /// A 2048-set, 16-way cache with 64-byte lines, LRU replacement, and no
    /// prefetching. Stream parameters hold their standard values so that
    /// switching `prefetcher` to `Stream` is enough to enable streaming.
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            sets: defaults::SETS,
            ways: defaults::WAYS,
            line_bytes: defaults::LINE_BYTES,
            policy: ReplacementPolicy::default(),
            bip_epsilon: defaults::BIP_EPSILON,
            seed: defaults::SEED,
            prefetcher: Prefetcher::default(),
            prefetch_degree: defaults::PREFETCH_DEGREE,
            prefetch_distance: defaults::PREFETCH_DISTANCE,
            monitor_table_size: defaults::MONITOR_TABLE_SIZE,
            fill_level: FillLevel::default(),
        }
    }
}
