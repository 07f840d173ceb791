//! Configuration error definitions.
//!
//! The replacement and prefetch decision paths have no recoverable failures:
//! out-of-range indices and call-order violations are contract breaches and
//! panic. The only fallible surface is building a cache instance from
//! configuration, which is reported through [`ConfigError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a cache configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The cache was configured with zero sets.
    #[error("cache '{0}' must have at least one set")]
    ZeroSets(String),

    /// The cache was configured with zero ways.
    #[error("cache '{0}' must have at least one way")]
    ZeroWays(String),

    /// The line size is zero or not a power of two.
    #[error("cache '{name}': line size {line_bytes} is not a non-zero power of two")]
    InvalidLineSize {
        /// Name of the offending cache.
        name: String,
        /// The rejected line size in bytes.
        line_bytes: usize,
    },

    /// The bimodal insertion probability lies outside `[0, 1]` (or is NaN).
    #[error("cache '{name}': bimodal insertion probability {epsilon} is outside [0, 1]")]
    InvalidEpsilon {
        /// Name of the offending cache.
        name: String,
        /// The rejected probability.
        epsilon: f64,
    },

    /// A stream prefetcher parameter that must be positive was zero.
    #[error("cache '{name}': prefetcher parameter '{param}' must be non-zero")]
    ZeroPrefetchParam {
        /// Name of the offending cache.
        name: String,
        /// Name of the zero-valued parameter.
        param: &'static str,
    },

    /// `sets * ways` overflows or exceeds the supported number of lines.
    #[error("cache '{name}': {sets} sets x {ways} ways exceeds {max} lines")]
    GeometryTooLarge {
        /// Name of the offending cache.
        name: String,
        /// The configured number of sets.
        sets: usize,
        /// The configured associativity.
        ways: usize,
        /// Largest supported line count.
        max: usize,
    },

    /// A stream prefetcher parameter exceeded its upper bound.
    #[error("cache '{name}': prefetcher parameter '{param}' = {value} exceeds {max}")]
    PrefetchParamTooLarge {
        /// Name of the offending cache.
        name: String,
        /// Name of the oversized parameter.
        param: &'static str,
        /// The rejected value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The configuration file could not be read.
    #[error("failed to read config file '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// The configuration text is not valid JSON for a cache config.
    #[error("failed to parse cache config: {0}")]
    Parse(#[from] serde_json::Error),
}
