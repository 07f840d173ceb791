//! Hardware Prefetcher implementations.
//!
//! This module contains the interface between prefetchers and the host
//! cache, and the stream prefetcher built on it. Prefetchers observe accesses
//! and fills; when they decide to fetch ahead they call back into the host
//! through a [`PrefetchSink`]. The host translates, looks up, and schedules
//! each request; prefetchers never touch memory themselves.

use std::fmt;

use crate::common::BlockAddr;
use crate::config::FillLevel;
use crate::stats::PrefetchStats;

/// Stream prefetcher (confirms ascending/descending streams from misses).
pub mod stream;

/// Bounded table of tracked streams.
pub mod table;

pub use self::stream::StreamPrefetcher;
pub use self::table::{Direction, StreamEntry, StreamTable};

/// A prefetch request as handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchRequest {
    /// Block-granular target address.
    pub block: BlockAddr,
    /// Where the host should fill the line.
    pub fill_level: FillLevel,
    /// Opaque metadata forwarded with the request.
    pub metadata: u32,
}

/// Host-side receiver of prefetch requests.
///
/// The host is responsible for translating the block address to a byte
/// address, checking the hierarchy, and scheduling the fill.
pub trait PrefetchSink {
    /// Asks the host to prefetch one line.
    ///
    /// # Returns
    ///
    /// `true` if the host accepted the request, `false` if it dropped it
    /// (for example because its prefetch queue is full).
    fn request_prefetch(&mut self, block: BlockAddr, fill_level: FillLevel, metadata: u32) -> bool;
}

/// Collects every request, accepting all of them.
impl PrefetchSink for Vec<PrefetchRequest> {
    fn request_prefetch(&mut self, block: BlockAddr, fill_level: FillLevel, metadata: u32) -> bool {
        self.push(PrefetchRequest {
            block,
            fill_level,
            metadata,
        });
        true
    }
}

/// Trait for cache prefetcher implementations.
///
/// Prefetchers observe memory access patterns and generate prefetch
/// requests to reduce cache miss penalties. Addresses are block-granular;
/// the owning cache instance converts from byte addresses.
pub trait Prefetcher: Send + Sync + fmt::Debug {
    /// Short prefetcher name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Discards all learned state. Calling this again is a full reset.
    fn initialize(&mut self);

    /// Observes a cache access.
    ///
    /// # Arguments
    ///
    /// * `block` - The accessed block.
    /// * `hit` - Whether the access hit.
    /// * `metadata` - Host metadata attached to the access.
    /// * `sink` - Receiver for any prefetch requests issued.
    ///
    /// # Returns
    ///
    /// The metadata to attach to the access; passed through unchanged when idle.
    fn on_access(&mut self, block: BlockAddr, hit: bool, metadata: u32, sink: &mut dyn PrefetchSink) -> u32;

    /// Observes a cache fill.
    ///
    /// # Arguments
    ///
    /// * `block` - The filled block.
    /// * `set` - Set the line was filled into.
    /// * `way` - Way the line was filled into.
    /// * `prefetch` - Whether the fill was caused by a prefetch.
    /// * `evicted` - The block evicted to make room.
    /// * `metadata` - Host metadata attached to the fill.
    ///
    /// # Returns
    ///
    /// The metadata to attach to the filled line.
    fn on_fill(&mut self, block: BlockAddr, set: usize, way: usize, prefetch: bool, evicted: BlockAddr, metadata: u32) -> u32;

    /// Advances per-cycle state. Most prefetchers have no periodic work.
    fn cycle_tick(&mut self) {}

    /// Returns the counters accumulated since the last `initialize`.
    fn stats(&self) -> PrefetchStats;

    /// Returns this prefetcher as a `StreamPrefetcher` if it is one; otherwise `None`.
    fn as_stream(&self) -> Option<&StreamPrefetcher> {
        None
    }
}
