//! Stream Prefetcher.
//!
//! A prefetcher designed to detect and run ahead of linear access streams.
//! Every demand fill opens a candidate stream anchored at the filled block.
//! Subsequent misses are compared against every tracked anchor:
//!
//! * An **unconfirmed** entry is confirmed by the first miss at a non-zero
//!   distance. The sign of the distance fixes the direction, its magnitude
//!   becomes `region_size`, and the monitored window is set to extend
//!   `distance` blocks from the anchor in that direction.
//! * A **confirmed** entry is strengthened only when a miss lands further
//!   from the anchor than `region_size` but still inside the window. Any other
//!   miss, including one in the opposite direction, drops the entry back to
//!   unconfirmed and discards the direction.
//!
//! After the direction update, every confirmed entry whose window contains
//! the missed block issues `degree` prefetches past the far end of its window
//! and slides the window forward by `degree` blocks.
//!
//! The host must run the direction update before the trigger check on each
//! miss; `on_access` does both in that order.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `start_stream()`: O(1)
//!   - `update_stream_direction()`: O(T) where T is the table size
//!   - `check_and_prefetch()`: O(T + D) where D is the prefetch degree
//! - **Space Complexity:** O(T)
//! - **Best Case:** Sequential array sweeps in either direction
//! - **Worst Case:** Interleaved streams whose misses keep resetting each other

use tracing::trace;

use super::table::{Direction, StreamEntry, StreamTable};
use super::{PrefetchSink, Prefetcher};
use crate::common::BlockAddr;
use crate::config::FillLevel;
use crate::stats::PrefetchStats;

/// Stream Prefetcher state.
#[derive(Debug)]
pub struct StreamPrefetcher {
    /// Tracked streams, oldest first.
    table: StreamTable,
    /// Number of lines to prefetch per trigger.
    degree: u64,
    /// Length of the monitored window in blocks.
    distance: u64,
    /// Where prefetched lines are filled.
    fill_level: FillLevel,
    stats: PrefetchStats,
}

impl StreamPrefetcher {
    /// Creates a new Stream prefetcher.
    ///
    /// # Arguments
    ///
    /// * `degree` - Number of lines requested per trigger.
    /// * `distance` - Monitored window length in blocks.
    /// * `table_size` - Maximum number of tracked streams.
    ///
    /// # Panics
    ///
    /// Panics if any argument is zero, or if `degree` or `distance` exceeds
    /// `i64::MAX` (window offsets are signed).
    pub fn new(degree: u64, distance: u64, table_size: usize) -> Self {
        assert!(degree > 0, "prefetch degree must be non-zero");
        assert!(distance > 0, "prefetch distance must be non-zero");
        assert!(i64::try_from(degree).is_ok(), "prefetch degree {degree} exceeds i64::MAX");
        assert!(i64::try_from(distance).is_ok(), "prefetch distance {distance} exceeds i64::MAX");
        Self {
            table: StreamTable::new(table_size),
            degree,
            distance,
            fill_level: FillLevel::ThisLevel,
            stats: PrefetchStats::default(),
        }
    }

    /// Sets the level prefetched lines are filled into.
    #[must_use]
    pub fn with_fill_level(mut self, fill_level: FillLevel) -> Self {
        self.fill_level = fill_level;
        self
    }

    /// Returns the stream table.
    pub const fn table(&self) -> &StreamTable {
        &self.table
    }

    /// Opens a candidate stream at a demand-filled block.
    ///
    /// If the table is full, the entry inserted earliest is dropped first.
    pub fn start_stream(&mut self, missed: BlockAddr) {
        self.stats.streams_started += 1;
        if let Some(evicted) = self.table.push(StreamEntry::new(missed)) {
            self.stats.table_evictions += 1;
            trace!(start = %missed, evicted = %evicted.start_addr, "stream: table full, evicted oldest");
        } else {
            trace!(start = %missed, "stream: started");
        }
    }

    /// Confirms, strengthens, or resets every tracked stream against a miss.
    pub fn update_stream_direction(&mut self, missed: BlockAddr) {
        let distance = self.distance;

        for entry in self.table.iter_mut() {
            let delta = missed.delta(entry.start_addr);
            let magnitude = delta.unsigned_abs();

            if !entry.is_confirmed() {
                if delta != 0 {
                    entry.direction = Direction::of_delta(delta);
                    entry.region_size = magnitude;
                    entry.end_addr = entry.start_addr.offset(entry.direction.step() * distance as i64);
                    self.stats.confirmations += 1;
                    trace!(start = %entry.start_addr, end = %entry.end_addr, direction = ?entry.direction, "stream: confirmed");
                }
                continue;
            }

            let same_direction = Direction::of_delta(delta) == entry.direction;
            if same_direction && magnitude > entry.region_size && magnitude < distance {
                entry.region_size = magnitude;
                entry.end_addr = entry.start_addr.offset(entry.direction.step() * distance as i64);
                self.stats.strengthened += 1;
            } else {
                entry.unconfirm();
                self.stats.resets += 1;
                trace!(start = %entry.start_addr, %missed, "stream: reset");
            }
        }
    }

    /// Issues prefetches for every confirmed stream whose window holds `missed`.
    ///
    /// Each triggered stream requests `degree` lines past its window's far
    /// end, then slides both window bounds by `degree` blocks.
    pub fn check_and_prefetch(&mut self, missed: BlockAddr, sink: &mut dyn PrefetchSink) {
        let degree = self.degree;
        let fill_level = self.fill_level;

        for entry in self.table.iter_mut() {
            if !(entry.is_confirmed() && entry.window_contains(missed)) {
                continue;
            }

            let step = entry.direction.step();
            for i in 1..=degree {
                let target = entry.end_addr.offset(step * i as i64);
                if sink.request_prefetch(target, fill_level, 0) {
                    self.stats.issued += 1;
                } else {
                    self.stats.rejected += 1;
                }
            }

            entry.start_addr = entry.start_addr.offset(step * degree as i64);
            entry.end_addr = entry.end_addr.offset(step * degree as i64);
            self.stats.bursts += 1;
            trace!(%missed, start = %entry.start_addr, end = %entry.end_addr, "stream: prefetch burst");
        }
    }
}

impl Prefetcher for StreamPrefetcher {
    fn name(&self) -> &'static str {
        "Stream"
    }

    fn initialize(&mut self) {
        self.table.clear();
        self.stats = PrefetchStats::default();
    }

    /// Runs stream learning on misses; hits are ignored.
    fn on_access(&mut self, block: BlockAddr, hit: bool, metadata: u32, sink: &mut dyn PrefetchSink) -> u32 {
        if !hit {
            self.update_stream_direction(block);
            self.check_and_prefetch(block, sink);
        }
        metadata
    }

    /// Opens a stream on demand fills; prefetch fills are ignored.
    fn on_fill(
        &mut self,
        block: BlockAddr,
        _set: usize,
        _way: usize,
        prefetch: bool,
        _evicted: BlockAddr,
        metadata: u32,
    ) -> u32 {
        if !prefetch {
            self.start_stream(block);
        }
        metadata
    }

    fn stats(&self) -> PrefetchStats {
        self.stats.clone()
    }

    fn as_stream(&self) -> Option<&StreamPrefetcher> {
        Some(self)
    }
}
