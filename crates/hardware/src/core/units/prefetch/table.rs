//! Stream tracking table.
//!
//! Holds one entry per candidate stream, in insertion order. The table is
//! bounded; inserting into a full table drops the entry inserted earliest,
//! independent of the cache's own replacement policy. Entries are never
//! removed any other way.

use std::collections::VecDeque;

use crate::common::BlockAddr;

/// Direction of a tracked stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// No confirmed direction.
    #[default]
    None,
    /// Ascending block addresses.
    Ascending,
    /// Descending block addresses.
    Descending,
}

impl Direction {
    /// Returns the direction of a non-zero delta, `None` for zero.
    pub const fn of_delta(delta: i64) -> Self {
        if delta > 0 {
            Self::Ascending
        } else if delta < 0 {
            Self::Descending
        } else {
            Self::None
        }
    }

    /// Returns the unit step in blocks: `+1`, `-1`, or `0`.
    pub const fn step(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// One tracked stream.
///
/// An entry is *unconfirmed* while `region_size` is zero and *confirmed*
/// once a miss at a non-zero distance from `start_addr` fixes its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamEntry {
    /// Anchor of the monitored window (exclusive bound).
    pub start_addr: BlockAddr,
    /// Far end of the monitored window (inclusive bound).
    pub end_addr: BlockAddr,
    /// Confirmed direction, or `None` while unconfirmed.
    pub direction: Direction,
    /// Largest confirming distance seen from `start_addr`; zero while unconfirmed.
    pub region_size: u64,
}

impl StreamEntry {
    /// Creates an unconfirmed entry anchored at `start`.
    pub const fn new(start: BlockAddr) -> Self {
        Self {
            start_addr: start,
            end_addr: BlockAddr(0),
            direction: Direction::None,
            region_size: 0,
        }
    }

    /// Whether the stream's direction is confirmed.
    pub const fn is_confirmed(&self) -> bool {
        self.region_size > 0
    }

    /// Whether `addr` lies in the half-open monitored window.
    ///
    /// Ascending windows are `(start, end]`, descending ones `[end, start)`.
    pub fn window_contains(&self, addr: BlockAddr) -> bool {
        match self.direction {
            Direction::Ascending => addr > self.start_addr && addr <= self.end_addr,
            Direction::Descending => addr < self.start_addr && addr >= self.end_addr,
            Direction::None => false,
        }
    }

    /// Drops back to the unconfirmed state, forgetting the direction.
    pub fn unconfirm(&mut self) {
        self.direction = Direction::None;
        self.region_size = 0;
    }
}

/// Bounded, insertion-ordered collection of stream entries.
#[derive(Debug, Clone)]
pub struct StreamTable {
    entries: VecDeque<StreamEntry>,
    capacity: usize,
}

impl StreamTable {
    /// Creates an empty table holding at most `capacity` streams.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "stream table capacity must be non-zero");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest one if the table is full.
    ///
    /// # Returns
    ///
    /// The evicted entry, if any.
    pub fn push(&mut self, entry: StreamEntry) -> Option<StreamEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of tracked streams.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no streams are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of tracked streams.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &StreamEntry> {
        self.entries.iter()
    }

    /// Iterates entries mutably from oldest to newest.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StreamEntry> {
        self.entries.iter_mut()
    }
}
