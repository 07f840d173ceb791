//! Stream Prefetcher Tests.
//!
//! Verifies stream confirmation, strengthening, and reset from misses, the
//! window trigger and slide, table eviction, and a full host round trip.
//! Addresses are block-granular throughout; the default geometry is
//! degree 3, distance 8, 64 tracked streams.

use mockall::Sequence;
use pretty_assertions::assert_eq;
use rvsim_cachepolicy::common::BlockAddr;
use rvsim_cachepolicy::config::{CacheConfig, FillLevel, Prefetcher as PrefetcherType};
use rvsim_cachepolicy::core::units::prefetch::{
    Direction, PrefetchRequest, Prefetcher, StreamEntry, StreamPrefetcher,
};
use rvsim_cachepolicy::stats::PrefetchStats;

use crate::common::harness::HostCache;
use crate::common::mocks::sink::{BoundedSink, MockSink};

fn prefetcher() -> StreamPrefetcher {
    StreamPrefetcher::new(3, 8, 64)
}

fn entry(pf: &StreamPrefetcher, index: usize) -> StreamEntry {
    *pf.table().iter().nth(index).unwrap()
}

fn blocks(requests: &[PrefetchRequest]) -> Vec<u64> {
    requests.iter().map(|r| r.block.val()).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Direction learning
// ══════════════════════════════════════════════════════════

#[test]
fn first_nonzero_miss_confirms_ascending() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));

    let e = entry(&pf, 0);
    assert_eq!(e.direction, Direction::Ascending);
    assert_eq!(e.region_size, 1);
    assert_eq!(e.end_addr, BlockAddr(108));
    assert_eq!(pf.stats().confirmations, 1);
}

#[test]
fn first_nonzero_miss_confirms_descending() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(99));

    let e = entry(&pf, 0);
    assert_eq!(e.direction, Direction::Descending);
    assert_eq!(e.end_addr, BlockAddr(92));
}

#[test]
fn miss_at_anchor_leaves_entry_unconfirmed() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(100));
    assert!(!entry(&pf, 0).is_confirmed());
    assert_eq!(pf.stats().confirmations, 0);
}

#[test]
fn growing_delta_strengthens() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.update_stream_direction(BlockAddr(102));

    let e = entry(&pf, 0);
    assert_eq!(e.region_size, 2);
    assert_eq!(e.end_addr, BlockAddr(108));
    assert_eq!(pf.stats().strengthened, 1);
}

#[test]
fn descending_growing_delta_strengthens() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(99));
    pf.update_stream_direction(BlockAddr(97));

    let e = entry(&pf, 0);
    assert_eq!(e.direction, Direction::Descending);
    assert_eq!(e.region_size, 3);
}

#[test]
fn delta_beyond_distance_resets() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.update_stream_direction(BlockAddr(110));

    let e = entry(&pf, 0);
    assert!(!e.is_confirmed());
    assert_eq!(e.direction, Direction::None);
    assert_eq!(pf.stats().resets, 1);
}

/// Confirm at A+1, strengthen at A+2, then a miss at A+10 drops the
/// strengthened stream back to unconfirmed.
#[test]
fn strengthened_stream_resets_past_distance() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.update_stream_direction(BlockAddr(102));
    assert_eq!(entry(&pf, 0).region_size, 2);

    pf.update_stream_direction(BlockAddr(110));

    let e = entry(&pf, 0);
    assert!(!e.is_confirmed());
    assert_eq!(e.region_size, 0);
    assert_eq!(e.direction, Direction::None);
    assert_eq!(e.start_addr, BlockAddr(100));
    let stats = pf.stats();
    assert_eq!((stats.confirmations, stats.strengthened, stats.resets), (1, 1, 1));
}

/// A delta equal to the distance is outside the strengthening range.
#[test]
fn delta_equal_to_distance_resets() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.update_stream_direction(BlockAddr(108));
    assert!(!entry(&pf, 0).is_confirmed());
}

#[test]
fn non_growing_delta_resets() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(103));
    pf.update_stream_direction(BlockAddr(102));
    assert!(!entry(&pf, 0).is_confirmed());

    pf.start_stream(BlockAddr(200));
    pf.update_stream_direction(BlockAddr(201));
    pf.update_stream_direction(BlockAddr(201));
    assert!(!entry(&pf, 1).is_confirmed());
}

#[test]
fn opposite_direction_resets() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(102));
    pf.update_stream_direction(BlockAddr(99));
    assert_eq!(entry(&pf, 0).direction, Direction::None);
}

#[test]
fn reset_entry_can_confirm_again() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.update_stream_direction(BlockAddr(120));
    pf.update_stream_direction(BlockAddr(97));

    let e = entry(&pf, 0);
    assert_eq!(e.direction, Direction::Descending);
    assert_eq!(e.region_size, 3);
    assert_eq!(e.end_addr, BlockAddr(92));
    assert_eq!(pf.stats().confirmations, 2);
}

// ══════════════════════════════════════════════════════════
// 2. Trigger and window slide
// ══════════════════════════════════════════════════════════

#[test]
fn miss_at_window_end_issues_next_lines() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.check_and_prefetch(BlockAddr(108), &mut sink);

    assert_eq!(blocks(&sink), vec![109, 110, 111]);
    assert!(sink.iter().all(|r| r.metadata == 0 && r.fill_level == FillLevel::ThisLevel));

    let e = entry(&pf, 0);
    assert_eq!(e.start_addr, BlockAddr(103));
    assert_eq!(e.end_addr, BlockAddr(111));
    assert_eq!(pf.stats().bursts, 1);
    assert_eq!(pf.stats().issued, 3);
}

#[test]
fn descending_trigger_issues_lower_lines() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(99));
    pf.check_and_prefetch(BlockAddr(92), &mut sink);

    assert_eq!(blocks(&sink), vec![91, 90, 89]);
    let e = entry(&pf, 0);
    assert_eq!(e.start_addr, BlockAddr(97));
    assert_eq!(e.end_addr, BlockAddr(89));
}

#[test]
fn miss_outside_window_issues_nothing() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.check_and_prefetch(BlockAddr(100), &mut sink);
    pf.check_and_prefetch(BlockAddr(109), &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn unconfirmed_entries_never_trigger() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.check_and_prefetch(BlockAddr(101), &mut sink);
    assert!(sink.is_empty());
}

/// One miss can fall in several windows; every one of them fires.
#[test]
fn every_containing_window_fires() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.start_stream(BlockAddr(102));
    pf.update_stream_direction(BlockAddr(101));
    pf.check_and_prefetch(BlockAddr(101), &mut sink);

    assert_eq!(blocks(&sink), vec![109, 110, 111, 93, 92, 91]);
    assert_eq!(pf.stats().bursts, 2);
}

#[test]
fn requests_are_issued_in_order() {
    let mut pf = prefetcher();
    let mut seq = Sequence::new();
    let mut sink = MockSink::new();
    for block in [109u64, 110, 111] {
        sink.expect_request_prefetch()
            .withf(move |b, level, meta| {
                *b == BlockAddr(block) && *level == FillLevel::ThisLevel && *meta == 0
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);
    }

    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.check_and_prefetch(BlockAddr(101), &mut sink);
}

#[test]
fn rejected_requests_are_counted_and_window_still_slides() {
    let mut pf = prefetcher();
    let mut sink = BoundedSink::new(1);
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.check_and_prefetch(BlockAddr(101), &mut sink);

    assert_eq!(sink.accepted, vec![BlockAddr(109)]);
    assert_eq!(sink.declined, vec![BlockAddr(110), BlockAddr(111)]);
    assert_eq!(pf.stats().issued, 1);
    assert_eq!(pf.stats().rejected, 2);
    assert_eq!(entry(&pf, 0).end_addr, BlockAddr(111));
}

#[test]
fn custom_degree_and_distance() {
    let mut pf = StreamPrefetcher::new(2, 4, 8).with_fill_level(FillLevel::NextLevel);
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(0));
    pf.update_stream_direction(BlockAddr(1));
    pf.check_and_prefetch(BlockAddr(4), &mut sink);

    assert_eq!(blocks(&sink), vec![5, 6]);
    assert!(sink.iter().all(|r| r.fill_level == FillLevel::NextLevel));
    assert_eq!(pf.table().capacity(), 8);
}

// ══════════════════════════════════════════════════════════
// 3. Hook behavior
// ══════════════════════════════════════════════════════════

/// On a miss the direction update runs before the trigger check.
#[test]
fn on_access_miss_updates_then_triggers() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.on_fill(BlockAddr(100), 0, 0, false, BlockAddr(0), 0);
    assert_eq!(pf.on_access(BlockAddr(101), false, 17, &mut sink), 17);

    assert_eq!(blocks(&sink), vec![109, 110, 111]);
    assert_eq!(entry(&pf, 0).start_addr, BlockAddr(103));
}

/// Resetting clears the direction, so a miss that disconfirms a stream
/// cannot trigger it in the same access.
#[test]
fn disconfirming_miss_does_not_trigger() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.update_stream_direction(BlockAddr(101));
    pf.on_access(BlockAddr(108), false, 0, &mut sink);

    assert!(sink.is_empty());
    assert!(!entry(&pf, 0).is_confirmed());
}

#[test]
fn hits_are_ignored() {
    let mut pf = prefetcher();
    let mut sink: Vec<PrefetchRequest> = Vec::new();
    pf.start_stream(BlockAddr(100));
    pf.on_access(BlockAddr(101), true, 0, &mut sink);
    assert!(sink.is_empty());
    assert!(!entry(&pf, 0).is_confirmed());
}

#[test]
fn only_demand_fills_start_streams() {
    let mut pf = prefetcher();
    assert_eq!(pf.on_fill(BlockAddr(5), 0, 1, true, BlockAddr(9), 3), 3);
    assert!(pf.table().is_empty());

    pf.on_fill(BlockAddr(5), 0, 1, false, BlockAddr(9), 3);
    assert_eq!(pf.table().len(), 1);
    assert_eq!(entry(&pf, 0), StreamEntry::new(BlockAddr(5)));
}

#[test]
fn full_table_drops_oldest_stream() {
    let mut pf = prefetcher();
    for start in 1..=65 {
        pf.start_stream(BlockAddr(start));
    }
    let starts: Vec<u64> = pf.table().iter().map(|e| e.start_addr.val()).collect();
    assert_eq!(starts, (2..=65).collect::<Vec<u64>>());
    assert_eq!(pf.stats().streams_started, 65);
    assert_eq!(pf.stats().table_evictions, 1);
}

#[test]
#[should_panic(expected = "prefetch distance 18446744073709551615 exceeds i64::MAX")]
fn distance_beyond_signed_range_panics() {
    let _ = StreamPrefetcher::new(3, u64::MAX, 4);
}

#[test]
#[should_panic(expected = "prefetch degree")]
fn degree_beyond_signed_range_panics() {
    let _ = StreamPrefetcher::new(i64::MAX as u64 + 1, 8, 4);
}

#[test]
fn initialize_forgets_streams_and_counters() {
    let mut pf = prefetcher();
    pf.start_stream(BlockAddr(1));
    pf.initialize();
    assert!(pf.table().is_empty());
    assert_eq!(pf.stats(), PrefetchStats::default());
}

// ══════════════════════════════════════════════════════════
// 4. Host round trip
// ══════════════════════════════════════════════════════════

fn streaming_host() -> HostCache {
    HostCache::new(&CacheConfig {
        sets: 64,
        ways: 4,
        prefetcher: PrefetcherType::Stream,
        ..CacheConfig::default()
    })
}

#[test]
fn ascending_scan_is_covered_by_prefetches() {
    let mut host = streaming_host();
    for block in 0..=20 {
        host.access_block(block);
    }
    let stats = host.instance.stats().prefetch.unwrap();
    assert!(stats.issued > 0);
    assert!(host.prefetch_fills > 0);
    assert!(host.hits > 0);
    assert!(host.misses < 21);
}

#[test]
fn descending_scan_is_covered_by_prefetches() {
    let mut host = streaming_host();
    for block in (20..=40).rev() {
        host.access_block(block);
    }
    assert!(host.hits > 0);
    assert!(host.instance.stats().prefetch.unwrap().bursts > 0);
}

#[test]
fn random_accesses_without_pattern_issue_nothing() {
    let mut host = streaming_host();
    for block in [500u64, 3, 9000, 42, 7777] {
        host.access_block(block);
    }
    assert_eq!(host.instance.stats().prefetch.unwrap().issued, 0);
}
