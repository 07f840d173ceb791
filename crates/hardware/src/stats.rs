//! Cache instance statistics collection and reporting.
//!
//! This module tracks the decisions a cache instance makes. It provides:
//! 1. **Replacement:** Hits, miss fills, victim selections, and insertion positions.
//! 2. **Prefetching:** Stream lifecycle events and prefetch request outcomes.
//! 3. **Reporting:** A fixed-width text report and a JSON form for tooling.

use serde::Serialize;

/// MRU vs. LRU insertion counts of a policy that chooses insertion position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertionCounts {
    /// Miss fills inserted at the MRU position.
    pub mru: u64,
    /// Miss fills inserted at the LRU position.
    pub lru: u64,
}

/// Replacement-side counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementStats {
    /// `update_replacement_state` calls for hits.
    pub hits: u64,
    /// `update_replacement_state` calls for miss fills.
    pub fills: u64,
    /// `find_victim` calls.
    pub victim_selections: u64,
    /// Insertion positions chosen on fills.
    pub insertions: InsertionCounts,
}

/// Prefetch-side counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefetchStats {
    /// Streams opened by demand fills.
    pub streams_started: u64,
    /// Streams dropped because the table was full.
    pub table_evictions: u64,
    /// Unconfirmed streams that gained a direction.
    pub confirmations: u64,
    /// Confirmed streams whose region grew.
    pub strengthened: u64,
    /// Confirmed streams dropped back to unconfirmed.
    pub resets: u64,
    /// Triggered windows (one burst of requests each).
    pub bursts: u64,
    /// Prefetch requests accepted by the host.
    pub issued: u64,
    /// Prefetch requests the host declined.
    pub rejected: u64,
}

/// Snapshot of all counters of one cache instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Cache name from the configuration.
    pub name: String,
    /// Replacement policy name.
    pub policy: &'static str,
    /// Prefetcher name, if one is attached.
    pub prefetcher: Option<&'static str>,
    /// Host cycles observed through `cycle_tick`.
    pub cycles: u64,
    /// Replacement-side counters.
    pub replacement: ReplacementStats,
    /// Prefetch-side counters, if a prefetcher is attached.
    pub prefetch: Option<PrefetchStats>,
}

impl CacheStats {
    /// Fraction of replacement updates that were hits, in percent.
    pub fn hit_rate(&self) -> f64 {
        let total = self.replacement.hits + self.replacement.fills;
        if total == 0 {
            0.0
        } else {
            (self.replacement.hits as f64 / total as f64) * 100.0
        }
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the snapshot holds only plain data, so
    /// this does not fail in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        let r = &self.replacement;
        println!("\n==========================================================");
        println!("CACHE {} ({})", self.name, self.policy);
        println!("==========================================================");
        println!("  cycles                 {}", self.cycles);
        println!("  repl.hits              {}", r.hits);
        println!("  repl.fills             {}", r.fills);
        println!("  repl.hit_rate          {:.2}%", self.hit_rate());
        println!("  repl.victims           {}", r.victim_selections);
        println!("  repl.insert_mru        {}", r.insertions.mru);
        println!("  repl.insert_lru        {}", r.insertions.lru);

        if let (Some(name), Some(p)) = (self.prefetcher, &self.prefetch) {
            let requested = p.issued + p.rejected;
            let accepted = if requested > 0 {
                (p.issued as f64 / requested as f64) * 100.0
            } else {
                0.0
            };
            println!("----------------------------------------------------------");
            println!("PREFETCHER {name}");
            println!("  pf.streams_started     {}", p.streams_started);
            println!("  pf.table_evictions     {}", p.table_evictions);
            println!("  pf.confirmations       {}", p.confirmations);
            println!("  pf.strengthened        {}", p.strengthened);
            println!("  pf.resets              {}", p.resets);
            println!("  pf.bursts              {}", p.bursts);
            println!("  pf.issued              {}", p.issued);
            println!("  pf.rejected            {}", p.rejected);
            println!("  pf.accept_rate         {accepted:.2}%");
        }
        println!("==========================================================");
    }
}
