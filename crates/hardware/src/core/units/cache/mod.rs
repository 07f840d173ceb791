//! Replacement decision logic for set-associative caches.
//!
//! The host simulator owns tag storage and lookup; this module owns the
//! per-line bookkeeping the host consults when a set is full. It provides:
//! 1. **Metadata:** A flat per-(set, way) store shared by all policies.
//! 2. **Policies:** Bimodal-insertion recency, FIFO, and LFU victim selection.

/// Per-line metadata storage.
pub mod metadata;

/// Cache replacement policy implementations (BIP/LRU, FIFO, LFU).
pub mod policies;

pub use self::metadata::LineMetadataStore;
pub use self::policies::{BipPolicy, FifoPolicy, LfuPolicy, ReplacementPolicy};
