//! Per-line replacement metadata storage.
//!
//! Every replacement policy keeps one small record per (set, way) pair: a
//! timestamp, a counter, or a timestamp plus a position flag. The store lays
//! these out set-major in one flat vector, so a set's ways are contiguous and
//! victim selection is a scan over a single slice.
//!
//! # Performance
//!
//! - **Space Complexity:** O(S × W) records
//! - **`min_way_by_key()`:** O(W)

/// Flat per-(set, way) record array owned by one cache instance.
///
/// Way indices are dense in `[0, ways)` for every set. Indexing outside the
/// configured geometry is a contract violation and panics.
#[derive(Debug, Clone)]
pub struct LineMetadataStore<T> {
    slots: Vec<T>,
    sets: usize,
    ways: usize,
}

impl<T: Clone + Default> LineMetadataStore<T> {
    /// Creates a store with every slot set to `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `sets` or `ways` is zero.
    pub fn new(sets: usize, ways: usize) -> Self {
        assert!(sets > 0 && ways > 0, "cache geometry must be non-empty ({sets} sets x {ways} ways)");
        Self {
            slots: vec![T::default(); sets * ways],
            sets,
            ways,
        }
    }

    /// Reallocates the store for a (possibly new) geometry, resetting every
    /// slot to `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `sets` or `ways` is zero.
    pub fn reset(&mut self, sets: usize, ways: usize) {
        *self = Self::new(sets, ways);
    }
}

impl<T> LineMetadataStore<T> {
    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Number of ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    #[inline(always)]
    fn index(&self, set: usize, way: usize) -> usize {
        assert!(set < self.sets, "set {set} out of range (cache has {} sets)", self.sets);
        assert!(way < self.ways, "way {way} out of range (cache has {} ways)", self.ways);
        set * self.ways + way
    }

    /// Returns the record for `(set, way)`.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    #[inline(always)]
    pub fn get(&self, set: usize, way: usize) -> &T {
        &self.slots[self.index(set, way)]
    }

    /// Returns a mutable reference to the record for `(set, way)`.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    #[inline(always)]
    pub fn get_mut(&mut self, set: usize, way: usize) -> &mut T {
        let idx = self.index(set, way);
        &mut self.slots[idx]
    }

    /// Returns all records of one set, indexed by way.
    ///
    /// # Panics
    ///
    /// Panics if `set` is out of range.
    pub fn set_slots(&self, set: usize) -> &[T] {
        let base = self.index(set, 0);
        &self.slots[base..base + self.ways]
    }

    /// Returns the way whose key is minimal within `set`.
    ///
    /// Ties resolve to the lowest way index.
    ///
    /// # Panics
    ///
    /// Panics if `set` is out of range.
    pub fn min_way_by_key<K: Ord>(&self, set: usize, key: impl Fn(&T) -> K) -> usize {
        // `min_by_key` keeps the first of equal minima.
        self.set_slots(set)
            .iter()
            .enumerate()
            .min_by_key(|(_, slot)| key(slot))
            .map_or(0, |(way, _)| way)
    }
}
