//! Half-open key ranges used by the DP tables, the materializer and the searcher.
//!
//! A `KeyRange` `[start, end)` covers keys `start..end` together with the
//! dummy gaps `start..=end` that surround them. An empty range (`start == end`)
//! holds no key, only the single gap `start`.

/// Contiguous interval of keys [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyRange {
    /// Inclusive first key index.
    pub start: usize,
    /// Exclusive end; the range covers keys [start, end).
    pub end: usize,
}

impl KeyRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The full range over `n` keys.
    #[inline]
    pub fn full(n: usize) -> Self {
        Self { start: 0, end: n }
    }

    /// Number of keys in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range holds no key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Split around a root key `r`, returning the left `[start, r)` and
    /// right `[r + 1, end)` subranges.
    ///
    /// `r` must lie inside the range.
    #[inline]
    pub fn split_at(&self, r: usize) -> (KeyRange, KeyRange) {
        debug_assert!(self.contains(r), "split point {r} outside {self:?}");
        (KeyRange::new(self.start, r), KeyRange::new(r + 1, self.end))
    }
}
