//! Cached per-section item counts with an explicit validity flag.

/// Item counts last reported by the count source.
///
/// Starts invalid. Reading an invalid cache recomputes exactly once and
/// marks it valid until the next [`invalidate`](Self::invalidate).
#[derive(Clone, Debug, Default)]
pub struct ItemCountCache {
    counts: Vec<usize>,
    valid: bool,
    recomputations: usize,
}

impl ItemCountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of times the cache has been refilled.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Returns the cached counts, refilling them from `recompute` first if stale.
    pub fn get_or_recompute(&mut self, recompute: impl FnOnce() -> Vec<usize>) -> &[usize] {
        if !self.valid {
            self.counts = recompute();
            self.valid = true;
            self.recomputations += 1;
            log::debug!("item counts refreshed: {:?}", self.counts);
        }
        &self.counts
    }
}
