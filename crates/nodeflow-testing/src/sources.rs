use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nodeflow_core::{ConstrainedSizeProvider, ElementKind, IndexPath, ItemCountSource, SizeRange};

/// Item count source backed by a shared vector, counting every query.
///
/// Clones share state, so a test can keep one handle while the controller
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct CountingItemSource {
    counts: Arc<Mutex<Vec<usize>>>,
    queries: Arc<AtomicUsize>,
}

impl CountingItemSource {
    pub fn new(counts: Vec<usize>) -> Self {
        Self {
            counts: Arc::new(Mutex::new(counts)),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replaces the counts reported on the next query.
    pub fn set_counts(&self, counts: Vec<usize>) {
        *self.counts.lock().unwrap() = counts;
    }

    /// Number of times the controller asked for counts.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl ItemCountSource for CountingItemSource {
    fn item_counts(&self) -> Vec<usize> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.counts.lock().unwrap().clone()
    }
}

/// Size provider returning one range for every position, counting lookups.
#[derive(Clone, Debug)]
pub struct FixedSizeProvider {
    range: SizeRange,
    lookups: Arc<AtomicUsize>,
}

impl FixedSizeProvider {
    pub fn new(range: SizeRange) -> Self {
        Self {
            range,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for FixedSizeProvider {
    fn default() -> Self {
        Self::new(SizeRange::default())
    }
}

impl ConstrainedSizeProvider for FixedSizeProvider {
    fn constrained_size(&self, _kind: &ElementKind, _index_path: IndexPath) -> SizeRange {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.range
    }
}
