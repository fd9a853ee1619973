//! Composite (section, item) keys addressing nodes in a store.

use std::fmt;

/// Position of an item: its section, then its index within that section.
///
/// Ordering is lexicographic (section first), so a sorted sequence of index
/// paths walks a store front to back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self { section, item }
    }
}

/// Returns a sorted copy of `paths`, or the first duplicate if one exists.
pub fn sorted_unique(paths: &[IndexPath]) -> Result<Vec<IndexPath>, IndexPath> {
    let mut sorted = paths.to_vec();
    sorted.sort_unstable();
    match sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(pair[0]),
        None => Ok(sorted),
    }
}

/// Sorted copy of section indices, or the first duplicate.
pub fn sorted_unique_sections(indices: &[usize]) -> Result<Vec<usize>, usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    match sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(pair[0]),
        None => Ok(sorted),
    }
}
