//! Collaborator contracts consumed by the data controller.

use crate::geometry::SizeRange;
use crate::index_path::IndexPath;
use crate::kind::ElementKind;

/// Supplies the size range a node is measured within.
///
/// Must be pure: the same (kind, position) always yields the same range for
/// as long as the layout it describes is unchanged.
pub trait ConstrainedSizeProvider {
    fn constrained_size(&self, kind: &ElementKind, index_path: IndexPath) -> SizeRange;
}

impl<F> ConstrainedSizeProvider for F
where
    F: Fn(&ElementKind, IndexPath) -> SizeRange,
{
    fn constrained_size(&self, kind: &ElementKind, index_path: IndexPath) -> SizeRange {
        self(kind, index_path)
    }
}

/// Reports how many items each section of the primary kind holds.
///
/// Only queried when the controller's cached counts have been invalidated.
pub trait ItemCountSource {
    fn item_counts(&self) -> Vec<usize>;
}

impl<F> ItemCountSource for F
where
    F: Fn() -> Vec<usize>,
{
    fn item_counts(&self) -> Vec<usize> {
        self()
    }
}
