//! Element kinds partitioning a data controller's stores.

use std::fmt;
use std::sync::Arc;

const CELL_KIND: &str = "cell";

/// Named category of nodes, e.g. primary cells or a supplementary header kind.
///
/// Cheap to clone; equality and hashing go through the name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKind(Arc<str>);

impl ElementKind {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The primary item kind.
    pub fn cell() -> Self {
        Self::new(CELL_KIND)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_cell(&self) -> bool {
        &*self.0 == CELL_KIND
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ElementKind {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}
