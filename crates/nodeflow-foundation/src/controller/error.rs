use nodeflow_core::{ElementKind, IndexPath};

/// Why an edit call was rejected. A rejected call leaves both stores untouched
/// and never invokes its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    UnknownKind {
        kind: ElementKind,
    },
    SectionOutOfBounds {
        kind: ElementKind,
        section: usize,
        section_count: usize,
    },
    ItemOutOfBounds {
        kind: ElementKind,
        index_path: IndexPath,
        item_count: usize,
    },
    DuplicatePosition {
        kind: ElementKind,
        index_path: IndexPath,
    },
    DuplicateSection {
        kind: ElementKind,
        section: usize,
    },
    LengthMismatch {
        positions: usize,
        values: usize,
    },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::UnknownKind { kind } => write!(f, "no nodes of kind `{kind}`"),
            EditError::SectionOutOfBounds {
                kind,
                section,
                section_count,
            } => write!(
                f,
                "section {section} out of bounds for kind `{kind}` with {section_count} sections"
            ),
            EditError::ItemOutOfBounds {
                kind,
                index_path,
                item_count,
            } => write!(
                f,
                "item {index_path} out of bounds for kind `{kind}`; section holds {item_count} items"
            ),
            EditError::DuplicatePosition { kind, index_path } => {
                write!(f, "index path {index_path} given twice for kind `{kind}`")
            }
            EditError::DuplicateSection { kind, section } => {
                write!(f, "section {section} given twice for kind `{kind}`")
            }
            EditError::LengthMismatch { positions, values } => {
                write!(f, "{positions} positions given for {values} values")
            }
        }
    }
}

impl std::error::Error for EditError {}
