//! Per-kind sectioned node storage.
//!
//! A [`NodeStore`] maps each [`ElementKind`] to an ordered list of sections,
//! each an ordered list of [`NodeSlot`]s. The controller owns two independent
//! stores (editing and completed); nodes are shared between them only through
//! `Arc`, never through a shared collection.
//!
//! Edits come in two steps: `check_*` validates a sorted batch against the
//! current contents without touching them, and the matching mutator applies
//! it. Mutators index directly and assume a successful check.
//!
//! Position convention for a batch:
//! - removals name positions in the store as it was before the batch;
//! - insertions name positions the new entries hold after the batch.

use std::sync::Arc;

use nodeflow_core::collections::map::HashMap;
use nodeflow_core::{ElementKind, IndexPath, SizeRange};

use super::error::EditError;

/// One entry in a store.
#[derive(Debug)]
pub enum NodeSlot<N> {
    /// A node whose measurement completed.
    Measured(Arc<N>),
    /// Stand-in for a position whose measurement was cancelled or failed.
    Placeholder { constrained_size: SizeRange },
}

impl<N> NodeSlot<N> {
    pub fn node(&self) -> Option<&Arc<N>> {
        match self {
            NodeSlot::Measured(node) => Some(node),
            NodeSlot::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, NodeSlot::Placeholder { .. })
    }
}

impl<N> Clone for NodeSlot<N> {
    fn clone(&self) -> Self {
        match self {
            NodeSlot::Measured(node) => NodeSlot::Measured(Arc::clone(node)),
            NodeSlot::Placeholder { constrained_size } => NodeSlot::Placeholder {
                constrained_size: *constrained_size,
            },
        }
    }
}

impl<N> From<Arc<N>> for NodeSlot<N> {
    fn from(node: Arc<N>) -> Self {
        NodeSlot::Measured(node)
    }
}

pub type Section<N> = Vec<NodeSlot<N>>;

#[derive(Debug)]
pub struct NodeStore<N> {
    kinds: HashMap<ElementKind, Vec<Section<N>>>,
}

impl<N> Default for NodeStore<N> {
    fn default() -> Self {
        Self {
            kinds: HashMap::default(),
        }
    }
}

impl<N> NodeStore<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `kind` with no sections if it is not present yet.
    pub fn ensure_kind(&mut self, kind: &ElementKind) {
        self.kinds.entry(kind.clone()).or_default();
    }

    pub fn sections(&self, kind: &ElementKind) -> Option<&[Section<N>]> {
        self.kinds.get(kind).map(Vec::as_slice)
    }

    pub fn sections_mut(&mut self, kind: &ElementKind) -> Option<&mut Vec<Section<N>>> {
        self.kinds.get_mut(kind)
    }

    pub fn number_of_sections(&self, kind: &ElementKind) -> usize {
        self.kinds.get(kind).map_or(0, Vec::len)
    }

    pub fn slot(&self, kind: &ElementKind, index_path: IndexPath) -> Option<&NodeSlot<N>> {
        self.kinds
            .get(kind)?
            .get(index_path.section)?
            .get(index_path.item)
    }

    /// Every index path of `kind`, ordered by section then item.
    pub fn index_paths(&self, kind: &ElementKind) -> Vec<IndexPath> {
        let Some(sections) = self.kinds.get(kind) else {
            return Vec::new();
        };
        sections
            .iter()
            .enumerate()
            .flat_map(|(section, items)| {
                (0..items.len()).map(move |item| IndexPath::new(section, item))
            })
            .collect()
    }

    fn sections_or_err(&self, kind: &ElementKind) -> Result<&[Section<N>], EditError> {
        self.sections(kind).ok_or_else(|| EditError::UnknownKind { kind: kind.clone() })
    }

    /// Validates insertion of items at the sorted, duplicate-free `index_paths`.
    pub fn check_item_insertion(
        &self,
        kind: &ElementKind,
        index_paths: &[IndexPath],
    ) -> Result<(), EditError> {
        let sections = self.sections_or_err(kind)?;
        let mut current_section = usize::MAX;
        let mut inserted_before = 0;
        for &index_path in index_paths {
            if index_path.section != current_section {
                current_section = index_path.section;
                inserted_before = 0;
            }
            let items = sections
                .get(index_path.section)
                .ok_or(EditError::SectionOutOfBounds {
                    kind: kind.clone(),
                    section: index_path.section,
                    section_count: sections.len(),
                })?;
            let item_count = items.len() + inserted_before;
            if index_path.item > item_count {
                return Err(EditError::ItemOutOfBounds {
                    kind: kind.clone(),
                    index_path,
                    item_count,
                });
            }
            inserted_before += 1;
        }
        Ok(())
    }

    /// Inserts `entries`, sorted ascending by index path.
    pub fn insert_items(&mut self, kind: &ElementKind, entries: Vec<(IndexPath, NodeSlot<N>)>) {
        let sections = self.kinds.entry(kind.clone()).or_default();
        for (index_path, slot) in entries {
            sections[index_path.section].insert(index_path.item, slot);
        }
    }

    /// Validates removal of the sorted, duplicate-free `index_paths`.
    pub fn check_item_removal(
        &self,
        kind: &ElementKind,
        index_paths: &[IndexPath],
    ) -> Result<(), EditError> {
        let sections = self.sections_or_err(kind)?;
        for &index_path in index_paths {
            let items = sections
                .get(index_path.section)
                .ok_or(EditError::SectionOutOfBounds {
                    kind: kind.clone(),
                    section: index_path.section,
                    section_count: sections.len(),
                })?;
            if index_path.item >= items.len() {
                return Err(EditError::ItemOutOfBounds {
                    kind: kind.clone(),
                    index_path,
                    item_count: items.len(),
                });
            }
        }
        Ok(())
    }

    /// Removes the sorted `index_paths`, returning the removed slots in the same order.
    pub fn remove_items(&mut self, kind: &ElementKind, index_paths: &[IndexPath]) -> Vec<NodeSlot<N>> {
        let Some(sections) = self.kinds.get_mut(kind) else {
            return Vec::new();
        };
        let mut removed: Vec<NodeSlot<N>> = index_paths
            .iter()
            .rev()
            .map(|index_path| sections[index_path.section].remove(index_path.item))
            .collect();
        removed.reverse();
        removed
    }

    /// Validates insertion of sections at the sorted, duplicate-free `indices`.
    /// An unknown kind counts as having no sections.
    pub fn check_section_insertion(
        &self,
        kind: &ElementKind,
        indices: &[usize],
    ) -> Result<(), EditError> {
        let existing = self.number_of_sections(kind);
        for (inserted_before, &section) in indices.iter().enumerate() {
            let section_count = existing + inserted_before;
            if section > section_count {
                return Err(EditError::SectionOutOfBounds {
                    kind: kind.clone(),
                    section,
                    section_count,
                });
            }
        }
        Ok(())
    }

    /// Inserts `entries`, sorted ascending by section index, registering `kind` if needed.
    pub fn insert_sections(&mut self, kind: &ElementKind, entries: Vec<(usize, Section<N>)>) {
        let sections = self.kinds.entry(kind.clone()).or_default();
        for (index, section) in entries {
            sections.insert(index, section);
        }
    }

    /// Validates removal of the sorted, duplicate-free section `indices`.
    pub fn check_section_removal(
        &self,
        kind: &ElementKind,
        indices: &[usize],
    ) -> Result<(), EditError> {
        let sections = self.sections_or_err(kind)?;
        match indices.iter().find(|&&section| section >= sections.len()) {
            Some(&section) => Err(EditError::SectionOutOfBounds {
                kind: kind.clone(),
                section,
                section_count: sections.len(),
            }),
            None => Ok(()),
        }
    }

    /// Removes the sorted section `indices`, returning them in the same order.
    pub fn remove_sections(&mut self, kind: &ElementKind, indices: &[usize]) -> Vec<Section<N>> {
        let Some(sections) = self.kinds.get_mut(kind) else {
            return Vec::new();
        };
        let mut removed: Vec<Section<N>> = indices
            .iter()
            .rev()
            .map(|&index| sections.remove(index))
            .collect();
        removed.reverse();
        removed
    }
}
