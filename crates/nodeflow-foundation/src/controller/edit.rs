//! Insert and delete reconciliation across the editing and completed stores.
//!
//! Each call validates every position against both stores before measuring
//! or mutating anything. A call that returns `Err` changed nothing and did
//! not invoke its completion; a call that returns `Ok` applied all of its
//! positions to both stores and then invoked its completion once.

use std::sync::Arc;

use nodeflow_core::{sorted_unique, sorted_unique_sections, ElementKind, IndexPath};
use web_time::Instant;

use super::batch::batch_layout_nodes;
use super::error::EditError;
use super::store::{NodeSlot, NodeStore, Section};
use super::DataController;
use crate::measurement::{NodeBlock, NodeContext};

impl<N: Send + Sync + 'static> DataController<N> {
    /// Measures one node per `node_blocks` entry and inserts it into both
    /// stores at the matching entry of `index_paths`.
    ///
    /// Index paths name the positions the new nodes occupy after the call, so
    /// `[0, 0]` and `[0, 1]` insert two nodes at the head of section 0.
    /// Measurement runs in batches; a node whose measurement was cancelled or
    /// panicked is stored as a [`NodeSlot::Placeholder`]. `completion`
    /// receives the measured nodes and their index paths in ascending order,
    /// without the placeholders.
    pub fn insert_nodes<F>(
        &mut self,
        kind: &ElementKind,
        index_paths: Vec<IndexPath>,
        node_blocks: Vec<NodeBlock<N>>,
        completion: F,
    ) -> Result<(), EditError>
    where
        F: FnOnce(&[Arc<N>], &[IndexPath]),
    {
        self.thread.assert_current("insert_nodes");
        if index_paths.len() != node_blocks.len() {
            return Err(EditError::LengthMismatch {
                positions: index_paths.len(),
                values: node_blocks.len(),
            });
        }

        let mut entries: Vec<(IndexPath, NodeBlock<N>)> =
            index_paths.into_iter().zip(node_blocks).collect();
        entries.sort_by_key(|(index_path, _)| *index_path);
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(EditError::DuplicatePosition {
                kind: kind.clone(),
                index_path: pair[0].0,
            });
        }
        let sorted: Vec<IndexPath> = entries.iter().map(|(index_path, _)| *index_path).collect();
        self.check_both(|store| store.check_item_insertion(kind, &sorted))?;

        let started = Instant::now();
        let contexts: Vec<NodeContext<N>> = entries
            .into_iter()
            .map(|(index_path, node_block)| self.node_context(kind, index_path, node_block))
            .collect();

        let mut nodes = Vec::with_capacity(contexts.len());
        let mut measured_paths = Vec::with_capacity(contexts.len());
        batch_layout_nodes(&contexts, self.config.batch_size, |batch_nodes, batch_paths| {
            nodes.extend_from_slice(batch_nodes);
            measured_paths.extend_from_slice(batch_paths);
        });

        let slots: Vec<(IndexPath, NodeSlot<N>)> = contexts
            .iter()
            .map(|context| {
                let slot = match context.node() {
                    Some(node) => NodeSlot::Measured(node),
                    None => NodeSlot::Placeholder {
                        constrained_size: context.constrained_size(),
                    },
                };
                (context.index_path(), slot)
            })
            .collect();
        drop(contexts);
        let placeholders = slots.iter().filter(|(_, slot)| slot.is_placeholder()).count();

        self.completed.insert_items(kind, slots.clone());
        self.editing.insert_items(kind, slots);
        self.log_store_update(kind, "insert_nodes", &sorted);
        log::debug!(
            "inserted {} nodes of kind `{kind}` ({} placeholders) in {:?}",
            sorted.len(),
            placeholders,
            started.elapsed()
        );

        completion(&nodes, &measured_paths);
        Ok(())
    }

    /// Removes the nodes at `index_paths` from both stores.
    ///
    /// Index paths name positions before the call. `completion` receives the
    /// removed slots and their index paths in ascending order.
    pub fn delete_nodes_of_kind<F>(
        &mut self,
        kind: &ElementKind,
        index_paths: &[IndexPath],
        completion: F,
    ) -> Result<(), EditError>
    where
        F: FnOnce(&[NodeSlot<N>], &[IndexPath]),
    {
        self.thread.assert_current("delete_nodes_of_kind");
        let sorted = sorted_unique(index_paths).map_err(|index_path| {
            EditError::DuplicatePosition {
                kind: kind.clone(),
                index_path,
            }
        })?;
        self.check_both(|store| store.check_item_removal(kind, &sorted))?;

        self.completed.remove_items(kind, &sorted);
        let removed = self.editing.remove_items(kind, &sorted);
        self.log_store_update(kind, "delete_nodes", &sorted);
        log::debug!("deleted {} nodes of kind `{kind}`", sorted.len());

        completion(&removed, &sorted);
        Ok(())
    }

    /// Inserts `sections` into both stores at the matching entry of `indices`.
    ///
    /// Indices name the positions the new sections occupy after the call. The
    /// first section insertion for a kind registers it. `completion` receives
    /// the inserted sections and their indices in ascending order.
    pub fn insert_sections<F>(
        &mut self,
        kind: &ElementKind,
        sections: Vec<Section<N>>,
        indices: &[usize],
        completion: F,
    ) -> Result<(), EditError>
    where
        F: FnOnce(&[Section<N>], &[usize]),
    {
        self.thread.assert_current("insert_sections");
        if indices.len() != sections.len() {
            return Err(EditError::LengthMismatch {
                positions: indices.len(),
                values: sections.len(),
            });
        }

        let mut entries: Vec<(usize, Section<N>)> =
            indices.iter().copied().zip(sections).collect();
        entries.sort_by_key(|(index, _)| *index);
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(EditError::DuplicateSection {
                kind: kind.clone(),
                section: pair[0].0,
            });
        }
        let sorted: Vec<usize> = entries.iter().map(|(index, _)| *index).collect();
        self.check_both(|store| store.check_section_insertion(kind, &sorted))?;

        self.completed.insert_sections(kind, entries.clone());
        self.editing.insert_sections(kind, entries.clone());
        self.log_store_update(kind, "insert_sections", &sorted);
        log::debug!("inserted {} sections of kind `{kind}`", sorted.len());

        let inserted: Vec<Section<N>> = entries.into_iter().map(|(_, section)| section).collect();
        completion(&inserted, &sorted);
        Ok(())
    }

    /// Removes the sections at `indices`, named by their positions before the
    /// call, from both stores. `completion` receives the indices in ascending
    /// order.
    pub fn delete_sections_of_kind<F>(
        &mut self,
        kind: &ElementKind,
        indices: &[usize],
        completion: F,
    ) -> Result<(), EditError>
    where
        F: FnOnce(&[usize]),
    {
        self.thread.assert_current("delete_sections_of_kind");
        let sorted = sorted_unique_sections(indices).map_err(|section| {
            EditError::DuplicateSection {
                kind: kind.clone(),
                section,
            }
        })?;
        self.check_both(|store| store.check_section_removal(kind, &sorted))?;

        self.completed.remove_sections(kind, &sorted);
        self.editing.remove_sections(kind, &sorted);
        self.log_store_update(kind, "delete_sections", &sorted);
        log::debug!("deleted {} sections of kind `{kind}`", sorted.len());

        completion(&sorted);
        Ok(())
    }

    fn check_both(
        &self,
        check: impl Fn(&NodeStore<N>) -> Result<(), EditError>,
    ) -> Result<(), EditError> {
        check(&self.editing)?;
        check(&self.completed)
    }

    fn log_store_update<P: std::fmt::Debug>(&self, kind: &ElementKind, operation: &str, positions: &[P]) {
        if self.config.log_store_updates {
            log::info!("{operation} `{kind}`: {positions:?}");
        }
    }
}
