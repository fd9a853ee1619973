use std::sync::Arc;

use nodeflow_core::IndexPath;

/// One batch completion as seen by a [`BatchRecorder`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedBatch {
    pub node_count: usize,
    pub index_paths: Vec<IndexPath>,
}

/// Collects batch completions in the order they fire.
#[derive(Clone, Debug, Default)]
pub struct BatchRecorder {
    batches: Vec<RecordedBatch>,
}

impl BatchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completion. Panics if nodes and paths are misaligned.
    pub fn record<N>(&mut self, nodes: &[Arc<N>], index_paths: &[IndexPath]) {
        assert_eq!(
            nodes.len(),
            index_paths.len(),
            "batch completion received misaligned nodes and index paths"
        );
        self.batches.push(RecordedBatch {
            node_count: nodes.len(),
            index_paths: index_paths.to_vec(),
        });
    }

    pub fn batches(&self) -> &[RecordedBatch] {
        &self.batches
    }

    pub fn total_nodes(&self) -> usize {
        self.batches.iter().map(|batch| batch.node_count).sum()
    }

    /// Every recorded index path, in completion order.
    pub fn index_paths(&self) -> Vec<IndexPath> {
        self.batches
            .iter()
            .flat_map(|batch| batch.index_paths.iter().copied())
            .collect()
    }
}
