//! Batched measurement with in-order completion.

use std::sync::Arc;

use nodeflow_core::IndexPath;
use smallvec::SmallVec;
use web_time::Instant;

use crate::measurement::NodeContext;

/// Inline capacity of the per-batch buffers. Larger batches spill to the heap.
const BATCH_INLINE: usize = 32;

/// Measures `contexts` in consecutive batches of `batch_size` and reports each
/// batch to `on_batch` before starting the next.
///
/// Every context in a batch is scheduled before the first wait, so pool
/// workers measure the batch in parallel while this thread waits on it in
/// order. `on_batch` receives the measured nodes with their index paths;
/// cancelled contexts are left out of both slices. It fires once per batch,
/// in batch order, on the calling thread, and the function returns after the
/// last call.
pub fn batch_layout_nodes<N, F>(contexts: &[NodeContext<N>], batch_size: usize, mut on_batch: F)
where
    N: Send + Sync + 'static,
    F: FnMut(&[Arc<N>], &[IndexPath]),
{
    let batch_size = batch_size.max(1);
    for (batch_index, batch) in contexts.chunks(batch_size).enumerate() {
        let started = Instant::now();
        for context in batch {
            context.schedule_measurement();
        }

        let mut nodes: SmallVec<[Arc<N>; BATCH_INLINE]> = SmallVec::new();
        let mut index_paths: SmallVec<[IndexPath; BATCH_INLINE]> = SmallVec::new();
        for context in batch {
            context.wait_for_measurement();
            if let Some(node) = context.node() {
                nodes.push(node);
                index_paths.push(context.index_path());
            }
        }

        log::debug!(
            "batch {batch_index}: measured {}/{} nodes in {:?}",
            nodes.len(),
            batch.len(),
            started.elapsed()
        );
        on_batch(nodes.as_slice(), index_paths.as_slice());
    }
}
