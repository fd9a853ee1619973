//! The data controller: editing and completed node stores for each element
//! kind, the cached item counts and batched measurement of new nodes.
//!
//! Every operation here is confined to the controlling thread the controller
//! was created on. The controller holds a [`ControllingThread`] token, which
//! keeps it from being sent elsewhere, and each confined operation asserts it
//! is running on that thread.

mod batch;
mod config;
mod edit;
mod error;
mod item_counts;
mod store;

use std::fmt;
use std::sync::Arc;

use nodeflow_core::{
    ConstrainedSizeProvider, ControllingThread, ElementKind, IndexPath, ItemCountSource,
    SizeRange, TraitCollection,
};

use crate::measurement::{MeasurementPool, NodeBlock, NodeContext};

pub use batch::batch_layout_nodes;
pub use config::{DataControllerConfig, MAX_DEFAULT_WORKERS, SIZING_COUNT_PER_WORKER};
pub use error::EditError;
pub use item_counts::ItemCountCache;
pub use store::{NodeSlot, NodeStore, Section};

pub struct DataController<N> {
    thread: ControllingThread,
    config: DataControllerConfig,
    pool: MeasurementPool,
    editing: NodeStore<N>,
    completed: NodeStore<N>,
    item_counts: ItemCountCache,
    size_provider: Box<dyn ConstrainedSizeProvider>,
    count_source: Box<dyn ItemCountSource>,
    environment_traits: TraitCollection,
}

impl<N: Send + Sync + 'static> DataController<N> {
    /// Creates a controller owned by the calling thread, with its own pool of
    /// `config.worker_count` measurement workers.
    pub fn new(
        config: DataControllerConfig,
        size_provider: impl ConstrainedSizeProvider + 'static,
        count_source: impl ItemCountSource + 'static,
    ) -> Self {
        let pool = MeasurementPool::new(config.worker_count);
        Self::with_pool(config, pool, size_provider, count_source)
    }

    /// Creates a controller that measures on an existing pool.
    ///
    /// `config.worker_count` is ignored; the pool decides.
    pub fn with_pool(
        config: DataControllerConfig,
        pool: MeasurementPool,
        size_provider: impl ConstrainedSizeProvider + 'static,
        count_source: impl ItemCountSource + 'static,
    ) -> Self {
        let cell = ElementKind::cell();
        let mut editing = NodeStore::new();
        let mut completed = NodeStore::new();
        editing.ensure_kind(&cell);
        completed.ensure_kind(&cell);

        log::debug!(
            "data controller created: batch size {}, {} workers",
            config.batch_size,
            pool.worker_count()
        );
        Self {
            thread: ControllingThread::current(),
            config,
            pool,
            editing,
            completed,
            item_counts: ItemCountCache::new(),
            size_provider: Box::new(size_provider),
            count_source: Box::new(count_source),
            environment_traits: TraitCollection::default(),
        }
    }

    pub fn controlling_thread(&self) -> ControllingThread {
        self.thread
    }

    pub fn config(&self) -> &DataControllerConfig {
        &self.config
    }

    pub fn pool(&self) -> &MeasurementPool {
        &self.pool
    }

    pub fn environment_traits(&self) -> &TraitCollection {
        &self.environment_traits
    }

    /// Replaces the trait snapshot handed to contexts created from now on.
    /// Contexts already created keep the snapshot they were built with.
    pub fn set_environment_traits(&mut self, traits: TraitCollection) {
        self.thread.assert_current("set_environment_traits");
        self.environment_traits = traits;
    }

    /// Sections of `kind` in the editing store.
    pub fn editing_nodes_of_kind(&self, kind: &ElementKind) -> Option<&[Section<N>]> {
        self.thread.assert_current("editing_nodes_of_kind");
        self.editing.sections(kind)
    }

    /// Mutable sections of `kind` in the editing store.
    ///
    /// Changes made through this view are not mirrored into the completed
    /// store. Edits through the controller validate against both stores, so
    /// a divergence makes them fail rather than corrupt either store.
    pub fn editing_nodes_of_kind_mut(&mut self, kind: &ElementKind) -> Option<&mut Vec<Section<N>>> {
        self.thread.assert_current("editing_nodes_of_kind_mut");
        self.editing.sections_mut(kind)
    }

    /// Sections of `kind` in the completed store.
    pub fn completed_nodes_of_kind(&self, kind: &ElementKind) -> Option<&[Section<N>]> {
        self.thread.assert_current("completed_nodes_of_kind");
        self.completed.sections(kind)
    }

    pub fn index_paths_for_editing_nodes_of_kind(&self, kind: &ElementKind) -> Vec<IndexPath> {
        self.thread.assert_current("index_paths_for_editing_nodes_of_kind");
        self.editing.index_paths(kind)
    }

    pub fn number_of_sections(&self, kind: &ElementKind) -> usize {
        self.thread.assert_current("number_of_sections");
        self.completed.number_of_sections(kind)
    }

    /// The measured node at `index_path` in the completed store. `None` for
    /// placeholders and positions that do not exist.
    pub fn node_at_index_path(&self, kind: &ElementKind, index_path: IndexPath) -> Option<&Arc<N>> {
        self.thread.assert_current("node_at_index_path");
        self.completed.slot(kind, index_path)?.node()
    }

    pub fn invalidate_data_source_item_counts(&mut self) {
        self.thread.assert_current("invalidate_data_source_item_counts");
        self.item_counts.invalidate();
    }

    /// Per-section item counts of the primary kind.
    ///
    /// Served from the cache while it is valid; otherwise the count source
    /// is queried once and the cache refilled.
    pub fn item_counts_from_data_source(&mut self) -> &[usize] {
        self.thread.assert_current("item_counts_from_data_source");
        let count_source = &self.count_source;
        self.item_counts
            .get_or_recompute(|| count_source.item_counts())
    }

    pub fn item_count_cache(&self) -> &ItemCountCache {
        &self.item_counts
    }

    pub fn constrained_size_for_node_of_kind(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> SizeRange {
        self.size_provider.constrained_size(kind, index_path)
    }

    /// Builds an unscheduled context for a node of `kind` at `index_path`,
    /// bounded by the size provider and carrying the current trait snapshot.
    pub fn node_context(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        node_block: NodeBlock<N>,
    ) -> NodeContext<N> {
        NodeContext::new(
            node_block,
            index_path,
            self.constrained_size_for_node_of_kind(kind, index_path),
            self.environment_traits.clone(),
            &self.pool,
        )
    }

    /// Measures `contexts` in batches of the configured size, calling
    /// `on_batch` after each one. See [`batch_layout_nodes`].
    pub fn batch_layout_nodes_from_contexts<F>(&self, contexts: &[NodeContext<N>], on_batch: F)
    where
        F: FnMut(&[Arc<N>], &[IndexPath]),
    {
        self.thread.assert_current("batch_layout_nodes_from_contexts");
        batch_layout_nodes(contexts, self.config.batch_size, on_batch);
    }
}

impl<N> fmt::Debug for DataController<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataController")
            .field("thread", &self.thread)
            .field("config", &self.config)
            .field("pool", &self.pool)
            .field("item_counts", &self.item_counts)
            .field("environment_traits", &self.environment_traits)
            .finish_non_exhaustive()
    }
}
