use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nodeflow_core::{IndexPath, Size, SizeRange, TraitCollection};

/// Synthetic measured node: remembers where and how it was measured.
#[derive(Clone, Debug, PartialEq)]
pub struct TestNode {
    pub index_path: IndexPath,
    pub size: Size,
    pub traits: TraitCollection,
}

type TestNodeBlock = Box<dyn FnOnce(SizeRange, &TraitCollection) -> TestNode + Send + 'static>;

impl TestNode {
    pub fn new(index_path: IndexPath, size: Size) -> Self {
        Self {
            index_path,
            size,
            traits: TraitCollection::default(),
        }
    }

    /// A node block that sizes the node to the range's minimum width and
    /// a height derived from the item index, clamped into the range.
    pub fn block(index_path: IndexPath) -> TestNodeBlock {
        Box::new(move |range: SizeRange, traits: &TraitCollection| TestNode {
            index_path,
            size: range.clamp(Size::new(range.min.width, 20.0 + index_path.item as f32)),
            traits: traits.clone(),
        })
    }

    /// Like [`TestNode::block`], bumping `calls` each time a block runs.
    pub fn counting_block(index_path: IndexPath, calls: &Arc<AtomicUsize>) -> TestNodeBlock {
        let calls = Arc::clone(calls);
        let inner = Self::block(index_path);
        Box::new(move |range: SizeRange, traits: &TraitCollection| {
            calls.fetch_add(1, Ordering::SeqCst);
            inner(range, traits)
        })
    }
}
