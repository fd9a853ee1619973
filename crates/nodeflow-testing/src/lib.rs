//! Testing utilities for nodeflow.
//!
//! Stubs here implement the collaborator traits from `nodeflow-core` and count
//! how often they are consulted, so tests can assert on caching and
//! scheduling behavior without a real data source.

mod node;
mod recorder;
mod sources;

pub use node::*;
pub use recorder::*;
pub use sources::*;

pub mod prelude {
    pub use crate::{BatchRecorder, CountingItemSource, FixedSizeProvider, RecordedBatch, TestNode};
}
