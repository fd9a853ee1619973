//! Asynchronous measurement and the batching data controller for nodeflow.
//!
//! A [`NodeContext`] wraps a deferred node block bound to one index path and
//! measures it at most once on a [`MeasurementPool`]. The [`DataController`]
//! owns editing and completed [`NodeStore`]s per element kind, measures
//! inserted nodes in batches and commits each edit to both stores before its
//! completion runs on the controlling thread.

mod controller;
mod measurement;

pub use controller::*;
pub use measurement::*;

pub mod prelude {
    pub use crate::{
        DataController, DataControllerConfig, EditError, MeasurementPool, MeasurementState,
        NodeBlock, NodeContext, NodeSlot,
    };
    pub use nodeflow_core::{ElementKind, IndexPath, Size, SizeRange, TraitCollection};
}
