//! Node contexts and the worker pool that measures them.

mod node_context;
mod pool;

pub use node_context::{MeasurementState, NodeBlock, NodeContext};
pub use pool::MeasurementPool;
