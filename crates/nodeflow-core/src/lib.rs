//! Core value types for nodeflow.
//!
//! Everything here is plain data or a small contract: index paths and element
//! kinds key the stores, size ranges and trait snapshots parameterize
//! measurement, and [`ControllingThread`] pins store ownership to one thread.

pub mod collections;
mod environment;
mod geometry;
mod index_path;
mod kind;
mod source;
mod thread;

pub use environment::*;
pub use geometry::*;
pub use index_path::*;
pub use kind::*;
pub use source::*;
pub use thread::*;
