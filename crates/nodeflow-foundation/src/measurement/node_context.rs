//! Deferred, cancellable, once-only measurement bound to one index path.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use nodeflow_core::{IndexPath, SizeRange, TraitCollection};

use super::pool::MeasurementPool;

/// Builds a node for a size range and trait snapshot. Invoked at most once.
pub type NodeBlock<N> = Box<dyn FnOnce(SizeRange, &TraitCollection) -> N + Send + 'static>;

/// Lifecycle of a [`NodeContext`].
///
/// `Unscheduled -> Scheduled -> {Completed | Cancelled}`, plus the shortcut
/// `Unscheduled -> Cancelled`. Completed and cancelled are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasurementState {
    Unscheduled,
    Scheduled,
    Completed,
    Cancelled,
}

impl MeasurementState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A measurement task for the node at one index path.
///
/// The node block runs off the caller's thread when a pool worker picks it
/// up, or on the waiting thread when nobody has yet. Dropping a context that
/// has not reached a terminal state cancels it.
pub struct NodeContext<N: Send + Sync + 'static> {
    shared: Arc<Shared<N>>,
    pool: MeasurementPool,
}

struct Shared<N> {
    index_path: IndexPath,
    constrained_size: SizeRange,
    traits: TraitCollection,
    measurement: Mutex<Measurement<N>>,
    finished: Condvar,
}

struct Measurement<N> {
    state: MeasurementState,
    /// `None` once claimed by a runner or discarded by cancellation.
    node_block: Option<NodeBlock<N>>,
    node: Option<Arc<N>>,
}

impl<N: Send + Sync + 'static> NodeContext<N> {
    pub fn new(
        node_block: NodeBlock<N>,
        index_path: IndexPath,
        constrained_size: SizeRange,
        traits: TraitCollection,
        pool: &MeasurementPool,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                index_path,
                constrained_size,
                traits,
                measurement: Mutex::new(Measurement {
                    state: MeasurementState::Unscheduled,
                    node_block: Some(node_block),
                    node: None,
                }),
                finished: Condvar::new(),
            }),
            pool: pool.clone(),
        }
    }

    pub fn index_path(&self) -> IndexPath {
        self.shared.index_path
    }

    pub fn constrained_size(&self) -> SizeRange {
        self.shared.constrained_size
    }

    pub fn environment_traits(&self) -> &TraitCollection {
        &self.shared.traits
    }

    pub fn measurement_state(&self) -> MeasurementState {
        self.shared.lock().state
    }

    pub fn is_measurement_cancelled(&self) -> bool {
        self.measurement_state() == MeasurementState::Cancelled
    }

    /// Schedules measurement on the pool if it hasn't been scheduled already.
    pub fn schedule_measurement(&self) {
        {
            let mut measurement = self.shared.lock();
            if measurement.state != MeasurementState::Unscheduled {
                return;
            }
            measurement.state = MeasurementState::Scheduled;
        }
        log::trace!("scheduled measurement at {}", self.shared.index_path);
        let shared = Arc::clone(&self.shared);
        self.pool.submit(move || {
            shared.run();
        });
    }

    /// Blocks until measurement completes or is cancelled, scheduling it if needed.
    ///
    /// If no worker has picked the computation up yet, the calling thread
    /// claims it and runs it itself. Waiting from inside a node block that
    /// occupies the last free worker therefore cannot deadlock.
    pub fn wait_for_measurement(&self) {
        self.schedule_measurement();
        if self.shared.run() {
            log::trace!(
                "measured {} on waiting thread (worker: {})",
                self.shared.index_path,
                MeasurementPool::is_worker_thread()
            );
        }
        let mut measurement = self.shared.lock();
        while !measurement.state.is_terminal() {
            measurement = self
                .shared
                .finished
                .wait(measurement)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cancels measurement. Idempotent; a no-op once terminal.
    ///
    /// A computation already running keeps running but its result is
    /// discarded when it tries to publish.
    pub fn cancel_measurement(&self) {
        let discarded_block = {
            let mut measurement = self.shared.lock();
            if measurement.state.is_terminal() {
                return;
            }
            measurement.state = MeasurementState::Cancelled;
            measurement.node_block.take()
        };
        self.shared.finished.notify_all();
        log::trace!("cancelled measurement at {}", self.shared.index_path);
        drop(discarded_block);
    }

    /// The measured node, present only once measurement has completed.
    pub fn node(&self) -> Option<Arc<N>> {
        let measurement = self.shared.lock();
        match measurement.state {
            MeasurementState::Completed => measurement.node.clone(),
            _ => None,
        }
    }

    /// Projects contexts to their index paths, preserving order.
    pub fn index_paths_from_contexts(contexts: &[NodeContext<N>]) -> Vec<IndexPath> {
        contexts.iter().map(NodeContext::index_path).collect()
    }
}

impl<N> Shared<N> {
    fn lock(&self) -> MutexGuard<'_, Measurement<N>> {
        self.measurement
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims and runs the node block. Returns false if it was not claimable.
    fn run(&self) -> bool {
        let node_block = {
            let mut measurement = self.lock();
            if measurement.state != MeasurementState::Scheduled {
                return false;
            }
            match measurement.node_block.take() {
                Some(node_block) => node_block,
                None => return false,
            }
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            node_block(self.constrained_size, &self.traits)
        }));

        let discarded = {
            let mut measurement = self.lock();
            match outcome {
                Ok(node) if measurement.state == MeasurementState::Scheduled => {
                    assert!(
                        measurement.node.is_none(),
                        "measurement at {} published twice",
                        self.index_path
                    );
                    measurement.node = Some(Arc::new(node));
                    measurement.state = MeasurementState::Completed;
                    None
                }
                Ok(node) => {
                    log::warn!(
                        "discarding node at {}: cancelled while measuring",
                        self.index_path
                    );
                    Some(node)
                }
                Err(_) => {
                    log::error!("node block at {} panicked", self.index_path);
                    measurement.state = MeasurementState::Cancelled;
                    None
                }
            }
        };
        self.finished.notify_all();
        drop(discarded);
        true
    }
}

impl<N: Send + Sync + 'static> Drop for NodeContext<N> {
    fn drop(&mut self) {
        self.cancel_measurement();
    }
}

impl<N: Send + Sync + 'static> fmt::Debug for NodeContext<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("index_path", &self.shared.index_path)
            .field("constrained_size", &self.shared.constrained_size)
            .field("state", &self.measurement_state())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/node_context_tests.rs"]
mod tests;
