//! Data controller configuration.

use std::thread;

/// Contexts measured per worker in one batch.
///
/// A batch of `workers * SIZING_COUNT_PER_WORKER` keeps every worker busy
/// while bounding how long the caller waits between batch completions.
pub const SIZING_COUNT_PER_WORKER: usize = 5;

/// Upper bound on the worker count picked by [`DataControllerConfig::default`].
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Sizing and diagnostics policy for a [`DataController`](super::DataController).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataControllerConfig {
    /// Number of contexts measured and committed per batch. Never zero.
    pub batch_size: usize,

    /// Number of measurement worker threads. Zero measures on the waiting thread.
    pub worker_count: usize,

    /// Log every store mutation at `info` level.
    pub log_store_updates: bool,
}

impl Default for DataControllerConfig {
    fn default() -> Self {
        let worker_count = thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1)
            .clamp(1, MAX_DEFAULT_WORKERS);
        Self {
            batch_size: worker_count * SIZING_COUNT_PER_WORKER,
            worker_count,
            log_store_updates: false,
        }
    }
}

impl DataControllerConfig {
    /// Creates a config with `worker_count` workers and the matching batch size.
    pub fn new(worker_count: usize) -> Self {
        Self {
            batch_size: worker_count.max(1).saturating_mul(SIZING_COUNT_PER_WORKER),
            worker_count,
            log_store_updates: false,
        }
    }

    /// Measures everything on the controlling thread, one batch per `batch_size` contexts.
    pub fn inline(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            worker_count: 0,
            log_store_updates: false,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_store_update_logging(mut self, enabled: bool) -> Self {
        self.log_store_updates = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_batch_matches_workers() {
        let config = DataControllerConfig::default();
        assert!(config.worker_count >= 1 && config.worker_count <= MAX_DEFAULT_WORKERS);
        assert_eq!(config.batch_size, config.worker_count * SIZING_COUNT_PER_WORKER);
        assert!(!config.log_store_updates);
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        assert_eq!(DataControllerConfig::new(2).with_batch_size(0).batch_size, 1);
        assert_eq!(DataControllerConfig::inline(0).batch_size, 1);
        assert_eq!(DataControllerConfig::new(0).batch_size, SIZING_COUNT_PER_WORKER);
    }

    #[test]
    fn huge_worker_count_saturates_batch_size() {
        let config = DataControllerConfig::new(usize::MAX / 2);
        assert_eq!(config.batch_size, usize::MAX);
        assert_eq!(config.worker_count, usize::MAX / 2);
    }
}
