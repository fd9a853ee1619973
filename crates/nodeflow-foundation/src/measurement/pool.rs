//! Bounded worker pool that runs scheduled measurements.
//!
//! Workers pull boxed jobs off a shared channel. The pool never guarantees a
//! job runs on a worker: a waiter may claim the same computation first (see
//! [`NodeContext::wait_for_measurement`](super::NodeContext::wait_for_measurement)),
//! which is also what keeps a pool with zero workers usable.

use std::cell::Cell;
use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

thread_local! {
    static IS_MEASUREMENT_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Cloneable handle to a set of measurement worker threads.
///
/// Workers shut down and are joined when the last handle is dropped.
#[derive(Clone)]
pub struct MeasurementPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl MeasurementPool {
    /// Spawns up to `worker_count` workers.
    ///
    /// A worker that fails to spawn is logged and skipped; the pool keeps
    /// working with whatever it got, down to zero workers.
    pub fn new(worker_count: usize) -> Self {
        if worker_count == 0 {
            return Self::inline();
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let mut workers = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let receiver = Arc::clone(&receiver);
            let spawned = thread::Builder::new()
                .name(format!("nodeflow-measure-{index}"))
                .spawn(move || worker_loop(receiver));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    log::warn!("failed to spawn measurement worker {index}: {err}");
                }
            }
        }

        let worker_count = workers.len();
        log::debug!("measurement pool started with {worker_count} workers");
        Self {
            inner: Arc::new(PoolInner {
                sender: Mutex::new((worker_count > 0).then_some(sender)),
                workers: Mutex::new(workers),
                worker_count,
            }),
        }
    }

    /// A pool without workers. Every measurement runs on the thread that waits for it.
    pub fn inline() -> Self {
        Self {
            inner: Arc::new(PoolInner {
                sender: Mutex::new(None),
                workers: Mutex::new(Vec::new()),
                worker_count: 0,
            }),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.inner.worker_count
    }

    /// Returns true when the calling thread is a measurement worker of any pool.
    pub fn is_worker_thread() -> bool {
        IS_MEASUREMENT_WORKER.with(Cell::get)
    }

    /// Enqueues `job`. Without workers the job is dropped unrun.
    pub(crate) fn submit(&self, job: impl FnOnce() + Send + 'static) {
        let sender = self
            .inner
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            if sender.send(Box::new(job)).is_err() {
                log::warn!("measurement pool is shutting down; job left to its waiter");
            }
        }
    }
}

impl fmt::Debug for MeasurementPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementPool")
            .field("worker_count", &self.inner.worker_count)
            .finish()
    }
}

impl Drop for PoolInner {
    fn drop(&mut self) {
        // Closing the channel ends every worker loop.
        self.sender
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let current = thread::current().id();
        let workers = std::mem::take(self.workers.get_mut().unwrap_or_else(PoisonError::into_inner));
        for handle in workers {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::error!("measurement worker exited by panic");
            }
        }
    }
}

fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<Job>>>) {
    IS_MEASUREMENT_WORKER.with(|flag| flag.set(true));
    loop {
        let job = {
            let receiver = receiver.lock().unwrap_or_else(PoisonError::into_inner);
            receiver.recv()
        };
        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}
