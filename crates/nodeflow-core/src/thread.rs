//! Controlling-thread capability.
//!
//! Store mutation and completion callbacks belong to one thread. A
//! [`ControllingThread`] is minted on that thread and is neither `Send` nor
//! `Sync`, so anything that owns one is pinned to the thread it was built on.
//! Operations additionally check [`ControllingThread::assert_current`]; a
//! failure is a programming error and panics.

use std::marker::PhantomData;
use std::thread::{self, ThreadId};

#[derive(Clone, Copy, Debug)]
pub struct ControllingThread {
    id: ThreadId,
    _not_send: PhantomData<*const ()>,
}

impl ControllingThread {
    /// Claims the calling thread as the controlling thread.
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
            _not_send: PhantomData,
        }
    }

    pub fn thread_id(&self) -> ThreadId {
        self.id
    }

    /// Returns true when called from the thread this token was minted on.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Panics unless called from the controlling thread.
    #[track_caller]
    pub fn assert_current(&self, operation: &str) {
        assert!(
            self.is_current(),
            "{operation} must run on the controlling thread ({:?}), called from {:?}",
            self.id,
            thread::current().id()
        );
    }
}
