//! Scheduler - Deferred work that must run after the current dispatch.
//!
//! Opening a modal moves focus into it, but only after the host has had a
//! chance to lay the modal out (it was `display: none` a moment ago). The
//! coordinator queues a [`Task`] and the host flushes the queue with
//! `Runtime::tick()`.
//!
//! Tasks are not cancelable. Each carries enough context for its owner to
//! tell at execution time whether it has been superseded.

use std::collections::VecDeque;

use crate::types::NodeId;

/// A unit of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Move focus into `modal`, unless it is no longer the active modal of
    /// the same open `generation`.
    FocusFirst { modal: NodeId, generation: u64 },
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Task) {
        tracing::trace!(?task, "scheduled");
        self.queue.push_back(task);
    }

    /// Take every queued task in FIFO order. Tasks scheduled while the
    /// drained ones run wait for the next drain.
    pub fn drain(&mut self) -> Vec<Task> {
        self.queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
