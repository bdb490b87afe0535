//! Reaction queue: the high-priority FIFO job queue.
//!
//! Every observable consequence of a settlement travels through this queue.
//! Reactions registered on an already-settled value, reactions dispatched at
//! settlement time, and suspension resumptions all become [`Job`]s here, so
//! nothing ever runs synchronously inside the operation that triggered it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A zero-argument job on the reaction queue.
///
/// Jobs are infallible: a fault inside a reaction callback is converted into
/// a rejection of the derived deferred value before it reaches the queue, so
/// the drain loop has no error path.
pub struct Job {
    callback: Box<dyn FnOnce()>,
}

impl Job {
    /// Creates a new Job from a closure.
    ///
    /// The closure may capture `Rc` state; the scheduling model is
    /// single-threaded, so no `Send` bound applies.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the job, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Job {{ ... }}")
    }
}

/// The reaction queue, shared by reference between producers and the
/// scheduler loop.
///
/// Cloning yields another handle to the same queue. Settlement code holds a
/// handle and enqueues; the [`Scheduler`](crate::Scheduler) holds a handle
/// and drains. There is no process-wide queue: every queue is explicitly
/// constructed and passed where it is needed, which keeps ordering tests
/// isolated and deterministic.
///
/// # Examples
///
/// ```
/// use scheduler::{Job, ReactionQueue};
///
/// let queue = ReactionQueue::new();
/// queue.enqueue(Job::new(|| {}));
/// assert_eq!(queue.len(), 1);
/// queue.run_until_empty();
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReactionQueue {
    jobs: Rc<RefCell<VecDeque<Job>>>,
}

impl ReactionQueue {
    /// Creates a new empty ReactionQueue.
    pub fn new() -> Self {
        Self {
            jobs: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Appends a job to the tail of the queue. Never fails.
    pub fn enqueue(&self, job: Job) {
        self.jobs.borrow_mut().push_back(job);
    }

    /// Removes and returns the job at the head of the queue.
    pub fn dequeue(&self) -> Option<Job> {
        self.jobs.borrow_mut().pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.borrow().is_empty()
    }

    /// Returns the number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Pops and runs head jobs until the queue is empty.
    ///
    /// Jobs enqueued while the drain is in progress are seen by the same
    /// drain pass, in strict enqueue order. Jobs run one at a time and run
    /// to completion; there is no preemption.
    pub fn run_until_empty(&self) {
        let mut ran: usize = 0;
        // The borrow must not be held while the job runs: the job may
        // enqueue more jobs on this same queue.
        while let Some(job) = self.dequeue() {
            job.run();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(jobs = ran, "reaction queue drained");
        }
    }
}
