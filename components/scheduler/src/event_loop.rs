//! The scheduler loop.
//!
//! Ties the reaction queue and the external task queue together with a fixed
//! two-tier priority: reactions always run before the next external task.

use crate::queue::ReactionQueue;
use crate::task_queue::{Task, TaskQueue};

/// The cooperative scheduler.
///
/// Each cycle of the loop:
/// 1. Drains the reaction queue to exhaustion, including reactions enqueued
///    during the drain
/// 2. Runs the oldest external task, if any
/// 3. Repeats
///
/// So any currently-queued reaction chain resolves fully before a timer or
/// I/O completion dequeued after it can run, even if that external event's
/// underlying condition was satisfied earlier.
///
/// # Examples
///
/// ```
/// use scheduler::{Job, Scheduler, Task};
///
/// let mut scheduler = Scheduler::new();
/// let reactions = scheduler.reactions();
/// reactions.enqueue(Job::new(|| println!("first")));
/// scheduler.enqueue_task(Task::new(|| println!("second")));
/// scheduler.run_until_done();
/// ```
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: TaskQueue,
    reactions: ReactionQueue,
}

impl Scheduler {
    /// Creates a new Scheduler with empty queues.
    pub fn new() -> Self {
        Self {
            tasks: TaskQueue::new(),
            reactions: ReactionQueue::new(),
        }
    }

    /// Creates a Scheduler draining an existing reaction queue.
    pub fn with_reactions(reactions: ReactionQueue) -> Self {
        Self {
            tasks: TaskQueue::new(),
            reactions,
        }
    }

    /// Returns a handle to the reaction queue.
    ///
    /// Deferred values are constructed against this handle so their
    /// settlements land on the queue this scheduler drains.
    pub fn reactions(&self) -> ReactionQueue {
        self.reactions.clone()
    }

    /// Adds an external task to the lower-priority queue.
    pub fn enqueue_task(&mut self, task: Task) {
        self.tasks.enqueue(task);
    }

    /// Runs until both queues are empty.
    pub fn run_until_done(&mut self) {
        while !self.tasks.is_empty() || !self.reactions.is_empty() {
            self.reactions.run_until_empty();
            if let Some(task) = self.tasks.dequeue() {
                task.run();
            }
        }
    }

    /// Drains the reaction queue to exhaustion without touching tasks.
    pub fn drain_reactions(&mut self) {
        self.reactions.run_until_empty();
    }

    /// Processes one cycle: any already-queued reactions, then one external
    /// task, then the reactions it triggered.
    pub fn process_one_cycle(&mut self) {
        self.reactions.run_until_empty();
        if let Some(task) = self.tasks.dequeue() {
            task.run();
        }
        self.reactions.run_until_empty();
    }

    /// Returns true if the external task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns true if the reaction queue is empty.
    pub fn is_reaction_queue_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}
