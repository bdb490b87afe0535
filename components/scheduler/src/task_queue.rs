//! External task queue.
//!
//! Tasks are jobs handed to the scheduler by external collaborators: timer
//! expirations and I/O completions. They sit on a lower-priority queue than
//! reactions; the scheduler runs one task per cycle and drains every queued
//! reaction before taking the next.

use std::collections::VecDeque;

/// An externally-scheduled job.
///
/// The scheduler treats the producer of a Task as opaque: anything able to
/// say "run this when condition X holds" enqueues one of these.
pub struct Task {
    callback: Box<dyn FnOnce()>,
}

impl Task {
    /// Creates a new Task from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A FIFO queue of external tasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
