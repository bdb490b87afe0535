//! Virtual-tick timer source.
//!
//! The core treats time as an opaque external collaborator: "invoke this job
//! no sooner than T". [`TimerQueue`] is the reference collaborator used by
//! tests and demos. It runs on virtual ticks rather than a wall clock, so
//! interleaving tests are fully deterministic.

use crate::task_queue::Task;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct TimerEntry {
    deadline: u64,
    seq: u64,
    task: Task,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest deadline; seq keeps FIFO
        // order among entries sharing a deadline.
        (other.deadline, other.seq).cmp(&(self.deadline, self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A queue of delayed jobs ordered by virtual deadline.
///
/// `schedule` registers a task relative to the current tick; `advance` moves
/// virtual time forward and releases every task whose deadline has passed,
/// in deadline order. Released tasks belong on the scheduler's external
/// task queue, never on the reaction queue: a timer completion must not
/// outrank queued reactions.
///
/// # Examples
///
/// ```
/// use scheduler::{Task, TimerQueue};
///
/// let mut timers = TimerQueue::new();
/// timers.schedule(10, Task::new(|| println!("later")));
/// assert!(timers.advance(5).is_empty());
/// assert_eq!(timers.advance(5).len(), 1);
/// ```
#[derive(Default)]
pub struct TimerQueue {
    now: u64,
    next_seq: u64,
    entries: BinaryHeap<TimerEntry>,
}

impl TimerQueue {
    /// Creates a new TimerQueue at tick zero.
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            entries: BinaryHeap::new(),
        }
    }

    /// The current virtual tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Registers a task to be released `delay` ticks from now.
    ///
    /// A zero delay releases on the next `advance` call, not immediately;
    /// the timer source never runs anything itself.
    pub fn schedule(&mut self, delay: u64, task: Task) {
        let entry = TimerEntry {
            deadline: self.now.saturating_add(delay),
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.entries.push(entry);
    }

    /// Advances virtual time by `ticks` and returns every task whose
    /// deadline has been reached, in deadline-then-registration order.
    pub fn advance(&mut self, ticks: u64) -> Vec<Task> {
        self.now = self.now.saturating_add(ticks);
        let mut due = Vec::new();
        while let Some(entry) = self.entries.peek() {
            if entry.deadline > self.now {
                break;
            }
            if let Some(entry) = self.entries.pop() {
                due.push(entry.task);
            }
        }
        if !due.is_empty() {
            tracing::trace!(now = self.now, released = due.len(), "timers fired");
        }
        due
    }

    /// The deadline of the earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.peek().map(|entry| entry.deadline)
    }

    /// Returns true if no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now)
            .field("pending", &self.entries.len())
            .finish()
    }
}
