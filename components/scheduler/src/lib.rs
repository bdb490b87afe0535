//! Cooperative single-threaded scheduler for deferred-value execution.
//!
//! This crate provides the scheduling substrate that orders continuation
//! execution:
//! - [`ReactionQueue`] - FIFO queue of reaction jobs, drained exhaustively
//!   before any externally-scheduled work runs
//! - [`TaskQueue`] - lower-priority FIFO queue fed by external collaborators
//!   (timer and I/O completions)
//! - [`TimerQueue`] - virtual-tick timer source producing [`Task`]s
//! - [`Scheduler`] - the loop tying the two queues together
//!
//! # Scheduling model
//!
//! Single logical thread of control. At most one job runs at a time and runs
//! to completion before the next is dequeued. The reaction queue is drained
//! to empty, including jobs enqueued during the drain, before the scheduler
//! takes the next external task. This gives queued reactions strict priority
//! over pending external events.
//!
//! # Examples
//!
//! ```
//! use scheduler::{Job, Scheduler, Task};
//!
//! let mut scheduler = Scheduler::new();
//! let reactions = scheduler.reactions();
//!
//! scheduler.enqueue_task(Task::new(move || {
//!     reactions.enqueue(Job::new(|| println!("reaction")));
//!     println!("task");
//! }));
//! scheduler.run_until_done();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event_loop;
pub mod queue;
pub mod task_queue;
pub mod timer;

// Re-export main types at crate root
pub use event_loop::Scheduler;
pub use queue::{Job, ReactionQueue};
pub use task_queue::{Task, TaskQueue};
pub use timer::TimerQueue;
