//! Deferred values: settle-once containers with queue-ordered reactions.
//!
//! This crate provides the deferred-value core:
//! - [`Deferred`] - a settle-once container whose reactions dispatch through
//!   an explicit reaction queue, never synchronously
//! - [`Outcome`] / [`Awaitable`] - the adoption boundary for values that
//!   stand for eventual results
//! - [`combinators`] - `all`, `race`, `any`, `resolve`, `reject`
//! - [`Diagnostics`] - hooks for double-settlement attempts and unobserved
//!   rejections
//!
//! # Overview
//!
//! A [`Deferred`] transitions from pending to fulfilled or rejected exactly
//! once. Consumers register reactions with [`Deferred::chain`],
//! [`Deferred::catch`] and [`Deferred::finally`]; each returns a new derived
//! value settled from the callback's result, with faults converted into
//! rejections and deferred-valued results adopted recursively.
//!
//! # Examples
//!
//! ```
//! use deferred_core::{Deferred, Outcome, Settlement};
//! use scheduler::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let queue = scheduler.reactions();
//!
//! let source: Deferred<i32, String> = Deferred::new(&queue);
//! let derived = source.chain_fulfilled(|n| Ok(Outcome::Value(n + 1)));
//!
//! source.settle_fulfilled(41);
//! scheduler.run_until_done();
//! assert_eq!(derived.settlement(), Some(Settlement::Fulfilled(42)));
//! ```
//!
//! ## Combinators
//!
//! ```
//! use deferred_core::{combinators, Deferred, Settlement};
//! use scheduler::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let queue = scheduler.reactions();
//!
//! let a: Deferred<i32, String> = Deferred::fulfilled(&queue, 1);
//! let b: Deferred<i32, String> = Deferred::fulfilled(&queue, 2);
//! let both = combinators::all(&queue, vec![a, b]);
//!
//! scheduler.run_until_done();
//! assert_eq!(both.settlement(), Some(Settlement::Fulfilled(vec![1, 2])));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinators;
pub mod deferred;
pub mod diagnostics;
pub mod outcome;

// Re-export main types at crate root
pub use combinators::AggregateError;
pub use deferred::{Deferred, DeferredState, Settlement};
pub use diagnostics::{DiagnosticEvent, Diagnostics};
pub use outcome::{Awaitable, Outcome};
