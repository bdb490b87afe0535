//! Suspension transform: sequential-looking bodies that suspend at awaits.
//!
//! This crate provides the async/await analogue for deferred values without
//! relying on a host generator primitive:
//! - [`Coroutine`] - an explicit state-holding body resumed segment by
//!   segment
//! - [`Resumption`] / [`Progress`] - the values crossing the driver
//!   boundary at each suspension point
//! - [`spawn`] - the external driver: runs the body's synchronous prologue,
//!   registers a reaction per await, and settles the body's deferred value
//!
//! # Examples
//!
//! ```
//! use deferred_core::{Deferred, Outcome, Settlement};
//! use scheduler::Scheduler;
//! use suspension::{spawn, Coroutine, Progress, Resumption};
//!
//! // let doubled = async { (await input) * 2 };
//! struct Doubler {
//!     input: Deferred<i32, String>,
//! }
//!
//! impl Coroutine<String> for Doubler {
//!     type Awaited = i32;
//!     type Output = i32;
//!
//!     fn resume(
//!         &mut self,
//!         input: Resumption<i32, String>,
//!     ) -> Result<Progress<i32, i32, String>, String> {
//!         match input {
//!             Resumption::Start => Ok(Progress::Suspended(self.input.clone().into())),
//!             Resumption::Fulfilled(n) => Ok(Progress::Completed(Outcome::Value(n * 2))),
//!             Resumption::Rejected(e) => Err(e),
//!         }
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new();
//! let queue = scheduler.reactions();
//! let input = Deferred::new(&queue);
//! let result = spawn(&queue, Doubler { input: input.clone() });
//!
//! input.settle_fulfilled(21);
//! scheduler.run_until_done();
//! assert_eq!(result.settlement(), Some(Settlement::Fulfilled(42)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coroutine;
pub mod driver;

// Re-export main types at crate root
pub use coroutine::{Coroutine, Progress, Resumption};
pub use driver::spawn;
