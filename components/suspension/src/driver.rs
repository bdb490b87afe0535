//! The external driver that runs coroutine bodies.
//!
//! [`spawn`] runs a body synchronously up to its first suspension point and
//! hands back the deferred value representing its eventual outcome. Every
//! resumption after that arrives as a reaction-queue job, so a suspended
//! body costs the scheduler nothing and resumptions obey the same ordering
//! guarantees as any other reaction.

use crate::coroutine::{Coroutine, Progress, Resumption};
use deferred_core::{combinators, Deferred, Settlement};
use scheduler::ReactionQueue;
use std::cell::RefCell;
use std::rc::Rc;

/// Starts a coroutine body.
///
/// The body runs synchronously up to its first suspension point; the
/// returned deferred value is available immediately either way. An `Err`
/// from any segment rejects that value — it is never re-thrown into the
/// caller's synchronous stack.
///
/// # Examples
///
/// ```
/// use deferred_core::{Outcome, Settlement};
/// use scheduler::Scheduler;
/// use suspension::{spawn, Coroutine, Progress, Resumption};
///
/// struct AddOne {
///     input: deferred_core::Deferred<i32, String>,
/// }
///
/// impl Coroutine<String> for AddOne {
///     type Awaited = i32;
///     type Output = i32;
///
///     fn resume(
///         &mut self,
///         input: Resumption<i32, String>,
///     ) -> Result<Progress<i32, i32, String>, String> {
///         match input {
///             Resumption::Start => Ok(Progress::Suspended(self.input.clone().into())),
///             Resumption::Fulfilled(n) => Ok(Progress::Completed(Outcome::Value(n + 1))),
///             Resumption::Rejected(e) => Err(e),
///         }
///     }
/// }
///
/// let mut scheduler = Scheduler::new();
/// let queue = scheduler.reactions();
/// let input = deferred_core::Deferred::fulfilled(&queue, 41);
/// let result = spawn(&queue, AddOne { input });
/// scheduler.run_until_done();
/// assert_eq!(result.settlement(), Some(Settlement::Fulfilled(42)));
/// ```
pub fn spawn<C, E>(queue: &ReactionQueue, body: C) -> Deferred<C::Output, E>
where
    C: Coroutine<E> + 'static,
    C::Awaited: Clone + 'static,
    C::Output: Clone + 'static,
    E: Clone + 'static,
{
    let result = Deferred::new(queue);
    let body = Rc::new(RefCell::new(body));
    step(body, result.clone(), queue.clone(), Resumption::Start);
    result
}

fn step<C, E>(
    body: Rc<RefCell<C>>,
    result: Deferred<C::Output, E>,
    queue: ReactionQueue,
    input: Resumption<C::Awaited, E>,
) where
    C: Coroutine<E> + 'static,
    C::Awaited: Clone + 'static,
    C::Output: Clone + 'static,
    E: Clone + 'static,
{
    let progress = body.borrow_mut().resume(input);
    match progress {
        Err(reason) => result.settle_rejected(reason),
        Ok(Progress::Completed(outcome)) => result.adopt(outcome),
        Ok(Progress::Suspended(operand)) => {
            tracing::trace!("coroutine suspended at await point");
            let awaited = combinators::resolve(&queue, operand);
            awaited.when_settled(move |settlement| {
                let input = match settlement {
                    Settlement::Fulfilled(value) => Resumption::Fulfilled(value),
                    Settlement::Rejected(reason) => Resumption::Rejected(reason),
                };
                step(body, result, queue, input);
            });
        }
    }
}
