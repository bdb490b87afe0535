//! The resumable-computation representation.
//!
//! A suspend-capable function body is written as an explicit state machine:
//! each call to [`Coroutine::resume`] runs one synchronous segment, ending
//! either at a suspension point (an await) or at completion. The driver in
//! [`crate::driver`] feeds settlements back in, so the body never blocks the
//! scheduler.

use deferred_core::Outcome;

/// What the driver feeds into a body when resuming it.
#[derive(Debug)]
pub enum Resumption<V, E> {
    /// The initial call; no await has produced anything yet.
    Start,
    /// The awaited value fulfilled; this is the await expression's result.
    Fulfilled(V),
    /// The awaited value rejected. The body may intercept this and continue
    /// on the fulfilled track, or propagate it by returning `Err`.
    Rejected(E),
}

/// Where a body stands after one synchronous segment.
#[derive(Debug)]
pub enum Progress<V, T, E> {
    /// An await point: the operand is resolved per the `resolve` rule (a
    /// plain `Outcome::Value` is legal and resumes on the next drain), and
    /// the body suspends until it settles.
    Suspended(Outcome<V, E>),
    /// A `return`: the value is adopted, so completing with a deferred
    /// chains naturally.
    Completed(Outcome<T, E>),
}

/// A suspend-capable function body.
///
/// The driver calls `resume` with [`Resumption::Start`] exactly once, then
/// with `Fulfilled` or `Rejected` once per suspension point. Returning
/// `Err` models an uncaught throw anywhere in the body, synchronous
/// prologue included; the driver turns it into a rejection of the body's
/// deferred value rather than unwinding the caller's stack.
///
/// `Awaited` is the type carried across this body's suspension points. A
/// body awaiting values of several types declares its own enum for it;
/// that is the state machine's concern, not the driver's.
pub trait Coroutine<E> {
    /// The value type produced at this body's suspension points.
    type Awaited;
    /// The type this body completes with.
    type Output;

    /// Runs the next synchronous segment of the body.
    fn resume(
        &mut self,
        input: Resumption<Self::Awaited, E>,
    ) -> Result<Progress<Self::Awaited, Self::Output, E>, E>;
}
