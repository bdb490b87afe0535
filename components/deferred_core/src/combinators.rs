//! Structural combinators composing many deferred values into one.
//!
//! Every combinator creates a fresh result and settles it exactly once; the
//! monotonic-settlement no-op makes the "first settlement wins" races here
//! free of bookkeeping.

use crate::deferred::{Deferred, Settlement};
use crate::outcome::Outcome;
use scheduler::ReactionQueue;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// The rejection reason produced by [`any`] when every source rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("every source rejected ({} reasons)", .reasons.len())]
pub struct AggregateError<E> {
    /// Every source's rejection reason, in source order.
    pub reasons: Vec<E>,
}

/// Fulfills with every source's value in source order once all sources have
/// fulfilled; rejects with the first rejection reported by any source.
///
/// After a rejection the remaining sources' eventual outcomes are observed
/// but ignored. An empty source sequence fulfills immediately with an empty
/// vector.
pub fn all<T, E>(queue: &ReactionQueue, sources: Vec<Deferred<T, E>>) -> Deferred<Vec<T>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let result = Deferred::new(queue);
    if sources.is_empty() {
        result.settle_fulfilled(Vec::new());
        return result;
    }

    struct Gather<T> {
        slots: Vec<Option<T>>,
        remaining: usize,
    }
    let count = sources.len();
    let gather = Rc::new(RefCell::new(Gather {
        slots: (0..count).map(|_| None).collect(),
        remaining: count,
    }));

    for (index, source) in sources.into_iter().enumerate() {
        let result = result.clone();
        let gather = gather.clone();
        source.when_settled(move |settlement| match settlement {
            Settlement::Fulfilled(value) => {
                let mut gather = gather.borrow_mut();
                gather.slots[index] = Some(value);
                gather.remaining -= 1;
                if gather.remaining == 0 {
                    // Positional order, not settlement order. Every slot is
                    // filled once remaining hits zero.
                    let values = gather.slots.drain(..).flatten().collect();
                    result.settle_fulfilled(values);
                }
            }
            Settlement::Rejected(reason) => result.settle_rejected(reason),
        });
    }
    result
}

/// Settles with the outcome of whichever source settles first, by settlement
/// time, not position.
///
/// An empty source sequence never settles; no source exists to settle it.
pub fn race<T, E>(queue: &ReactionQueue, sources: Vec<Deferred<T, E>>) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let result = Deferred::new(queue);
    for source in sources {
        let result = result.clone();
        source.when_settled(move |settlement| match settlement {
            Settlement::Fulfilled(value) => result.settle_fulfilled(value),
            Settlement::Rejected(reason) => result.settle_rejected(reason),
        });
    }
    result
}

/// Fulfills with the first fulfillment observed; rejects only if every
/// source rejects, aggregating all reasons in source order.
///
/// An empty source sequence never settles.
pub fn any<T, E>(
    queue: &ReactionQueue,
    sources: Vec<Deferred<T, E>>,
) -> Deferred<T, AggregateError<E>>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let result = Deferred::new(queue);

    struct Collect<E> {
        reasons: Vec<Option<E>>,
        remaining: usize,
    }
    let count = sources.len();
    let collect = Rc::new(RefCell::new(Collect {
        reasons: (0..count).map(|_| None).collect(),
        remaining: count,
    }));

    for (index, source) in sources.into_iter().enumerate() {
        let result = result.clone();
        let collect = collect.clone();
        source.when_settled(move |settlement| match settlement {
            Settlement::Fulfilled(value) => result.settle_fulfilled(value),
            Settlement::Rejected(reason) => {
                let mut collect = collect.borrow_mut();
                collect.reasons[index] = Some(reason);
                collect.remaining -= 1;
                if collect.remaining == 0 {
                    let reasons = collect.reasons.drain(..).flatten().collect();
                    result.settle_rejected(AggregateError { reasons });
                }
            }
        });
    }
    result
}

/// Resolves an [`Outcome`] into a deferred value.
///
/// An existing [`Deferred`] is returned unchanged, no wrapping. A foreign
/// awaitable gets a fresh deferred adopting its eventual result. A plain
/// value becomes an already-fulfilled deferred; the unit instantiation
/// `resolve(queue, Outcome::Value(()))` is the no-argument form.
pub fn resolve<T, E>(queue: &ReactionQueue, outcome: Outcome<T, E>) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    match outcome {
        Outcome::Value(value) => Deferred::fulfilled(queue, value),
        Outcome::Deferred(deferred) => deferred,
        Outcome::Foreign(awaitable) => {
            let deferred = Deferred::new(queue);
            deferred.adopt(Outcome::Foreign(awaitable));
            deferred
        }
    }
}

/// Returns an already-rejected deferred value holding `reason`.
///
/// Rejection reasons are never adopted or unwrapped, even if `reason` is
/// itself a deferred value.
pub fn reject<T, E>(queue: &ReactionQueue, reason: E) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    Deferred::rejected_with(queue, reason)
}
