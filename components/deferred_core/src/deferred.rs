//! The settle-once deferred value.
//!
//! A [`Deferred`] is a container for the eventual result of an asynchronous
//! operation. It settles at most once, fulfilled or rejected, and dispatches
//! every registered reaction through the reaction queue — never synchronously
//! inside the operation that settled it.

use crate::diagnostics::{self, DiagnosticEvent, Diagnostics};
use crate::outcome::Outcome;
use scheduler::{Job, ReactionQueue};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The observable state of a [`Deferred`].
///
/// Transitions are monotonic: `Pending -> Fulfilled` or `Pending ->
/// Rejected`, never reversible. Settling an already-settled value is a
/// silent no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredState {
    /// The initial state; neither fulfilled nor rejected.
    Pending,
    /// Settled with a success value.
    Fulfilled,
    /// Settled with a rejection reason.
    Rejected,
}

/// The settled result of a [`Deferred`], cloned to every reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The success value.
    Fulfilled(T),
    /// The rejection reason. A reason is plain data, not a language-level
    /// fault.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// The state this settlement corresponds to.
    pub fn state(&self) -> DeferredState {
        match self {
            Settlement::Fulfilled(_) => DeferredState::Fulfilled,
            Settlement::Rejected(_) => DeferredState::Rejected,
        }
    }
}

type ReactionFn<T, E> = Box<dyn FnOnce(Settlement<T, E>)>;

enum State<T, E> {
    Pending { reactions: Vec<ReactionFn<T, E>> },
    Settled(Settlement<T, E>),
}

struct Inner<T, E> {
    state: State<T, E>,
    queue: ReactionQueue,
    diagnostics: Option<Rc<Diagnostics>>,
    rejection_observed: bool,
}

impl<T, E> Drop for Inner<T, E> {
    fn drop(&mut self) {
        // A rejection that no reaction ever consumed is a leak worth
        // surfacing, not a crash.
        if let State::Settled(Settlement::Rejected(_)) = &self.state {
            if !self.rejection_observed {
                diagnostics::report(
                    self.diagnostics.as_deref(),
                    DiagnosticEvent::UnobservedRejection,
                );
            }
        }
    }
}

/// A settle-once container for the eventual result of an asynchronous
/// operation.
///
/// Cloning a `Deferred` yields another handle to the same underlying value;
/// the producer side settles through one handle while consumers register
/// reactions through others. Once settled the value is immutable and may be
/// read by arbitrarily many readers.
///
/// Every `Deferred` is constructed against an explicit [`ReactionQueue`]:
/// its settlements enqueue there, and the scheduler draining that queue
/// decides when reactions run.
///
/// # Examples
///
/// ```
/// use deferred_core::{Deferred, DeferredState};
/// use scheduler::ReactionQueue;
///
/// let queue = ReactionQueue::new();
/// let deferred: Deferred<i32, String> = Deferred::new(&queue);
/// assert_eq!(deferred.state(), DeferredState::Pending);
///
/// deferred.settle_fulfilled(42);
/// assert_eq!(deferred.state(), DeferredState::Fulfilled);
/// ```
pub struct Deferred<T, E> {
    inner: Rc<RefCell<Inner<T, E>>>,
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.inner.borrow().state {
            State::Pending { reactions } => format!("Pending({} reactions)", reactions.len()),
            State::Settled(settlement) => format!("{:?}", settlement.state()),
        };
        f.debug_struct("Deferred").field("state", &state).finish()
    }
}

impl<T, E> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a new pending deferred value bound to `queue`.
    pub fn new(queue: &ReactionQueue) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: State::Pending {
                    reactions: Vec::new(),
                },
                queue: queue.clone(),
                diagnostics: None,
                rejection_observed: false,
            })),
        }
    }

    /// Creates an already-fulfilled deferred value.
    pub fn fulfilled(queue: &ReactionQueue, value: T) -> Self {
        let deferred = Self::new(queue);
        deferred.settle_fulfilled(value);
        deferred
    }

    /// Creates an already-rejected deferred value.
    pub fn rejected_with(queue: &ReactionQueue, reason: E) -> Self {
        let deferred = Self::new(queue);
        deferred.settle_rejected(reason);
        deferred
    }

    /// The current state.
    pub fn state(&self) -> DeferredState {
        match &self.inner.borrow().state {
            State::Pending { .. } => DeferredState::Pending,
            State::Settled(settlement) => settlement.state(),
        }
    }

    /// Returns true once the value has settled.
    pub fn is_settled(&self) -> bool {
        self.state() != DeferredState::Pending
    }

    /// A clone of the settled result, if any.
    ///
    /// Reading the result directly is not a reaction: it does not count as
    /// observing a rejection for diagnostics purposes.
    pub fn settlement(&self) -> Option<Settlement<T, E>> {
        match &self.inner.borrow().state {
            State::Pending { .. } => None,
            State::Settled(settlement) => Some(settlement.clone()),
        }
    }

    /// The reaction queue this value settles through.
    pub fn queue(&self) -> ReactionQueue {
        self.inner.borrow().queue.clone()
    }

    /// Attaches diagnostics hooks to this value.
    ///
    /// Derived values created by chaining inherit the same hooks.
    pub fn set_diagnostics(&self, diagnostics: Rc<Diagnostics>) {
        self.inner.borrow_mut().diagnostics = Some(diagnostics);
    }

    /// Fulfills the value, if still pending; otherwise a silent no-op.
    pub fn settle_fulfilled(&self, value: T) {
        self.settle(Settlement::Fulfilled(value));
    }

    /// Rejects the value, if still pending; otherwise a silent no-op.
    pub fn settle_rejected(&self, reason: E) {
        self.settle(Settlement::Rejected(reason));
    }

    /// Settles with the adoption rule applied to `outcome`.
    ///
    /// A plain value fulfills immediately. One of our own deferreds hands
    /// over its eventual settlement. A foreign awaitable is subscribed to
    /// once and its result taken as this value's own. Each adoption step
    /// unwraps one level of indirection; deeper nesting unwinds through
    /// repeated application.
    ///
    /// Adopting a handle to this same value leaves it pending forever: the
    /// value would be waiting on its own settlement.
    pub fn adopt(&self, outcome: Outcome<T, E>) {
        match outcome {
            Outcome::Value(value) => self.settle_fulfilled(value),
            Outcome::Deferred(source) => {
                let target = self.clone();
                source.when_settled(move |settlement| match settlement {
                    Settlement::Fulfilled(value) => target.settle_fulfilled(value),
                    Settlement::Rejected(reason) => target.settle_rejected(reason),
                });
            }
            Outcome::Foreign(awaitable) => {
                let fulfill = self.clone();
                let reject = self.clone();
                awaitable.register(
                    Box::new(move |value| fulfill.settle_fulfilled(value)),
                    Box::new(move |reason| reject.settle_rejected(reason)),
                );
            }
        }
    }

    /// Registers a raw reaction delivered with the settled result.
    ///
    /// The registration primitive everything else is built on. If the value
    /// is still pending, the reaction is appended in registration order and
    /// dispatched at settlement. If the value has already settled, a queue
    /// entry delivering the result is enqueued immediately — the reaction
    /// still never runs synchronously, preserving ordering relative to
    /// already-queued work.
    pub fn when_settled<F>(&self, reaction: F)
    where
        F: FnOnce(Settlement<T, E>) + 'static,
    {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        match &mut inner.state {
            State::Pending { reactions } => reactions.push(Box::new(reaction)),
            State::Settled(settlement) => {
                if matches!(settlement, Settlement::Rejected(_)) {
                    inner.rejection_observed = true;
                }
                let settlement = settlement.clone();
                let queue = inner.queue.clone();
                drop(guard);
                queue.enqueue(Job::new(move || reaction(settlement)));
            }
        }
    }

    fn settle(&self, settlement: Settlement<T, E>) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let reactions = match &mut inner.state {
            State::Settled(_) => {
                diagnostics::report(
                    inner.diagnostics.as_deref(),
                    DiagnosticEvent::DoubleSettlement,
                );
                return;
            }
            State::Pending { reactions } => std::mem::take(reactions),
        };
        if matches!(settlement, Settlement::Rejected(_)) && !reactions.is_empty() {
            // The reason is being delivered to at least one reaction; that
            // reaction either handles it or forwards responsibility to its
            // derived value.
            inner.rejection_observed = true;
        }
        // State transition and reaction enqueueing form one uninterrupted
        // step: nothing can observe a half-settled value.
        inner.state = State::Settled(settlement.clone());
        let queue = inner.queue.clone();
        drop(guard);
        for reaction in reactions {
            let delivered = settlement.clone();
            queue.enqueue(Job::new(move || reaction(delivered)));
        }
    }

    fn derive<U>(&self) -> Deferred<U, E>
    where
        U: Clone + 'static,
    {
        let inner = self.inner.borrow();
        let derived = Deferred::new(&inner.queue);
        if let Some(diagnostics) = &inner.diagnostics {
            derived.inner.borrow_mut().diagnostics = Some(Rc::clone(diagnostics));
        }
        derived
    }

    /// Attaches a fulfillment and a rejection callback, returning the
    /// derived value they settle.
    ///
    /// The derived value is always a new `Deferred`, never `self`. The
    /// matching callback runs on the queue drain after settlement; its `Ok`
    /// result is adopted per [`adopt`](Self::adopt) (so a callback may hand
    /// back another deferred), and an `Err` rejects the derived value —
    /// a fault inside a callback never escapes to the scheduler.
    ///
    /// # Examples
    ///
    /// ```
    /// use deferred_core::{Deferred, Outcome, Settlement};
    /// use scheduler::Scheduler;
    ///
    /// let mut scheduler = Scheduler::new();
    /// let queue = scheduler.reactions();
    /// let deferred: Deferred<i32, String> = Deferred::fulfilled(&queue, 2);
    /// let doubled = deferred.chain(
    ///     |n| Ok(Outcome::Value(n * 2)),
    ///     |e| Err(e),
    /// );
    /// scheduler.run_until_done();
    /// assert_eq!(doubled.settlement(), Some(Settlement::Fulfilled(4)));
    /// ```
    pub fn chain<U, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Deferred<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Result<Outcome<U, E>, E> + 'static,
        G: FnOnce(E) -> Result<Outcome<U, E>, E> + 'static,
    {
        let derived = self.derive::<U>();
        let target = derived.clone();
        self.when_settled(move |settlement| {
            let result = match settlement {
                Settlement::Fulfilled(value) => on_fulfilled(value),
                Settlement::Rejected(reason) => on_rejected(reason),
            };
            match result {
                Ok(outcome) => target.adopt(outcome),
                Err(reason) => target.settle_rejected(reason),
            }
        });
        derived
    }

    /// Attaches only a fulfillment callback; rejections forward to the
    /// derived value unchanged.
    pub fn chain_fulfilled<U, F>(&self, on_fulfilled: F) -> Deferred<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Result<Outcome<U, E>, E> + 'static,
    {
        let derived = self.derive::<U>();
        let target = derived.clone();
        self.when_settled(move |settlement| match settlement {
            Settlement::Fulfilled(value) => match on_fulfilled(value) {
                Ok(outcome) => target.adopt(outcome),
                Err(reason) => target.settle_rejected(reason),
            },
            Settlement::Rejected(reason) => target.settle_rejected(reason),
        });
        derived
    }

    /// Attaches only a rejection callback; fulfillments forward unchanged.
    ///
    /// Once a rejection is intercepted here, propagation stops and the
    /// chain reverts to the fulfilled track.
    pub fn catch<G>(&self, on_rejected: G) -> Deferred<T, E>
    where
        G: FnOnce(E) -> Result<Outcome<T, E>, E> + 'static,
    {
        let derived = self.derive::<T>();
        let target = derived.clone();
        self.when_settled(move |settlement| match settlement {
            Settlement::Fulfilled(value) => target.settle_fulfilled(value),
            Settlement::Rejected(reason) => match on_rejected(reason) {
                Ok(outcome) => target.adopt(outcome),
                Err(reason) => target.settle_rejected(reason),
            },
        });
        derived
    }

    /// Runs `on_settled` on either settlement path without observing the
    /// outcome.
    ///
    /// `Ok(())` passes the original settlement through unchanged; `Err`
    /// supersedes it with a rejection.
    pub fn finally<F>(&self, on_settled: F) -> Deferred<T, E>
    where
        F: FnOnce() -> Result<(), E> + 'static,
    {
        let derived = self.derive::<T>();
        let target = derived.clone();
        self.when_settled(move |settlement| match on_settled() {
            Err(reason) => target.settle_rejected(reason),
            Ok(()) => match settlement {
                Settlement::Fulfilled(value) => target.settle_fulfilled(value),
                Settlement::Rejected(reason) => target.settle_rejected(reason),
            },
        });
        derived
    }
}
