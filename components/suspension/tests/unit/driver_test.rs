//! Unit tests for the coroutine driver.

use deferred_core::{Deferred, DeferredState, Outcome, Settlement};
use scheduler::Scheduler;
use suspension::{spawn, Coroutine, Progress, Resumption};

/// let total = async { (await first) + (await second) };
struct SumTwo {
    state: SumState,
    first: Deferred<i32, String>,
    second: Deferred<i32, String>,
}

enum SumState {
    Start,
    AwaitingFirst,
    AwaitingSecond { first: i32 },
}

impl Coroutine<String> for SumTwo {
    type Awaited = i32;
    type Output = i32;

    fn resume(
        &mut self,
        input: Resumption<i32, String>,
    ) -> Result<Progress<i32, i32, String>, String> {
        match (&self.state, input) {
            (SumState::Start, Resumption::Start) => {
                self.state = SumState::AwaitingFirst;
                Ok(Progress::Suspended(self.first.clone().into()))
            }
            (SumState::AwaitingFirst, Resumption::Fulfilled(first)) => {
                self.state = SumState::AwaitingSecond { first };
                Ok(Progress::Suspended(self.second.clone().into()))
            }
            (SumState::AwaitingSecond { first }, Resumption::Fulfilled(second)) => {
                Ok(Progress::Completed(Outcome::Value(*first + second)))
            }
            (_, Resumption::Rejected(reason)) => Err(reason),
            _ => Err("resumed in an impossible state".to_string()),
        }
    }
}

#[test]
fn test_sequential_awaits_thread_values_through() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let first = Deferred::new(&queue);
    let second = Deferred::new(&queue);

    let total = spawn(
        &queue,
        SumTwo {
            state: SumState::Start,
            first: first.clone(),
            second: second.clone(),
        },
    );

    first.settle_fulfilled(40);
    scheduler.run_until_done();
    assert_eq!(total.state(), DeferredState::Pending);

    second.settle_fulfilled(2);
    scheduler.run_until_done();
    assert_eq!(total.settlement(), Some(Settlement::Fulfilled(42)));
}

#[test]
fn test_awaited_rejection_propagates_when_not_intercepted() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let first = Deferred::new(&queue);
    let second = Deferred::new(&queue);

    let total = spawn(
        &queue,
        SumTwo {
            state: SumState::Start,
            first: first.clone(),
            second,
        },
    );

    first.settle_rejected("first broke".to_string());
    scheduler.run_until_done();
    let observed = total.catch(|reason| Ok(Outcome::Value(reason.len() as i32)));
    scheduler.run_until_done();
    assert_eq!(
        observed.settlement(),
        Some(Settlement::Fulfilled("first broke".len() as i32))
    );
}

/// let n = async { try { await risky } catch { fallback } };
struct Recovering {
    risky: Deferred<i32, String>,
    fallback: i32,
}

impl Coroutine<String> for Recovering {
    type Awaited = i32;
    type Output = i32;

    fn resume(
        &mut self,
        input: Resumption<i32, String>,
    ) -> Result<Progress<i32, i32, String>, String> {
        match input {
            Resumption::Start => Ok(Progress::Suspended(self.risky.clone().into())),
            Resumption::Fulfilled(n) => Ok(Progress::Completed(Outcome::Value(n))),
            // The surrounding error-handling construct: interception stops
            // propagation and the body continues on the fulfilled track.
            Resumption::Rejected(_) => Ok(Progress::Completed(Outcome::Value(self.fallback))),
        }
    }
}

#[test]
fn test_body_can_intercept_awaited_rejection() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let risky = Deferred::new(&queue);

    let result = spawn(
        &queue,
        Recovering {
            risky: risky.clone(),
            fallback: -1,
        },
    );

    risky.settle_rejected("expected".to_string());
    scheduler.run_until_done();
    assert_eq!(result.settlement(), Some(Settlement::Fulfilled(-1)));
}

/// Awaiting a plain value still suspends until the next queue drain.
struct AwaitPlain {
    value: Option<i32>,
}

impl Coroutine<String> for AwaitPlain {
    type Awaited = i32;
    type Output = i32;

    fn resume(
        &mut self,
        input: Resumption<i32, String>,
    ) -> Result<Progress<i32, i32, String>, String> {
        match input {
            Resumption::Start => match self.value.take() {
                Some(v) => Ok(Progress::Suspended(Outcome::Value(v))),
                None => Err("spawned twice".to_string()),
            },
            Resumption::Fulfilled(n) => Ok(Progress::Completed(Outcome::Value(n))),
            Resumption::Rejected(e) => Err(e),
        }
    }
}

#[test]
fn test_await_on_plain_value_resumes_on_next_drain() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let result = spawn(&queue, AwaitPlain { value: Some(8) });

    assert_eq!(result.state(), DeferredState::Pending);
    scheduler.run_until_done();
    assert_eq!(result.settlement(), Some(Settlement::Fulfilled(8)));
}

#[test]
fn test_await_unwraps_nested_adoption_chain() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();

    let innermost: Deferred<i32, String> = Deferred::new(&queue);
    let middle: Deferred<i32, String> = Deferred::new(&queue);
    middle.adopt(Outcome::Deferred(innermost.clone()));

    let result = spawn(&queue, AwaitDeferred { input: Some(middle) });
    innermost.settle_fulfilled(64);
    scheduler.run_until_done();
    assert_eq!(result.settlement(), Some(Settlement::Fulfilled(64)));
}

struct AwaitDeferred {
    input: Option<Deferred<i32, String>>,
}

impl Coroutine<String> for AwaitDeferred {
    type Awaited = i32;
    type Output = i32;

    fn resume(
        &mut self,
        input: Resumption<i32, String>,
    ) -> Result<Progress<i32, i32, String>, String> {
        match input {
            Resumption::Start => match self.input.take() {
                Some(d) => Ok(Progress::Suspended(d.into())),
                None => Err("spawned twice".to_string()),
            },
            Resumption::Fulfilled(n) => Ok(Progress::Completed(Outcome::Value(n))),
            Resumption::Rejected(e) => Err(e),
        }
    }
}

/// Completing with a deferred value: the body's result adopts it.
struct ReturnDeferred {
    inner: Option<Deferred<i32, String>>,
}

impl Coroutine<String> for ReturnDeferred {
    type Awaited = ();
    type Output = i32;

    fn resume(
        &mut self,
        _input: Resumption<(), String>,
    ) -> Result<Progress<(), i32, String>, String> {
        match self.inner.take() {
            Some(d) => Ok(Progress::Completed(Outcome::Deferred(d))),
            None => Err("spawned twice".to_string()),
        }
    }
}

#[test]
fn test_returned_deferred_is_adopted() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let inner = Deferred::new(&queue);

    let result = spawn(
        &queue,
        ReturnDeferred {
            inner: Some(inner.clone()),
        },
    );
    scheduler.run_until_done();
    assert_eq!(result.state(), DeferredState::Pending);

    inner.settle_fulfilled(5);
    scheduler.run_until_done();
    assert_eq!(result.settlement(), Some(Settlement::Fulfilled(5)));
}
