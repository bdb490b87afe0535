//! The adoption boundary.
//!
//! Anywhere a value may stand for "an eventual result" rather than a plain
//! payload (a chaining callback's return, a `resolve` argument, an await
//! operand, an async body's return value), it is expressed as an [`Outcome`].
//! This replaces runtime shape inspection of foreign objects with one
//! explicit sum type, handled once at the boundary.

use crate::deferred::Deferred;
use std::fmt;

/// A foreign awaitable: any outside source of an eventual value that can
/// accept a one-shot pair of completion callbacks.
///
/// This is the only capability a non-[`Deferred`] source must provide to be
/// adopted. Exactly one of the two callbacks will eventually be invoked;
/// the adopter's settle-once guarantee makes a misbehaving source that
/// calls both (or one twice) harmless.
pub trait Awaitable<T, E> {
    /// Registers the callbacks that receive the eventual result.
    fn register(
        self: Box<Self>,
        on_fulfilled: Box<dyn FnOnce(T)>,
        on_rejected: Box<dyn FnOnce(E)>,
    );
}

/// A value at the adoption boundary.
///
/// - `Value` is a plain payload: adopting it fulfills immediately.
/// - `Deferred` is one of this implementation's own values: the adopter
///   takes on its eventual settlement, one indirection level per adoption
///   step, so arbitrarily nested deferreds unwind naturally.
/// - `Foreign` is an outside awaitable adopted through [`Awaitable`].
pub enum Outcome<T, E> {
    /// A plain payload.
    Value(T),
    /// One of our own deferred values; its settlement is adopted.
    Deferred(Deferred<T, E>),
    /// A foreign awaitable; its eventual result is adopted.
    Foreign(Box<dyn Awaitable<T, E>>),
}

impl<T, E> From<Deferred<T, E>> for Outcome<T, E> {
    fn from(deferred: Deferred<T, E>) -> Self {
        Outcome::Deferred(deferred)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Outcome::Deferred(d) => f.debug_tuple("Deferred").field(d).finish(),
            Outcome::Foreign(_) => write!(f, "Foreign(...)"),
        }
    }
}
