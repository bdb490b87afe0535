//! Integration test suite for the deferred-value execution core.
//!
//! This crate provides integration tests that verify the components work
//! together correctly across component boundaries: deferred settlement
//! riding the reaction queue, timers feeding the external task queue, and
//! coroutines suspending on combinator-built values.

/// Re-export components for test convenience
pub mod components {
    pub use deferred_core;
    pub use scheduler;
    pub use suspension;
}
