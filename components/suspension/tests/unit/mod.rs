//! Unit tests for the suspension component.

mod driver_test;
