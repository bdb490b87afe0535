//! Unit tests for the scheduler component.
