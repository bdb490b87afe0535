//! Contract tests for the suspension component.
