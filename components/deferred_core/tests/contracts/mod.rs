//! Contract tests for the deferred_core component.
