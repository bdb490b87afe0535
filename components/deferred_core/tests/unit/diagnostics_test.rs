//! Unit tests for diagnostic events.

use deferred_core::{Deferred, DiagnosticEvent, Diagnostics, Outcome};
use scheduler::Scheduler;
use std::cell::RefCell;
use std::rc::Rc;

fn recording_diagnostics() -> (Rc<Diagnostics>, Rc<RefCell<Vec<DiagnosticEvent>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let diagnostics = Rc::new(Diagnostics::with_hook(move |event| {
        sink.borrow_mut().push(event)
    }));
    (diagnostics, events)
}

#[test]
fn test_double_settlement_fires_hook_without_changing_state() {
    let queue = scheduler::ReactionQueue::new();
    let (diagnostics, events) = recording_diagnostics();

    let deferred: Deferred<i32, String> = Deferred::new(&queue);
    deferred.set_diagnostics(diagnostics);
    deferred.settle_fulfilled(1);
    deferred.settle_fulfilled(2);

    assert_eq!(*events.borrow(), vec![DiagnosticEvent::DoubleSettlement]);
    assert_eq!(
        deferred.settlement(),
        Some(deferred_core::Settlement::Fulfilled(1))
    );
}

#[test]
fn test_unobserved_rejection_reports_on_drop() {
    let queue = scheduler::ReactionQueue::new();
    let (diagnostics, events) = recording_diagnostics();

    {
        let deferred: Deferred<i32, String> = Deferred::new(&queue);
        deferred.set_diagnostics(diagnostics);
        deferred.settle_rejected("nobody listened".to_string());
    }

    assert_eq!(*events.borrow(), vec![DiagnosticEvent::UnobservedRejection]);
}

#[test]
fn test_observed_rejection_does_not_report() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let (diagnostics, events) = recording_diagnostics();

    {
        let deferred: Deferred<i32, String> = Deferred::new(&queue);
        deferred.set_diagnostics(diagnostics);
        let _handled = deferred.catch(|_| Ok(Outcome::Value(0)));
        deferred.settle_rejected("handled".to_string());
        scheduler.run_until_done();
    }

    assert!(events.borrow().is_empty());
}

#[test]
fn test_silenced_policy_suppresses_unobserved_report() {
    let queue = scheduler::ReactionQueue::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let diagnostics = Rc::new(
        Diagnostics::with_hook(move |event| sink.borrow_mut().push(event)).silence_unobserved(),
    );

    {
        let deferred: Deferred<i32, String> = Deferred::new(&queue);
        deferred.set_diagnostics(diagnostics);
        deferred.settle_rejected("discarded on purpose".to_string());
    }

    assert!(events.borrow().is_empty());
}

#[test]
fn test_derived_values_inherit_diagnostics() {
    let mut scheduler = Scheduler::new();
    let queue = scheduler.reactions();
    let (diagnostics, events) = recording_diagnostics();

    {
        let source: Deferred<i32, String> = Deferred::new(&queue);
        source.set_diagnostics(diagnostics);
        // The forwarding reaction hands the rejection to the derived value,
        // which nobody observes.
        let _derived = source.chain_fulfilled(|n| Ok(Outcome::Value(n)));
        source.settle_rejected("downstream leak".to_string());
        scheduler.run_until_done();
    }

    assert_eq!(*events.borrow(), vec![DiagnosticEvent::UnobservedRejection]);
}
