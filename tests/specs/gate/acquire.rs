//! Fail-fast acquisition shares the queue with serialized tasks.

use crate::prelude::*;
use std::sync::Arc;

fn gate() -> (TransitionGate, EventLoop) {
    let events = EventLoop::new();
    (TransitionGate::new("specs", Arc::new(events.clone())), events)
}

#[test]
fn second_try_acquire_is_refused() {
    let (gate, _events) = gate();
    assert!(gate.try_acquire());
    assert!(!gate.try_acquire());
}

#[test]
fn release_lets_the_gate_be_acquired_again() {
    let (gate, events) = gate();
    assert!(gate.try_acquire());
    gate.release();
    events.run_until_idle();

    assert!(gate.is_idle());
    assert!(gate.try_acquire());
}

#[test]
fn serialized_task_waits_for_release() {
    let (gate, events) = gate();
    let journal = Journal::new();

    assert!(gate.try_acquire());
    gate.serialize(journal.note("queued"));
    events.run_until_idle();
    assert!(journal.entries().is_empty());

    gate.release();
    events.run_until_idle();
    journal.assert_entries(&["queued"]);
}

#[test]
fn try_acquire_refused_while_serialized_task_runs() {
    let (gate, events) = gate();
    gate.serialize(|| {});
    assert!(!gate.try_acquire());

    gate.complete_active();
    events.run_until_idle();
    assert!(gate.try_acquire());
    assert_eq!(gate.stats().refused, 1);
}
