//! Queued acquisition runs tasks one at a time in arrival order.

use crate::prelude::*;
use std::sync::Arc;

fn gate() -> (TransitionGate, EventLoop) {
    let events = EventLoop::new();
    (TransitionGate::new("specs", Arc::new(events.clone())), events)
}

#[test]
fn serialized_tasks_run_one_per_completion() {
    let (gate, events) = gate();
    let journal = Journal::new();

    gate.serialize(journal.note("A"));
    gate.serialize(journal.note("B"));
    gate.serialize(journal.note("C"));
    events.run_until_idle();
    journal.assert_entries(&["A"]);

    gate.complete_active();
    // The next task is dispatched, never run inside complete_active
    journal.assert_entries(&["A"]);
    events.run_until_idle();
    journal.assert_entries(&["A", "B"]);

    gate.complete_active();
    events.run_until_idle();
    journal.assert_entries(&["A", "B", "C"]);

    gate.complete_active();
    events.run_until_idle();
    journal.assert_entries(&["A", "B", "C"]);
    assert!(gate.is_empty());
}

#[test]
fn completing_from_inside_a_task_chains_the_queue() {
    let (gate, events) = gate();
    let journal = Journal::new();

    for label in ["first", "second", "third"] {
        let g = gate.clone();
        let j = journal.clone();
        gate.serialize(move || {
            j.push(label);
            g.complete_active();
        });
    }
    events.run_until_idle();

    journal.assert_entries(&["first", "second", "third"]);
    assert!(gate.is_idle());
    let stats = gate.stats();
    assert_eq!((stats.started, stats.completed), (3, 3));
}

#[test]
fn tickets_release_on_finish_or_drop() {
    let (gate, events) = gate();
    let journal = Journal::new();

    let j = journal.clone();
    gate.serialize_with_ticket(move |ticket| {
        j.push("finished");
        ticket.finish();
    });
    let j = journal.clone();
    gate.serialize_with_ticket(move |_ticket| j.push("dropped"));
    gate.serialize(journal.note("last"));
    events.run_until_idle();

    journal.assert_entries(&["finished", "dropped", "last"]);
    assert_eq!(gate.len(), 1);
}
