//! Deferred work on a tokio-driven main context.

use crate::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tlock_core::{main_context, WaitableCondition};

#[tokio::test]
async fn gate_drains_on_the_main_context() {
    let (dispatcher, context) = main_context();
    let gate = TransitionGate::new("main", Arc::new(dispatcher));
    let journal = Journal::new();

    for label in ["one", "two", "three"] {
        let g = gate.clone();
        let j = journal.clone();
        gate.serialize(move || {
            j.push(label);
            g.complete_active();
        });
    }
    journal.assert_entries(&["one", "two", "three"]);

    assert!(gate.try_acquire());
    let g = gate.clone();
    let j = journal.clone();
    gate.serialize(move || {
        j.push("after release");
        g.complete_active();
    });
    gate.release();

    // Dropping the gate drops the last dispatcher once queued work is done
    drop(gate);
    tokio::time::timeout(Duration::from_secs(5), context.run())
        .await
        .expect("main context should finish once the gate is gone");
    journal.assert_entries(&["one", "two", "three", "after release"]);
}

#[tokio::test]
async fn condition_waiters_run_on_a_later_turn() {
    let (dispatcher, mut context) = main_context();
    let condition = WaitableCondition::new(Arc::new(dispatcher));
    let journal = Journal::new();

    condition.wait(journal.note("first"));
    condition.wait(journal.note("second"));
    condition.broadcast();
    assert!(journal.entries().is_empty());

    assert_eq!(context.run_pending(), 1);
    journal.assert_entries(&["first", "second"]);

    condition.wait(journal.note("late"));
    assert_eq!(journal.entries().len(), 2);
    context.run_pending();
    journal.assert_entries(&["first", "second", "late"]);
}
