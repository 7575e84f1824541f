//! The host refuses overlapping transitions; the gate prevents them.

use crate::prelude::*;
use tlock_core::TransitionHost;

#[test]
fn overlapping_pushes_fail_without_the_gate() {
    let host = app_host();
    host.push(&id("nav"), &id("a"), true).unwrap();

    let err = host.push(&id("nav"), &id("b"), true).unwrap_err();
    assert_eq!(err, HostError::TransitionInProgress(id("nav")));
    assert_eq!(host.stack(&id("nav")), vec![id("root"), id("a")]);
}

#[test]
fn overlapping_pushes_succeed_in_order_with_the_gate() {
    let app = App::new(CoordinatorConfig::default());
    let journal = Journal::new();

    for name in ["a", "b", "c"] {
        app.manager
            .serialize_push(id("nav"), id(name), true, outcome(&journal, name));
    }
    app.run_to_quiescence();

    journal.assert_entries(&["a done", "b done", "c done"]);
    assert_eq!(
        app.host.stack(&id("nav")),
        vec![id("root"), id("a"), id("b"), id("c")]
    );
    assert!(app.manager.gate().is_idle());
    assert_eq!(app.manager.bridge().outstanding(), 0);
}

#[test]
fn refusal_is_reported_and_releases_the_gate() {
    let app = App::new(CoordinatorConfig::default());
    let journal = Journal::new();
    app.host
        .refuse_next(HostError::TransitionInProgress(id("nav")));

    app.manager
        .serialize_push(id("nav"), id("a"), true, outcome(&journal, "a"));
    app.manager
        .serialize_push(id("nav"), id("b"), true, outcome(&journal, "b"));
    app.run_to_quiescence();

    journal.assert_entries(&[
        "a failed: presenter nav is already mid-transition",
        "b done",
    ]);
    assert_eq!(app.host.stack(&id("nav")), vec![id("root"), id("b")]);
}
