//! Completions follow the token from initiator to destination.

use crate::prelude::*;
use tlock_core::{
    BridgeConfig, CompletionBridge, Discriminator, Interception, OperationKind, TokenState,
    TransitionObserver,
};

#[test]
fn mismatched_resolution_leaves_token_pending() {
    let bridge = CompletionBridge::new(BridgeConfig::default());
    let journal = Journal::new();
    let (source, destination) = (id("list"), id("detail"));

    bridge.begin(&source, Discriminator::segue("X"), journal.note("fired"));

    let outcome = bridge.operation_resolved(&source, &Discriminator::segue("Y"), &destination);
    assert_eq!(outcome, Interception::Passthrough);
    assert_eq!(bridge.token_state(&source, OperationKind::Segue), TokenState::Pending);
    bridge.presenter_settled(&destination);
    assert!(journal.entries().is_empty());

    let outcome = bridge.operation_resolved(&source, &Discriminator::segue("X"), &destination);
    assert_eq!(outcome, Interception::Handled);
    assert_eq!(
        bridge.token_state(&destination, OperationKind::Segue),
        TokenState::Transferred
    );
    assert!(journal.entries().is_empty());

    bridge.presenter_settled(&destination);
    journal.assert_entries(&["fired"]);
    assert_eq!(bridge.outstanding(), 0);
}

#[test]
fn completion_fires_once_after_destination_settles() {
    let host = app_host();
    let events = EventLoop::new();
    let bridge = CompletionBridge::new(BridgeConfig::default());
    host.attach_observer(bridge.clone());
    let navigator = Navigator::new(
        host.clone(),
        bridge.clone(),
        std::sync::Arc::new(events.clone()),
    );
    let journal = Journal::new();

    navigator
        .perform_segue(&id("list"), "detail", journal.note("detail visible"))
        .unwrap();
    assert!(journal.entries().is_empty());

    host.settle_all();
    journal.assert_entries(&["detail visible"]);

    // Settling the same presenter again finds no token
    assert_eq!(
        bridge.presenter_settled(&id("detail")),
        Interception::Passthrough
    );
    assert_eq!(bridge.fired(), 1);
}

#[test]
fn unresolved_token_is_dropped_silently_without_timeout() {
    let bridge = CompletionBridge::new(BridgeConfig::default());
    let journal = Journal::new();
    bridge.begin(&id("list"), Discriminator::segue("X"), journal.note("fired"));

    assert_eq!(bridge.expire_stale(), 0);
    assert_eq!(bridge.outstanding(), 1);
    assert!(journal.entries().is_empty());
}
