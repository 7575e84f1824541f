// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unified entry point: one gate, one bridge, one navigator

use crate::bridge::CompletionBridge;
use crate::clock::Clock;
use crate::config::CoordinatorConfig;
use crate::dispatch::Dispatcher;
use crate::gate::{GateStats, TransitionGate, TransitionTicket};
use crate::host::{Completion, HostError, TransitionHost};
use crate::id::PresenterId;
use crate::navigation::Navigator;
use std::sync::{Arc, Mutex};

/// Receives the outcome of a serialized transition
pub type Outcome = Box<dyn FnOnce(Result<(), HostError>) + Send + 'static>;

/// Coordinates every transition in one exclusion domain
///
/// The host binding must forward lifecycle notifications to
/// [`observer`](Self::observer).
pub struct TransitionManager<H, C: Clock> {
    config: CoordinatorConfig,
    gate: TransitionGate,
    navigator: Arc<Navigator<H, C>>,
}

impl<H: TransitionHost + 'static, C: Clock> TransitionManager<H, C> {
    pub fn new(
        config: CoordinatorConfig,
        host: H,
        dispatcher: Arc<dyn Dispatcher>,
        clock: C,
    ) -> Self {
        let gate = TransitionGate::from_config(&config.gate, Arc::clone(&dispatcher));
        let bridge = CompletionBridge::with_clock(config.bridge.clone(), clock);
        let navigator = Arc::new(Navigator::new(host, bridge, dispatcher));
        tracing::info!(
            gate = %config.gate.name,
            pending_timeout = ?config.bridge.pending_timeout,
            "transition manager ready"
        );
        Self {
            config,
            gate,
            navigator,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn gate(&self) -> &TransitionGate {
        &self.gate
    }

    pub fn bridge(&self) -> &CompletionBridge<C> {
        self.navigator.bridge()
    }

    pub fn navigator(&self) -> &Navigator<H, C> {
        &self.navigator
    }

    /// Handle the host binding reports lifecycle notifications to
    pub fn observer(&self) -> CompletionBridge<C> {
        self.navigator.bridge().clone()
    }

    pub fn stats(&self) -> GateStats {
        self.gate.stats()
    }

    /// Queue a segue behind every earlier transition
    ///
    /// `done` receives `Ok` once the destination has settled, or the host's
    /// refusal. The gate is released in both cases.
    pub fn serialize_segue(
        &self,
        source: PresenterId,
        identifier: impl Into<String>,
        done: impl FnOnce(Result<(), HostError>) + Send + 'static,
    ) {
        let identifier = identifier.into();
        self.run_serialized(Box::new(done), move |navigator, on_settled| {
            navigator.perform_segue(&source, &identifier, on_settled)
        });
    }

    pub fn serialize_push(
        &self,
        stack: PresenterId,
        presenter: PresenterId,
        animated: bool,
        done: impl FnOnce(Result<(), HostError>) + Send + 'static,
    ) {
        self.run_serialized(Box::new(done), move |navigator, on_settled| {
            navigator.push(&stack, &presenter, animated, on_settled)
        });
    }

    pub fn serialize_pop(
        &self,
        stack: PresenterId,
        animated: bool,
        done: impl FnOnce(Result<(), HostError>) + Send + 'static,
    ) {
        self.run_serialized(Box::new(done), move |navigator, on_settled| {
            navigator.pop(&stack, animated, on_settled).map(|_| ())
        });
    }

    /// Queue a pop back to `target`; `done` receives `Ok` immediately (next
    /// turn) when `target` is already on top
    pub fn serialize_pop_to(
        &self,
        stack: PresenterId,
        target: PresenterId,
        animated: bool,
        done: impl FnOnce(Result<(), HostError>) + Send + 'static,
    ) {
        self.run_serialized(Box::new(done), move |navigator, on_settled| {
            navigator
                .pop_to(&stack, &target, animated, on_settled)
                .map(|_| ())
        });
    }

    pub fn serialize_pop_to_root(
        &self,
        stack: PresenterId,
        animated: bool,
        done: impl FnOnce(Result<(), HostError>) + Send + 'static,
    ) {
        self.run_serialized(Box::new(done), move |navigator, on_settled| {
            navigator
                .pop_to_root(&stack, animated, on_settled)
                .map(|_| ())
        });
    }

    /// Periodic maintenance; returns the number of expired tokens
    pub fn tick(&self) -> usize {
        self.bridge().expire_stale()
    }

    fn run_serialized<F>(&self, done: Outcome, start: F)
    where
        F: FnOnce(&Navigator<H, C>, Completion) -> Result<(), HostError> + Send + 'static,
    {
        let navigator = Arc::clone(&self.navigator);
        self.gate.serialize_with_ticket(move |ticket| {
            let slot: Arc<Mutex<Option<(TransitionTicket, Outcome)>>> =
                Arc::new(Mutex::new(Some((ticket, done))));

            let settled = Arc::clone(&slot);
            let on_settled: Completion = Box::new(move || {
                if let Some((ticket, done)) = take(&settled) {
                    done(Ok(()));
                    ticket.finish();
                }
            });

            if let Err(e) = start(&navigator, on_settled) {
                if let Some((ticket, done)) = take(&slot) {
                    done(Err(e));
                    ticket.finish();
                }
            }
        });
    }
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    slot.lock().unwrap_or_else(|e| e.into_inner()).take()
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
