// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion callbacks for operations that have none
//!
//! A caller records a token on the initiating presenter with [`CompletionBridge::begin`].
//! The host binding then reports lifecycle notifications through
//! [`TransitionObserver`]:
//!
//! 1. `operation_resolved` - if the resolution matches the pending token, the
//!    callback moves to the destination presenter
//! 2. `presenter_settled` - the destination's callback is cleared and invoked
//!
//! Notifications that match nothing pass through untouched.

mod token;

pub use token::{Discriminator, OperationKind, TokenState};

use crate::clock::{Clock, SystemClock};
use crate::config::BridgeConfig;
use crate::host::{Completion, Interception, TransitionObserver};
use crate::id::PresenterId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use token::{PendingToken, SettlingToken};

#[derive(Default)]
struct BridgeState {
    pending: HashMap<(PresenterId, OperationKind), PendingToken>,
    settling: HashMap<PresenterId, SettlingToken>,
    fired: u64,
    expired: u64,
}

/// Side-table of completion tokens keyed by presenter
///
/// Cloning yields another handle to the same table.
#[derive(Clone)]
pub struct CompletionBridge<C: Clock = SystemClock> {
    state: Arc<Mutex<BridgeState>>,
    clock: C,
    config: BridgeConfig,
}

impl CompletionBridge<SystemClock> {
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for CompletionBridge<SystemClock> {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl<C: Clock> CompletionBridge<C> {
    pub fn with_clock(config: BridgeConfig, clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(BridgeState::default())),
            clock,
            config,
        }
    }

    /// Record `completion` for the next operation from `initiator` matching
    /// `discriminator`
    ///
    /// A token already pending for the same presenter and kind is replaced
    /// and its callback dropped without running.
    pub fn begin(
        &self,
        initiator: &PresenterId,
        discriminator: Discriminator,
        completion: impl FnOnce() + Send + 'static,
    ) {
        let kind = discriminator.kind();
        tracing::debug!(presenter = %initiator, %discriminator, "completion pending");
        let replaced = self.lock().pending.insert(
            (initiator.clone(), kind),
            PendingToken {
                discriminator,
                completion: Box::new(completion),
                created_at: self.clock.now(),
            },
        );
        if let Some(old) = replaced {
            tracing::warn!(
                presenter = %initiator,
                discriminator = %old.discriminator,
                "replaced unresolved completion; its callback will not run"
            );
        }
    }

    /// Drop the pending token for (`initiator`, `kind`) without running it
    pub fn abandon(&self, initiator: &PresenterId, kind: OperationKind) -> bool {
        self.reclaim(initiator, kind).is_some()
    }

    /// Remove the pending token for (`initiator`, `kind`), handing back its
    /// callback
    pub fn reclaim(&self, initiator: &PresenterId, kind: OperationKind) -> Option<Completion> {
        let token = self.lock().pending.remove(&(initiator.clone(), kind))?;
        tracing::debug!(
            presenter = %initiator,
            discriminator = %token.discriminator,
            "pending completion withdrawn"
        );
        Some(token.completion)
    }

    pub fn token_state(&self, presenter: &PresenterId, kind: OperationKind) -> TokenState {
        let state = self.lock();
        if state.pending.contains_key(&(presenter.clone(), kind)) {
            TokenState::Pending
        } else if state
            .settling
            .get(presenter)
            .is_some_and(|token| token.kind == kind)
        {
            TokenState::Transferred
        } else {
            TokenState::Absent
        }
    }

    /// Tokens pending or transferred
    pub fn outstanding(&self) -> usize {
        let state = self.lock();
        state.pending.len() + state.settling.len()
    }

    /// Callbacks invoked so far
    pub fn fired(&self) -> u64 {
        self.lock().fired
    }

    /// Tokens dropped by [`expire_stale`](Self::expire_stale) so far
    pub fn expired(&self) -> u64 {
        self.lock().expired
    }

    /// Drop tokens older than the configured timeout without running them
    ///
    /// Does nothing when no timeout is configured.
    pub fn expire_stale(&self) -> usize {
        let Some(timeout) = self.config.pending_timeout else {
            return 0;
        };

        let mut dropped: Vec<Completion> = Vec::new();
        {
            let mut state = self.lock();
            let clock = &self.clock;
            let stale_pending: Vec<_> = state
                .pending
                .iter()
                .filter(|(_, token)| clock.elapsed_since(token.created_at) >= timeout)
                .map(|(key, _)| key.clone())
                .collect();
            for key in stale_pending {
                if let Some(token) = state.pending.remove(&key) {
                    tracing::warn!(
                        presenter = %key.0,
                        discriminator = %token.discriminator,
                        "pending completion expired before its operation resolved"
                    );
                    dropped.push(token.completion);
                }
            }

            let stale_settling: Vec<_> = state
                .settling
                .iter()
                .filter(|(_, token)| clock.elapsed_since(token.created_at) >= timeout)
                .map(|(presenter, _)| presenter.clone())
                .collect();
            for presenter in stale_settling {
                if let Some(token) = state.settling.remove(&presenter) {
                    tracing::warn!(
                        presenter = %presenter,
                        source = %token.source,
                        "completion expired before its presenter settled"
                    );
                    dropped.push(token.completion);
                }
            }
            state.expired += dropped.len() as u64;
        }

        // Dropped outside the lock: a callback may own a ticket whose drop
        // re-enters the gate.
        let count = dropped.len();
        drop(dropped);
        count
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock> TransitionObserver for CompletionBridge<C> {
    fn operation_resolved(
        &self,
        source: &PresenterId,
        resolution: &Discriminator,
        destination: &PresenterId,
    ) -> Interception {
        let key = (source.clone(), resolution.kind());
        let replaced = {
            let mut state = self.lock();
            let matched = state
                .pending
                .get(&key)
                .is_some_and(|token| token.discriminator.matches(resolution));
            if !matched {
                tracing::trace!(presenter = %source, %resolution, "resolution passes through");
                return Interception::Passthrough;
            }
            let Some(token) = state.pending.remove(&key) else {
                return Interception::Passthrough;
            };
            state.settling.insert(
                destination.clone(),
                SettlingToken {
                    source: source.clone(),
                    kind: key.1,
                    completion: token.completion,
                    created_at: self.clock.now(),
                },
            )
        };

        tracing::debug!(
            presenter = %source,
            destination = %destination,
            %resolution,
            "completion transferred"
        );
        if let Some(old) = replaced {
            tracing::warn!(
                destination = %destination,
                previous_source = %old.source,
                "destination already awaited a completion; replacing it"
            );
        }
        Interception::Handled
    }

    fn presenter_settled(&self, presenter: &PresenterId) -> Interception {
        let token = {
            let mut state = self.lock();
            let token = state.settling.remove(presenter);
            if token.is_some() {
                state.fired += 1;
            }
            token
        };

        match token {
            Some(token) => {
                tracing::debug!(presenter = %presenter, source = %token.source, "completion fired");
                (token.completion)();
                Interception::Handled
            }
            None => Interception::Passthrough,
        }
    }

    fn presenter_hidden(&self, presenter: &PresenterId) {
        tracing::trace!(presenter = %presenter, "presenter hidden");
    }
}

impl<C: Clock> std::fmt::Debug for CompletionBridge<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CompletionBridge")
            .field("pending", &state.pending.len())
            .field("settling", &state.settling.len())
            .field("fired", &state.fired)
            .finish()
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
