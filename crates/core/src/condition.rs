// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resettable broadcast condition with callback waiters
//!
//! A waiter is a callback, not a blocked thread. Waiters never run inside the
//! call that registers them; they are always delivered through the
//! dispatcher, so the caller sees the same re-entrancy whether or not the
//! condition was already signaled.

use crate::dispatch::{Dispatcher, Job};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ConditionState {
    signaled: bool,
    waiters: Vec<Job>,
}

/// Two-state condition: unsignaled or signaled
///
/// Cloning yields another handle to the same condition.
#[derive(Clone)]
pub struct WaitableCondition {
    state: Arc<Mutex<ConditionState>>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl WaitableCondition {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConditionState::default())),
            dispatcher,
        }
    }

    pub fn is_signaled(&self) -> bool {
        self.lock().signaled
    }

    /// Waiters registered and not yet delivered
    pub fn waiter_count(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Return to unsignaled. Waiters already delivered stay delivered.
    pub fn reset(&self) {
        self.lock().signaled = false;
    }

    /// Signal and deliver every registered waiter once, in registration order
    pub fn broadcast(&self) {
        let waiters = {
            let mut state = self.lock();
            state.signaled = true;
            std::mem::take(&mut state.waiters)
        };
        tracing::trace!(waiters = waiters.len(), "condition broadcast");
        if waiters.is_empty() {
            return;
        }
        self.dispatcher.dispatch(Box::new(move || {
            for waiter in waiters {
                waiter();
            }
        }));
    }

    /// Run `callback` once the condition is signaled
    ///
    /// If already signaled the callback is dispatched right away; otherwise it
    /// waits for the next [`broadcast`](Self::broadcast).
    pub fn wait(&self, callback: impl FnOnce() + Send + 'static) {
        let mut state = self.lock();
        if state.signaled {
            drop(state);
            self.dispatcher.dispatch(Box::new(callback));
        } else {
            state.waiters.push(Box::new(callback));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ConditionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for WaitableCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("WaitableCondition")
            .field("signaled", &state.signaled)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
