// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion-accepting variants of the host's transition operations
//!
//! Stack operations use the host's transition coordinator when it has one.
//! Otherwise, and always for segues, the completion goes through the
//! [`CompletionBridge`] and fires once the destination settles.

use crate::bridge::{CompletionBridge, Discriminator, OperationKind};
use crate::clock::{Clock, SystemClock};
use crate::dispatch::Dispatcher;
use crate::host::{Completion, HostError, TransitionHost};
use crate::id::PresenterId;
use std::sync::Arc;

/// Starts host transitions and reports when they have settled
///
/// Every operation fails exactly as the host does. A refused operation's
/// completion never runs.
pub struct Navigator<H, C: Clock = SystemClock> {
    host: H,
    bridge: CompletionBridge<C>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl<H: TransitionHost, C: Clock> Navigator<H, C> {
    pub fn new(host: H, bridge: CompletionBridge<C>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            host,
            bridge,
            dispatcher,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn bridge(&self) -> &CompletionBridge<C> {
        &self.bridge
    }

    /// Perform the segue `identifier` from `source`
    ///
    /// `completion` runs after the segue's destination has fully appeared.
    /// If the host never resolves a destination, it never runs.
    pub fn perform_segue(
        &self,
        source: &PresenterId,
        identifier: &str,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<(), HostError> {
        self.bridge
            .begin(source, Discriminator::segue(identifier), completion);
        if let Err(e) = self.host.perform_segue(source, identifier) {
            self.bridge.abandon(source, OperationKind::Segue);
            tracing::warn!(presenter = %source, identifier, error = %e, "segue refused");
            return Err(e);
        }
        Ok(())
    }

    pub fn push(
        &self,
        stack: &PresenterId,
        presenter: &PresenterId,
        animated: bool,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<(), HostError> {
        self.navigate(
            "push",
            stack,
            Box::new(completion),
            |host| host.push(stack, presenter, animated),
            |_| true,
        )
    }

    /// Pop the top presenter; `completion` runs immediately (next turn) when
    /// there was nothing to pop
    pub fn pop(
        &self,
        stack: &PresenterId,
        animated: bool,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<Option<PresenterId>, HostError> {
        self.navigate(
            "pop",
            stack,
            Box::new(completion),
            |host| host.pop(stack, animated),
            Option::is_some,
        )
    }

    pub fn pop_to(
        &self,
        stack: &PresenterId,
        target: &PresenterId,
        animated: bool,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<Vec<PresenterId>, HostError> {
        self.navigate(
            "pop_to",
            stack,
            Box::new(completion),
            |host| host.pop_to(stack, target, animated),
            |popped| !popped.is_empty(),
        )
    }

    pub fn pop_to_root(
        &self,
        stack: &PresenterId,
        animated: bool,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<Vec<PresenterId>, HostError> {
        self.navigate(
            "pop_to_root",
            stack,
            Box::new(completion),
            |host| host.pop_to_root(stack, animated),
            |popped| !popped.is_empty(),
        )
    }

    /// Modal presentation; the host runs `completion` itself
    pub fn present(
        &self,
        presenter: &PresenterId,
        presented: &PresenterId,
        animated: bool,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<(), HostError> {
        self.host
            .present(presenter, presented, animated, Some(Box::new(completion)))
    }

    pub fn dismiss(
        &self,
        presenter: &PresenterId,
        animated: bool,
        completion: impl FnOnce() + Send + 'static,
    ) -> Result<(), HostError> {
        self.host
            .dismiss(presenter, animated, Some(Box::new(completion)))
    }

    fn navigate<T>(
        &self,
        operation: &'static str,
        stack: &PresenterId,
        completion: Completion,
        start: impl FnOnce(&H) -> Result<T, HostError>,
        moved: impl FnOnce(&T) -> bool,
    ) -> Result<T, HostError> {
        if self.host.supports_coordinators() {
            let outcome = match start(&self.host) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(stack = %stack, operation, error = %e, "navigation refused");
                    return Err(e);
                }
            };
            let coordinator = if moved(&outcome) {
                self.host.transition_coordinator(stack)
            } else {
                None
            };
            match coordinator {
                Some(coordinator) => {
                    tracing::debug!(stack = %stack, operation, "completion attached to coordinator");
                    coordinator.on_completion(completion);
                }
                None => {
                    tracing::debug!(stack = %stack, operation, "no transition running, completing");
                    self.dispatcher.dispatch(completion);
                }
            }
            return Ok(outcome);
        }

        self.bridge
            .begin(stack, Discriminator::NextNavigation, completion);
        let outcome = match start(&self.host) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.bridge.abandon(stack, OperationKind::Navigation);
                tracing::warn!(stack = %stack, operation, error = %e, "navigation refused");
                return Err(e);
            }
        };
        if !moved(&outcome) {
            if let Some(completion) = self.bridge.reclaim(stack, OperationKind::Navigation) {
                tracing::debug!(stack = %stack, operation, "nothing moved, completing");
                self.dispatcher.dispatch(completion);
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
