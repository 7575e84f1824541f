// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced host and observer wrappers for consistent observability

use std::sync::Arc;
use tlock_core::{
    Completion, Discriminator, HostError, Interception, PresenterId, TransitionCoordinator,
    TransitionHost, TransitionObserver,
};

fn log_started(result: &Result<(), HostError>) {
    match result {
        Ok(()) => tracing::info!("started"),
        Err(HostError::TransitionInProgress(_)) => {
            tracing::warn!("refused: transition already running")
        }
        Err(e) => tracing::error!(error = %e, "failed to start"),
    }
}

fn log_popped(result: &Result<Vec<PresenterId>, HostError>) {
    match result {
        Ok(popped) => tracing::info!(popped = popped.len(), "started"),
        Err(e) => tracing::error!(error = %e, "failed to start"),
    }
}

/// Wrapper that adds tracing to any TransitionHost
#[derive(Clone)]
pub struct TracedHost<H> {
    inner: H,
}

impl<H> TracedHost<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: TransitionHost> TransitionHost for TracedHost<H> {
    fn perform_segue(&self, source: &PresenterId, identifier: &str) -> Result<(), HostError> {
        let span = tracing::info_span!("host.segue", %source, identifier);
        let _guard = span.enter();

        let result = self.inner.perform_segue(source, identifier);
        log_started(&result);
        result
    }

    fn push(
        &self,
        stack: &PresenterId,
        presenter: &PresenterId,
        animated: bool,
    ) -> Result<(), HostError> {
        let span = tracing::info_span!("host.push", %stack, %presenter, animated);
        let _guard = span.enter();

        let result = self.inner.push(stack, presenter, animated);
        log_started(&result);
        result
    }

    fn pop(&self, stack: &PresenterId, animated: bool) -> Result<Option<PresenterId>, HostError> {
        let span = tracing::info_span!("host.pop", %stack, animated);
        let _guard = span.enter();

        let result = self.inner.pop(stack, animated);
        match &result {
            Ok(Some(popped)) => tracing::info!(%popped, "started"),
            // Nothing to pop is not an error, the host just has no transition
            Ok(None) => tracing::debug!("nothing to pop"),
            Err(e) => tracing::error!(error = %e, "failed to start"),
        }
        result
    }

    fn pop_to(
        &self,
        stack: &PresenterId,
        target: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        let span = tracing::info_span!("host.pop_to", %stack, %target, animated);
        let _guard = span.enter();

        let result = self.inner.pop_to(stack, target, animated);
        log_popped(&result);
        result
    }

    fn pop_to_root(
        &self,
        stack: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        let span = tracing::info_span!("host.pop_to_root", %stack, animated);
        let _guard = span.enter();

        let result = self.inner.pop_to_root(stack, animated);
        log_popped(&result);
        result
    }

    fn present(
        &self,
        presenter: &PresenterId,
        presented: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        let span = tracing::info_span!("host.present", %presenter, %presented, animated);
        let _guard = span.enter();

        let result = self.inner.present(presenter, presented, animated, completion);
        log_started(&result);
        result
    }

    fn dismiss(
        &self,
        presenter: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        let span = tracing::info_span!("host.dismiss", %presenter, animated);
        let _guard = span.enter();

        let result = self.inner.dismiss(presenter, animated, completion);
        log_started(&result);
        result
    }

    fn supports_coordinators(&self) -> bool {
        self.inner.supports_coordinators()
    }

    fn transition_coordinator(&self, stack: &PresenterId) -> Option<Arc<dyn TransitionCoordinator>> {
        let coordinator = self.inner.transition_coordinator(stack);
        tracing::trace!(%stack, found = coordinator.is_some(), "coordinator lookup");
        coordinator
    }
}

/// Wrapper that adds tracing to any TransitionObserver
#[derive(Clone)]
pub struct TracedObserver<O> {
    inner: O,
}

impl<O> TracedObserver<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

impl<O: TransitionObserver> TransitionObserver for TracedObserver<O> {
    fn operation_resolved(
        &self,
        source: &PresenterId,
        resolution: &Discriminator,
        destination: &PresenterId,
    ) -> Interception {
        let outcome = self.inner.operation_resolved(source, resolution, destination);
        tracing::debug!(%source, %resolution, %destination, ?outcome, "operation resolved");
        outcome
    }

    fn presenter_settled(&self, presenter: &PresenterId) -> Interception {
        let outcome = self.inner.presenter_settled(presenter);
        tracing::debug!(%presenter, ?outcome, "presenter settled");
        outcome
    }

    fn presenter_hidden(&self, presenter: &PresenterId) {
        tracing::trace!(%presenter, "presenter hidden");
        self.inner.presenter_hidden(presenter);
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
