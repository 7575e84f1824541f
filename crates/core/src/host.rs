// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host framework boundary
//!
//! The GUI framework is reached through [`TransitionHost`]; its lifecycle
//! notifications come back through [`TransitionObserver`], which the host
//! binding must call at the points documented on each hook.

use crate::bridge::Discriminator;
use crate::id::PresenterId;
use std::sync::Arc;
use thiserror::Error;

/// A one-shot completion callback
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Refusals raised by the host framework
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("presenter {0} is already mid-transition")]
    TransitionInProgress(PresenterId),
    #[error("presenter not found: {0}")]
    PresenterNotFound(PresenterId),
    #[error("no segue named {identifier:?} on {presenter}")]
    UnknownSegue {
        presenter: PresenterId,
        identifier: String,
    },
    #[error("{presenter} is not on the stack of {stack}")]
    NotInStack {
        stack: PresenterId,
        presenter: PresenterId,
    },
    #[error("{0} is not presenting anything")]
    NothingPresented(PresenterId),
}

/// Observes an already-started transition
pub trait TransitionCoordinator: Send + Sync {
    /// Run `completion` once the transition has finished animating
    fn on_completion(&self, completion: Completion);
}

/// Imperative transition operations of the host framework
///
/// Every start operation fails with [`HostError::TransitionInProgress`] when
/// the presenter involved is still finishing an earlier transition.
pub trait TransitionHost: Send + Sync {
    /// Start the declarative transition named `identifier` from `source`
    fn perform_segue(&self, source: &PresenterId, identifier: &str) -> Result<(), HostError>;

    fn push(
        &self,
        stack: &PresenterId,
        presenter: &PresenterId,
        animated: bool,
    ) -> Result<(), HostError>;

    /// Pop the top presenter, returning it; `None` when only the root remains
    fn pop(&self, stack: &PresenterId, animated: bool) -> Result<Option<PresenterId>, HostError>;

    /// Pop until `target` is on top, returning the popped presenters
    fn pop_to(
        &self,
        stack: &PresenterId,
        target: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError>;

    fn pop_to_root(&self, stack: &PresenterId, animated: bool)
        -> Result<Vec<PresenterId>, HostError>;

    /// Modal presentation; the host accepts a completion natively
    fn present(
        &self,
        presenter: &PresenterId,
        presented: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError>;

    /// Dismiss whatever `presenter` is presenting
    fn dismiss(
        &self,
        presenter: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError>;

    /// Whether stack operations hand out a [`TransitionCoordinator`]
    fn supports_coordinators(&self) -> bool;

    /// Coordinator for the transition just started on `stack`, if one is running
    fn transition_coordinator(&self, stack: &PresenterId) -> Option<Arc<dyn TransitionCoordinator>>;
}

/// Whether an observer consumed a notification
///
/// The host carries on with its own behaviour either way; the value only
/// reports whether a pending completion was involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interception {
    Handled,
    Passthrough,
}

/// Lifecycle hooks the host binding calls
pub trait TransitionObserver: Send + Sync {
    /// A transition started from `source` has resolved its destination and is
    /// about to animate. Called before the destination appears.
    fn operation_resolved(
        &self,
        source: &PresenterId,
        resolution: &Discriminator,
        destination: &PresenterId,
    ) -> Interception;

    /// `presenter` has fully appeared
    fn presenter_settled(&self, presenter: &PresenterId) -> Interception;

    /// `presenter` has fully disappeared
    fn presenter_hidden(&self, presenter: &PresenterId) {
        let _ = presenter;
    }
}

impl<O: TransitionObserver + ?Sized> TransitionObserver for Arc<O> {
    fn operation_resolved(
        &self,
        source: &PresenterId,
        resolution: &Discriminator,
        destination: &PresenterId,
    ) -> Interception {
        (**self).operation_resolved(source, resolution, destination)
    }

    fn presenter_settled(&self, presenter: &PresenterId) -> Interception {
        (**self).presenter_settled(presenter)
    }

    fn presenter_hidden(&self, presenter: &PresenterId) {
        (**self).presenter_hidden(presenter)
    }
}

impl<H: TransitionHost + ?Sized> TransitionHost for Arc<H> {
    fn perform_segue(&self, source: &PresenterId, identifier: &str) -> Result<(), HostError> {
        (**self).perform_segue(source, identifier)
    }

    fn push(
        &self,
        stack: &PresenterId,
        presenter: &PresenterId,
        animated: bool,
    ) -> Result<(), HostError> {
        (**self).push(stack, presenter, animated)
    }

    fn pop(&self, stack: &PresenterId, animated: bool) -> Result<Option<PresenterId>, HostError> {
        (**self).pop(stack, animated)
    }

    fn pop_to(
        &self,
        stack: &PresenterId,
        target: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        (**self).pop_to(stack, target, animated)
    }

    fn pop_to_root(
        &self,
        stack: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        (**self).pop_to_root(stack, animated)
    }

    fn present(
        &self,
        presenter: &PresenterId,
        presented: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        (**self).present(presenter, presented, animated, completion)
    }

    fn dismiss(
        &self,
        presenter: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        (**self).dismiss(presenter, animated, completion)
    }

    fn supports_coordinators(&self) -> bool {
        (**self).supports_coordinators()
    }

    fn transition_coordinator(&self, stack: &PresenterId) -> Option<Arc<dyn TransitionCoordinator>> {
        (**self).transition_coordinator(stack)
    }
}
