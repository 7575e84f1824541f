// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory GUI framework for testing
//!
//! Behaves like the frameworks the core is written against: starting a
//! transition on a presenter that is still mid-transition fails, segue and
//! stack transitions report their destination before animating, and
//! animated transitions only settle when the test calls
//! [`FakeHost::settle_next`]. Unanimated transitions settle before the start
//! call returns.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tlock_core::{
    Completion, Discriminator, HostError, IdGen, PresenterId, SequentialIdGen,
    TransitionCoordinator, TransitionHost, TransitionObserver,
};

/// Recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Segue {
        source: PresenterId,
        identifier: String,
    },
    Push {
        stack: PresenterId,
        presenter: PresenterId,
        animated: bool,
    },
    Pop {
        stack: PresenterId,
        animated: bool,
    },
    PopTo {
        stack: PresenterId,
        target: PresenterId,
        animated: bool,
    },
    PopToRoot {
        stack: PresenterId,
        animated: bool,
    },
    Present {
        presenter: PresenterId,
        presented: PresenterId,
        animated: bool,
    },
    Dismiss {
        presenter: PresenterId,
        animated: bool,
    },
}

/// Coordinator handed out for animated stack transitions
#[derive(Default)]
pub struct FakeCoordinator {
    state: Mutex<CoordinatorState>,
}

#[derive(Default)]
struct CoordinatorState {
    finished: bool,
    completions: Vec<Completion>,
}

impl FakeCoordinator {
    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    fn finish(&self) {
        let completions = {
            let mut state = self.lock();
            state.finished = true;
            std::mem::take(&mut state.completions)
        };
        for completion in completions {
            completion();
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TransitionCoordinator for FakeCoordinator {
    fn on_completion(&self, completion: Completion) {
        let mut state = self.lock();
        if state.finished {
            drop(state);
            completion();
        } else {
            state.completions.push(completion);
        }
    }
}

/// A transition that has started but not settled
struct InFlight {
    /// Presenters that refuse new transitions until this one settles
    involved: Vec<PresenterId>,
    /// Stack or presenter the transition was started on
    origin: PresenterId,
    appearing: PresenterId,
    disappearing: Option<PresenterId>,
    coordinator: Option<Arc<FakeCoordinator>>,
    completion: Option<Completion>,
}

/// Work to do outside the state lock once a transition has been accepted
struct Started {
    resolution: Option<(PresenterId, Discriminator, PresenterId)>,
    settle_now: Option<InFlight>,
}

#[derive(Default)]
struct FakeState {
    segues: HashMap<(PresenterId, String), PresenterId>,
    stacks: HashMap<PresenterId, Vec<PresenterId>>,
    presented: HashMap<PresenterId, PresenterId>,
    in_flight: VecDeque<InFlight>,
    calls: Vec<HostCall>,
    refuse_next: Option<HostError>,
}

impl FakeState {
    fn ensure_idle(&self, presenters: &[&PresenterId]) -> Result<(), HostError> {
        for presenter in presenters {
            if self
                .in_flight
                .iter()
                .any(|t| t.involved.iter().any(|p| p == *presenter))
            {
                return Err(HostError::TransitionInProgress((*presenter).clone()));
            }
        }
        Ok(())
    }

    fn stack_mut(&mut self, stack: &PresenterId) -> Result<&mut Vec<PresenterId>, HostError> {
        self.stacks
            .get_mut(stack)
            .ok_or_else(|| HostError::PresenterNotFound(stack.clone()))
    }
}

type MintId = Arc<dyn Fn() -> PresenterId + Send + Sync>;

/// Fake host framework
#[derive(Clone)]
pub struct FakeHost {
    state: Arc<Mutex<FakeState>>,
    observer: Arc<Mutex<Option<Arc<dyn TransitionObserver>>>>,
    ids: MintId,
    coordinators: bool,
}

impl Default for FakeHost {
    fn default() -> Self {
        let ids = SequentialIdGen::default();
        Self {
            state: Arc::default(),
            observer: Arc::default(),
            ids: Arc::new(move || ids.next()),
            coordinators: false,
        }
    }
}

impl FakeHost {
    /// Host without transition coordinators
    ///
    /// Presenters it creates are named `presenter-1`, `presenter-2`, ...
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint presenter identities from `ids` instead
    pub fn with_ids(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Arc::new(move || ids.next());
        self
    }

    /// Create a presenter that is not yet on screen
    pub fn new_presenter(&self) -> PresenterId {
        (self.ids)()
    }

    /// Host whose animated stack transitions expose a coordinator
    pub fn with_coordinators() -> Self {
        Self {
            coordinators: true,
            ..Self::default()
        }
    }

    /// Route lifecycle notifications to `observer`
    pub fn attach_observer(&self, observer: impl TransitionObserver + 'static) {
        *self.observer.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(observer));
    }

    /// Declare that segue `identifier` on `source` shows `destination`
    pub fn add_segue(
        &self,
        source: &PresenterId,
        identifier: impl Into<String>,
        destination: &PresenterId,
    ) {
        self.lock()
            .segues
            .insert((source.clone(), identifier.into()), destination.clone());
    }

    /// Create a navigation stack with `root` on it
    pub fn add_stack(&self, stack: &PresenterId, root: &PresenterId) {
        self.lock().stacks.insert(stack.clone(), vec![root.clone()]);
    }

    /// Presenters on `stack`, root first
    pub fn stack(&self, stack: &PresenterId) -> Vec<PresenterId> {
        self.lock().stacks.get(stack).cloned().unwrap_or_default()
    }

    pub fn presented_by(&self, presenter: &PresenterId) -> Option<PresenterId> {
        self.lock().presented.get(presenter).cloned()
    }

    /// Make the next start call fail with `error`
    pub fn refuse_next(&self, error: HostError) {
        self.lock().refuse_next = Some(error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// Transitions started and not yet settled
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn is_transitioning(&self, presenter: &PresenterId) -> bool {
        self.lock().ensure_idle(&[presenter]).is_err()
    }

    /// Finish the oldest in-flight transition; false if none was running
    pub fn settle_next(&self) -> bool {
        let transition = self.lock().in_flight.pop_front();
        match transition {
            Some(transition) => {
                self.settle(transition);
                true
            }
            None => false,
        }
    }

    /// Finish transitions until none remain, including any started while
    /// settling; returns how many settled
    pub fn settle_all(&self) -> usize {
        let mut settled = 0;
        while self.settle_next() {
            settled += 1;
        }
        settled
    }

    fn settle(&self, transition: InFlight) {
        let observer = self.observer();
        if let Some(observer) = &observer {
            if let Some(hidden) = &transition.disappearing {
                observer.presenter_hidden(hidden);
            }
            observer.presenter_settled(&transition.appearing);
        }
        if let Some(coordinator) = transition.coordinator {
            coordinator.finish();
        }
        if let Some(completion) = transition.completion {
            completion();
        }
    }

    fn observer(&self) -> Option<Arc<dyn TransitionObserver>> {
        self.observer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Record the call, apply the scripted refusal, then run `accept` under
    /// the lock. Notifications and unanimated settling happen after the lock
    /// is released.
    fn start<T>(
        &self,
        call: HostCall,
        accept: impl FnOnce(&mut FakeState) -> Result<(T, Started), HostError>,
    ) -> Result<T, HostError> {
        let (value, started) = {
            let mut state = self.lock();
            state.calls.push(call);
            if let Some(error) = state.refuse_next.take() {
                return Err(error);
            }
            accept(&mut *state)?
        };

        if let Some((source, resolution, destination)) = started.resolution {
            if let Some(observer) = self.observer() {
                observer.operation_resolved(&source, &resolution, &destination);
            }
        }
        if let Some(transition) = started.settle_now {
            self.settle(transition);
        }
        Ok(value)
    }

    fn begin_transition(
        &self,
        state: &mut FakeState,
        transition: InFlight,
        animated: bool,
    ) -> Option<InFlight> {
        if animated {
            state.in_flight.push_back(transition);
            None
        } else {
            Some(transition)
        }
    }

    fn coordinator(&self, animated: bool) -> Option<Arc<FakeCoordinator>> {
        (self.coordinators && animated).then(|| Arc::new(FakeCoordinator::default()))
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TransitionHost for FakeHost {
    fn perform_segue(&self, source: &PresenterId, identifier: &str) -> Result<(), HostError> {
        let call = HostCall::Segue {
            source: source.clone(),
            identifier: identifier.to_string(),
        };
        self.start(call, |state| {
            let destination = state
                .segues
                .get(&(source.clone(), identifier.to_string()))
                .cloned()
                .ok_or_else(|| HostError::UnknownSegue {
                    presenter: source.clone(),
                    identifier: identifier.to_string(),
                })?;
            state.ensure_idle(&[source, &destination])?;
            state.presented.insert(source.clone(), destination.clone());
            let settle_now = self.begin_transition(
                state,
                InFlight {
                    involved: vec![source.clone(), destination.clone()],
                    origin: source.clone(),
                    appearing: destination.clone(),
                    disappearing: None,
                    coordinator: None,
                    completion: None,
                },
                true,
            );
            Ok((
                (),
                Started {
                    resolution: Some((
                        source.clone(),
                        Discriminator::segue(identifier),
                        destination,
                    )),
                    settle_now,
                },
            ))
        })
    }

    fn push(
        &self,
        stack: &PresenterId,
        presenter: &PresenterId,
        animated: bool,
    ) -> Result<(), HostError> {
        let call = HostCall::Push {
            stack: stack.clone(),
            presenter: presenter.clone(),
            animated,
        };
        self.start(call, |state| {
            state.ensure_idle(&[stack])?;
            let presenters = state.stack_mut(stack)?;
            let previous = presenters.last().cloned();
            presenters.push(presenter.clone());
            let transition = InFlight {
                involved: vec![stack.clone()],
                origin: stack.clone(),
                appearing: presenter.clone(),
                disappearing: previous,
                coordinator: self.coordinator(animated),
                completion: None,
            };
            let settle_now = self.begin_transition(state, transition, animated);
            Ok((
                (),
                Started {
                    resolution: Some((
                        stack.clone(),
                        Discriminator::NextNavigation,
                        presenter.clone(),
                    )),
                    settle_now,
                },
            ))
        })
    }

    fn pop(&self, stack: &PresenterId, animated: bool) -> Result<Option<PresenterId>, HostError> {
        let call = HostCall::Pop {
            stack: stack.clone(),
            animated,
        };
        self.start(call, |state| {
            state.ensure_idle(&[stack])?;
            let presenters = state.stack_mut(stack)?;
            if presenters.len() <= 1 {
                return Ok((
                    None,
                    Started {
                        resolution: None,
                        settle_now: None,
                    },
                ));
            }
            let popped = presenters.pop();
            let revealed = presenters.last().cloned();
            let started = self.stack_transition(state, stack, revealed, popped.clone(), animated);
            Ok((popped, started))
        })
    }

    fn pop_to(
        &self,
        stack: &PresenterId,
        target: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        let call = HostCall::PopTo {
            stack: stack.clone(),
            target: target.clone(),
            animated,
        };
        self.start(call, |state| {
            state.ensure_idle(&[stack])?;
            let presenters = state.stack_mut(stack)?;
            let position = presenters
                .iter()
                .position(|p| p == target)
                .ok_or_else(|| HostError::NotInStack {
                    stack: stack.clone(),
                    presenter: target.clone(),
                })?;
            let popped = presenters.split_off(position + 1);
            let started = if popped.is_empty() {
                Started {
                    resolution: None,
                    settle_now: None,
                }
            } else {
                let top = popped.last().cloned();
                self.stack_transition(state, stack, Some(target.clone()), top, animated)
            };
            Ok((popped, started))
        })
    }

    fn pop_to_root(
        &self,
        stack: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        let root = self
            .stack(stack)
            .first()
            .cloned()
            .ok_or_else(|| HostError::PresenterNotFound(stack.clone()))?;
        let call = HostCall::PopToRoot {
            stack: stack.clone(),
            animated,
        };
        self.start(call, |state| {
            state.ensure_idle(&[stack])?;
            let popped = state.stack_mut(stack)?.split_off(1);
            let started = if popped.is_empty() {
                Started {
                    resolution: None,
                    settle_now: None,
                }
            } else {
                let top = popped.last().cloned();
                self.stack_transition(state, stack, Some(root), top, animated)
            };
            Ok((popped, started))
        })
    }

    fn present(
        &self,
        presenter: &PresenterId,
        presented: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        let call = HostCall::Present {
            presenter: presenter.clone(),
            presented: presented.clone(),
            animated,
        };
        self.start(call, |state| {
            state.ensure_idle(&[presenter, presented])?;
            state.presented.insert(presenter.clone(), presented.clone());
            let settle_now = self.begin_transition(
                state,
                InFlight {
                    involved: vec![presenter.clone(), presented.clone()],
                    origin: presenter.clone(),
                    appearing: presented.clone(),
                    disappearing: None,
                    coordinator: None,
                    completion,
                },
                animated,
            );
            Ok((
                (),
                Started {
                    resolution: None,
                    settle_now,
                },
            ))
        })
    }

    fn dismiss(
        &self,
        presenter: &PresenterId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        let call = HostCall::Dismiss {
            presenter: presenter.clone(),
            animated,
        };
        self.start(call, |state| {
            state.ensure_idle(&[presenter])?;
            let presented = state
                .presented
                .remove(presenter)
                .ok_or_else(|| HostError::NothingPresented(presenter.clone()))?;
            let settle_now = self.begin_transition(
                state,
                InFlight {
                    involved: vec![presenter.clone(), presented.clone()],
                    origin: presenter.clone(),
                    appearing: presenter.clone(),
                    disappearing: Some(presented),
                    coordinator: None,
                    completion,
                },
                animated,
            );
            Ok((
                (),
                Started {
                    resolution: None,
                    settle_now,
                },
            ))
        })
    }

    fn supports_coordinators(&self) -> bool {
        self.coordinators
    }

    fn transition_coordinator(&self, stack: &PresenterId) -> Option<Arc<dyn TransitionCoordinator>> {
        let state = self.lock();
        let coordinator = state
            .in_flight
            .iter()
            .rev()
            .find(|t| &t.origin == stack)
            .and_then(|t| t.coordinator.clone())?;
        Some(coordinator)
    }
}

impl FakeHost {
    fn stack_transition(
        &self,
        state: &mut FakeState,
        stack: &PresenterId,
        revealed: Option<PresenterId>,
        hidden: Option<PresenterId>,
        animated: bool,
    ) -> Started {
        let Some(revealed) = revealed else {
            return Started {
                resolution: None,
                settle_now: None,
            };
        };
        let transition = InFlight {
            involved: vec![stack.clone()],
            origin: stack.clone(),
            appearing: revealed.clone(),
            disappearing: hidden,
            coordinator: self.coordinator(animated),
            completion: None,
        };
        let settle_now = self.begin_transition(state, transition, animated);
        Started {
            resolution: Some((stack.clone(), Discriminator::NextNavigation, revealed)),
            settle_now,
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
