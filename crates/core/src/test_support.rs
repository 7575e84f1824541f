// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted host shared by unit tests

use crate::bridge::Discriminator;
use crate::host::{Completion, HostError, TransitionCoordinator, TransitionHost, TransitionObserver};
use crate::id::PresenterId;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct ScriptedCoordinator {
    completions: Mutex<Vec<Completion>>,
}

impl ScriptedCoordinator {
    pub(crate) fn finish(&self) {
        let completions = std::mem::take(&mut *self.completions.lock().unwrap());
        for completion in completions {
            completion();
        }
    }
}

impl TransitionCoordinator for ScriptedCoordinator {
    fn on_completion(&self, completion: Completion) {
        self.completions.lock().unwrap().push(completion);
    }
}

/// Host that resolves every operation immediately and leaves settling to the test
pub(crate) struct ScriptedHost {
    observer: Mutex<Option<Arc<dyn TransitionObserver>>>,
    coordinators: bool,
    refuse: Mutex<Option<HostError>>,
    pub(crate) coordinator: Mutex<Option<Arc<ScriptedCoordinator>>>,
    pub(crate) pop_result: Mutex<Option<PresenterId>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl ScriptedHost {
    pub(crate) fn new(coordinators: bool) -> Self {
        Self {
            observer: Mutex::new(None),
            coordinators,
            refuse: Mutex::new(None),
            coordinator: Mutex::new(None),
            pop_result: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn attach(&self, observer: impl TransitionObserver + 'static) {
        *self.observer.lock().unwrap() = Some(Arc::new(observer));
    }

    fn resolve(&self, source: &PresenterId, resolution: &Discriminator, destination: &PresenterId) {
        let observer = self.observer.lock().unwrap().clone();
        if let Some(observer) = observer {
            observer.operation_resolved(source, resolution, destination);
        }
    }

    pub(crate) fn refuse_next(&self, error: HostError) {
        *self.refuse.lock().unwrap() = Some(error);
    }

    fn start(&self, call: String) -> Result<(), HostError> {
        self.calls.lock().unwrap().push(call);
        match self.refuse.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn animate(&self, animated: bool) {
        if animated && self.coordinators {
            *self.coordinator.lock().unwrap() = Some(Arc::new(ScriptedCoordinator::default()));
        }
    }
}

impl TransitionHost for ScriptedHost {
    fn perform_segue(&self, source: &PresenterId, identifier: &str) -> Result<(), HostError> {
        self.start(format!("segue {source} {identifier}"))?;
        let destination = PresenterId::new(format!("{identifier}-dest"));
        self.resolve(source, &Discriminator::segue(identifier), &destination);
        Ok(())
    }

    fn push(
        &self,
        stack: &PresenterId,
        presenter: &PresenterId,
        animated: bool,
    ) -> Result<(), HostError> {
        self.start(format!("push {stack} {presenter}"))?;
        self.animate(animated);
        self.resolve(stack, &Discriminator::NextNavigation, presenter);
        Ok(())
    }

    fn pop(&self, stack: &PresenterId, animated: bool) -> Result<Option<PresenterId>, HostError> {
        self.start(format!("pop {stack}"))?;
        let popped = self.pop_result.lock().unwrap().take();
        if popped.is_some() {
            self.animate(animated);
            self.resolve(stack, &Discriminator::NextNavigation, &PresenterId::new("root"));
        }
        Ok(popped)
    }

    fn pop_to(
        &self,
        stack: &PresenterId,
        target: &PresenterId,
        animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        self.start(format!("pop_to {stack} {target}"))?;
        self.animate(animated);
        self.resolve(stack, &Discriminator::NextNavigation, target);
        Ok(vec![PresenterId::new("above-target")])
    }

    fn pop_to_root(
        &self,
        stack: &PresenterId,
        _animated: bool,
    ) -> Result<Vec<PresenterId>, HostError> {
        self.start(format!("pop_to_root {stack}"))?;
        Ok(Vec::new())
    }

    fn present(
        &self,
        presenter: &PresenterId,
        presented: &PresenterId,
        _animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        self.start(format!("present {presenter} {presented}"))?;
        if let Some(completion) = completion {
            completion();
        }
        Ok(())
    }

    fn dismiss(
        &self,
        presenter: &PresenterId,
        _animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), HostError> {
        self.start(format!("dismiss {presenter}"))?;
        if let Some(completion) = completion {
            completion();
        }
        Ok(())
    }

    fn supports_coordinators(&self) -> bool {
        self.coordinators
    }

    fn transition_coordinator(&self, _stack: &PresenterId) -> Option<Arc<dyn TransitionCoordinator>> {
        self.coordinator
            .lock()
            .unwrap()
            .clone()
            .map(|c| c as Arc<dyn TransitionCoordinator>)
    }
}

