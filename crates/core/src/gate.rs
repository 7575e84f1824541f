// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO mutual exclusion over transitions
//!
//! One queue backs two APIs:
//! - **serialize / complete_active** - queue a task, run it when it reaches the head
//! - **try_acquire / release** - fail fast if anything is queued
//!
//! `try_acquire` queues a synthetic task that parks on a shared
//! [`WaitableCondition`]; `release` broadcasts it and the continuation calls
//! `complete_active`. Both modes therefore share one arrival order.

use crate::config::GateConfig;
use crate::condition::WaitableCondition;
use crate::dispatch::{Dispatcher, Job};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// How a task entered the queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOrigin {
    /// Queued through `serialize`
    Serialized,
    /// Synthetic task standing in for a `try_acquire` holder
    Acquired,
}

struct QueuedTask {
    seq: u64,
    origin: TaskOrigin,
    /// Taken when the task becomes active
    job: Option<Job>,
}

#[derive(Default)]
struct GateState {
    queue: VecDeque<QueuedTask>,
    next_seq: u64,
    started: u64,
    completed: u64,
    refused: u64,
}

impl GateState {
    fn push(&mut self, origin: TaskOrigin, job: Job) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push_back(QueuedTask {
            seq,
            origin,
            job: Some(job),
        });
        seq
    }

    /// Activate the head, handing back its job if it has not run yet
    fn activate_head(&mut self) -> Option<(u64, TaskOrigin, Job)> {
        let head = self.queue.front_mut()?;
        let job = head.job.take()?;
        let activated = (head.seq, head.origin, job);
        self.started += 1;
        Some(activated)
    }

    fn pending(&self) -> usize {
        self.queue.len().saturating_sub(1)
    }
}

struct GateInner {
    name: String,
    state: Mutex<GateState>,
    condition: WaitableCondition,
    dispatcher: Arc<dyn Dispatcher>,
}

/// Point-in-time view of a gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateStats {
    pub name: String,
    /// Sequence number of the active task, if any
    pub active: Option<u64>,
    /// Tasks waiting behind the active one
    pub pending: usize,
    pub started: u64,
    pub completed: u64,
    /// `try_acquire` calls that returned false
    pub refused: u64,
}

/// Handle to a transition gate
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct TransitionGate {
    inner: Arc<GateInner>,
}

impl TransitionGate {
    pub fn new(name: impl Into<String>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            inner: Arc::new(GateInner {
                name: name.into(),
                state: Mutex::new(GateState::default()),
                condition: WaitableCondition::new(Arc::clone(&dispatcher)),
                dispatcher,
            }),
        }
    }

    pub fn from_config(config: &GateConfig, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self::new(config.name.clone(), dispatcher)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// True when no transition is active or queued
    pub fn is_idle(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Active plus pending tasks
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }

    pub fn stats(&self) -> GateStats {
        let state = self.lock();
        GateStats {
            name: self.inner.name.clone(),
            active: state.queue.front().map(|t| t.seq),
            pending: state.pending(),
            started: state.started,
            completed: state.completed,
            refused: state.refused,
        }
    }

    /// Queue `task`; run it inline if the gate was idle
    ///
    /// Otherwise it runs on a later turn, after every earlier task has been
    /// completed with [`complete_active`](Self::complete_active).
    pub fn serialize(&self, task: impl FnOnce() + Send + 'static) {
        let ready = {
            let mut state = self.lock();
            let seq = state.push(TaskOrigin::Serialized, Box::new(task));
            if state.queue.len() == 1 {
                state.activate_head()
            } else {
                tracing::debug!(
                    gate = %self.inner.name,
                    seq,
                    pending = state.pending(),
                    "transition queued"
                );
                None
            }
        };

        if let Some((seq, origin, job)) = ready {
            tracing::debug!(gate = %self.inner.name, seq, ?origin, "transition started inline");
            job();
        }
    }

    /// Like [`serialize`](Self::serialize), handing the task a ticket that
    /// completes the transition when finished or dropped
    pub fn serialize_with_ticket(&self, task: impl FnOnce(TransitionTicket) + Send + 'static) {
        let weak = Arc::downgrade(&self.inner);
        self.serialize(move || {
            if let Some(gate) = Self::upgrade(&weak) {
                task(TransitionTicket { gate: Some(gate) });
            }
        });
    }

    /// Retire the active task and schedule the next one
    ///
    /// The next task never runs inside this call; it is dispatched to the
    /// next turn of the main context.
    pub fn complete_active(&self) {
        let next = {
            let mut state = self.lock();
            let Some(done) = state.queue.pop_front() else {
                tracing::warn!(gate = %self.inner.name, "complete_active with no active transition");
                return;
            };
            state.completed += 1;
            tracing::debug!(
                gate = %self.inner.name,
                seq = done.seq,
                remaining = state.queue.len(),
                "transition completed"
            );
            state.activate_head()
        };

        if let Some((seq, origin, job)) = next {
            let name = self.inner.name.clone();
            self.inner.dispatcher.dispatch(Box::new(move || {
                tracing::debug!(gate = %name, seq, ?origin, "transition started");
                job();
            }));
        }
    }

    /// Take the gate if nothing is active or queued
    ///
    /// Returns false without side effects on the queue when busy. Every
    /// `true` must be matched by exactly one [`release`](Self::release).
    pub fn try_acquire(&self) -> bool {
        let ready = {
            let mut state = self.lock();
            if !state.queue.is_empty() {
                state.refused += 1;
                tracing::debug!(
                    gate = %self.inner.name,
                    queued = state.queue.len(),
                    "try_acquire refused"
                );
                return false;
            }
            let weak = Arc::downgrade(&self.inner);
            state.push(
                TaskOrigin::Acquired,
                Box::new(move || {
                    if let Some(gate) = Self::upgrade(&weak) {
                        gate.park_until_release();
                    }
                }),
            );
            state.activate_head()
        };

        if let Some((seq, _, job)) = ready {
            tracing::debug!(gate = %self.inner.name, seq, "gate acquired");
            job();
        }
        true
    }

    /// End a transition started with a successful `try_acquire`
    pub fn release(&self) {
        tracing::debug!(gate = %self.inner.name, "gate released");
        self.inner.condition.broadcast();
    }

    fn park_until_release(&self) {
        let condition = &self.inner.condition;
        condition.reset();
        let weak = Arc::downgrade(&self.inner);
        condition.wait(move || {
            if let Some(gate) = Self::upgrade(&weak) {
                gate.complete_active();
            }
        });
    }

    fn upgrade(weak: &Weak<GateInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for TransitionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionGate")
            .field("name", &self.inner.name)
            .field("len", &self.len())
            .finish()
    }
}

/// Completes the active transition exactly once
///
/// Call [`finish`](Self::finish) when the transition has settled. Dropping an
/// unfinished ticket completes it as well, so an early return cannot stall
/// the queue.
pub struct TransitionTicket {
    gate: Option<TransitionGate>,
}

impl TransitionTicket {
    pub fn finish(mut self) {
        if let Some(gate) = self.gate.take() {
            gate.complete_active();
        }
    }

    pub fn gate_name(&self) -> Option<&str> {
        self.gate.as_ref().map(|g| g.name())
    }
}

impl Drop for TransitionTicket {
    fn drop(&mut self) {
        if let Some(gate) = self.gate.take() {
            tracing::debug!(gate = %gate.name(), "ticket dropped unfinished, completing");
            gate.complete_active();
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
