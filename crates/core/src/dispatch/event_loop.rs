// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manually driven event loop

use super::{Dispatcher, Job};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Upper bound on turns per `run_until_idle` call
const MAX_TURNS: usize = 10_000;

/// A run loop the embedder turns by hand
///
/// A turn runs exactly the jobs that were queued when it began; jobs
/// dispatched while the turn runs wait for the next one.
#[derive(Clone, Default)]
pub struct EventLoop {
    queue: Arc<Mutex<VecDeque<Job>>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting for a turn
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Run one turn, returning how many jobs ran
    pub fn turn(&self) -> usize {
        let jobs: Vec<Job> = {
            let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.drain(..).collect()
        };
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }

    /// Turn until no jobs remain, returning the total number run
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        for _ in 0..MAX_TURNS {
            let ran = self.turn();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
        tracing::warn!(
            turns = MAX_TURNS,
            pending = self.pending(),
            "event loop still busy after turn limit"
        );
        total
    }
}

impl Dispatcher for EventLoop {
    fn dispatch(&self, job: Job) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(job);
    }
}

#[cfg(test)]
#[path = "event_loop_tests.rs"]
mod tests;
