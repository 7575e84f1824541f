// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tokio-backed main context

use super::{Dispatcher, Job};
use tokio::sync::mpsc;

/// Create a connected dispatcher and main-context driver
///
/// Spawn or await [`MainContext::run`] on exactly one task; every job sent
/// through the dispatcher runs there, sequentially.
pub fn main_context() -> (ChannelDispatcher, MainContext) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelDispatcher { tx }, MainContext { rx })
}

/// Sending half: hands jobs to the main context
#[derive(Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<Job>,
}

impl ChannelDispatcher {
    /// True once the main context has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Dispatcher for ChannelDispatcher {
    fn dispatch(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::warn!("main context is gone, dropping job");
        }
    }
}

/// Receiving half: the single task that runs deferred jobs
pub struct MainContext {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl MainContext {
    /// Run jobs until every dispatcher has been dropped
    pub async fn run(mut self) {
        let mut ran: u64 = 0;
        while let Some(job) = self.rx.recv().await {
            job();
            ran += 1;
        }
        tracing::debug!(ran, "main context finished");
    }

    /// Run whatever is already queued without waiting, returning the count
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
