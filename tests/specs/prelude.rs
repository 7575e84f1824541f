//! Shared fixtures for the behavioral specs.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

pub use tlock_adapters::{FakeHost, HostCall, TracedHost};
pub use tlock_core::{
    CoordinatorConfig, EventLoop, FakeClock, HostError, Navigator, PresenterId,
    TransitionGate, TransitionManager,
};

pub fn id(s: &str) -> PresenterId {
    PresenterId::from(s)
}

/// Ordered record of what ran, shared with callbacks
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Callback that appends `entry` when invoked
    pub fn note(&self, entry: &str) -> impl FnOnce() + Send + 'static {
        let journal = self.clone();
        let entry = entry.to_string();
        move || journal.push(entry)
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn assert_entries(&self, expected: &[&str]) {
        let expected: Vec<String> = expected.iter().map(|e| e.to_string()).collect();
        similar_asserts::assert_eq!(self.entries(), expected);
    }
}

/// A fake host with one navigation stack `nav` rooted at `root`, plus
/// segues `list --detail--> detail` and `detail --more--> more`
pub fn app_host() -> FakeHost {
    let host = FakeHost::new();
    host.add_stack(&id("nav"), &id("root"));
    host.add_segue(&id("list"), "detail", &id("detail"));
    host.add_segue(&id("detail"), "more", &id("more"));
    host
}

pub struct App {
    pub host: FakeHost,
    pub events: EventLoop,
    pub clock: FakeClock,
    pub manager: TransitionManager<TracedHost<FakeHost>, FakeClock>,
}

impl App {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::with_host(app_host(), config)
    }

    pub fn with_host(host: FakeHost, config: CoordinatorConfig) -> Self {
        let events = EventLoop::new();
        let clock = FakeClock::new();
        let manager = TransitionManager::new(
            config,
            TracedHost::new(host.clone()),
            Arc::new(events.clone()),
            clock.clone(),
        );
        host.attach_observer(manager.observer());
        Self {
            host,
            events,
            clock,
            manager,
        }
    }

    /// Alternate between settling animations and running deferred work
    /// until neither has anything left
    pub fn run_to_quiescence(&self) {
        loop {
            let ran = self.events.run_until_idle();
            let settled = self.host.settle_all();
            if ran == 0 && settled == 0 {
                break;
            }
        }
    }
}

/// Record a serialized operation's outcome in the journal
pub fn outcome(journal: &Journal, label: &str) -> impl FnOnce(Result<(), HostError>) + Send + 'static {
    let journal = journal.clone();
    let label = label.to_string();
    move |result| match result {
        Ok(()) => journal.push(format!("{label} done")),
        Err(e) => journal.push(format!("{label} failed: {e}")),
    }
}
