// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tlock-core: serialized view transitions
//!
//! This crate provides:
//! - A transition gate with fail-fast and queued acquisition
//! - A callback-based waitable condition
//! - A completion bridge that attaches callbacks to host lifecycle notifications
//! - Completion-accepting variants of host transition operations

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod id;

pub mod bridge;
pub mod condition;
pub mod gate;
pub mod host;
pub mod manager;
pub mod navigation;

#[cfg(test)]
mod test_support;

// Re-exports
pub use bridge::{CompletionBridge, Discriminator, OperationKind, TokenState};
pub use clock::{Clock, FakeClock, SystemClock};
pub use condition::WaitableCondition;
pub use config::{BridgeConfig, CoordinatorConfig, GateConfig};
pub use dispatch::{main_context, ChannelDispatcher, Dispatcher, EventLoop, Job, MainContext};
pub use error::ConfigError;
pub use gate::{GateStats, TaskOrigin, TransitionGate, TransitionTicket};
pub use host::{
    Completion, HostError, Interception, TransitionCoordinator, TransitionHost,
    TransitionObserver,
};
pub use id::{IdGen, PresenterId, SequentialIdGen, UuidIdGen};
pub use manager::{Outcome, TransitionManager};
pub use navigation::Navigator;
