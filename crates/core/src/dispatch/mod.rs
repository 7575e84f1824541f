// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Main-context dispatch
//!
//! Everything the gate and condition defer ("run on the next turn") goes
//! through a [`Dispatcher`]. Two implementations are provided:
//! - **EventLoop** - manually driven, one turn at a time
//! - **ChannelDispatcher** - feeds a [`MainContext`] task on a tokio runtime

mod channel;
mod event_loop;

pub use channel::{main_context, ChannelDispatcher, MainContext};
pub use event_loop::EventLoop;

/// A deferred unit of work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Schedules jobs onto the single main execution context
///
/// Implementations must run jobs in submission order, one at a time, and
/// never inside the `dispatch` call itself.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, job: Job);
}

impl<D: Dispatcher + ?Sized> Dispatcher for std::sync::Arc<D> {
    fn dispatch(&self, job: Job) {
        (**self).dispatch(job)
    }
}
