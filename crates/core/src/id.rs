// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presenter identity and id generation

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque identity of a presenter component
///
/// The host binding decides what the string means (a pointer address, a
/// scene path, a generated UUID); the core only compares and hashes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PresenterId(pub String);

impl PresenterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PresenterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PresenterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Mints presenter identities
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> PresenterId;
}

/// UUID-based generator for hosts without a natural identity
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> PresenterId {
        PresenterId(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for tests: `prefix-1`, `prefix-2`, ...
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("presenter")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> PresenterId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        PresenterId(format!("{}-{}", self.prefix, n))
    }
}
