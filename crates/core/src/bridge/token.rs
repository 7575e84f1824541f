// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation discriminators and completion tokens

use crate::host::Completion;
use crate::id::PresenterId;
use std::time::Instant;

/// Family of operation a token belongs to
///
/// A presenter holds at most one pending token per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Segue,
    Navigation,
}

/// Identifies which operation a notification belongs to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Discriminator {
    /// A declarative transition, by its identifier
    Segue(String),
    /// Whatever push/pop-style transition comes next on a stack
    NextNavigation,
}

impl Discriminator {
    pub fn segue(identifier: impl Into<String>) -> Self {
        Self::Segue(identifier.into())
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Segue(_) => OperationKind::Segue,
            Self::NextNavigation => OperationKind::Navigation,
        }
    }

    /// Does a resolution reported by the host belong to this pending operation?
    pub fn matches(&self, resolution: &Discriminator) -> bool {
        match (self, resolution) {
            (Self::Segue(expected), Self::Segue(actual)) => expected == actual,
            (Self::NextNavigation, Self::NextNavigation) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Discriminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segue(identifier) => write!(f, "segue:{}", identifier),
            Self::NextNavigation => write!(f, "navigation:next"),
        }
    }
}

/// Where a presenter's token is in its lifecycle
///
/// `Absent -> Pending -> Transferred -> Absent` (fired).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
    Absent,
    /// Recorded on the initiating presenter, waiting for resolution
    Pending,
    /// Moved to the destination presenter, waiting for it to settle
    Transferred,
}

/// Token on the initiating presenter
pub(crate) struct PendingToken {
    pub discriminator: Discriminator,
    pub completion: Completion,
    pub created_at: Instant,
}

/// Token on the destination presenter
pub(crate) struct SettlingToken {
    pub source: PresenterId,
    pub kind: OperationKind,
    pub completion: Completion,
    pub created_at: Instant,
}
