// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator configuration
//!
//! ```toml
//! [gate]
//! name = "main-window"
//!
//! [bridge]
//! pending_timeout = "30s"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for a [`TransitionManager`](crate::TransitionManager)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinatorConfig {
    pub gate: GateConfig,
    pub bridge: BridgeConfig,
}

impl CoordinatorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn with_gate(mut self, gate: GateConfig) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = bridge;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gate.name.trim().is_empty() {
            return Err(ConfigError::Invalid("gate.name must not be empty".into()));
        }
        if self.bridge.pending_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "bridge.pending_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Transition gate settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Name used in logs and stats
    pub name: String,
}

impl GateConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new("transitions")
    }
}

/// Completion bridge settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Drop tokens that have waited longer than this. `None` keeps them
    /// until their operation settles, however long that takes.
    #[serde(with = "humantime_serde")]
    pub pending_timeout: Option<Duration>,
}

impl BridgeConfig {
    pub fn with_pending_timeout(mut self, timeout: Duration) -> Self {
        self.pending_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
