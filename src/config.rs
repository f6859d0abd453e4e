//! Diagnostics modes and the declarative registry configuration.

use crate::error::Result;
use crate::types::EventMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable read by [`DiagnosticsMode::from_env`].
pub const MODE_ENV_VAR: &str = "STORE_LISTENERS_ENV";

/// Which runtime checks and warnings are active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsMode {
    /// No configuration checks.
    Production,
    /// Empty event maps fail the mount.
    #[default]
    Development,
    /// Development checks plus a warning before every forced re-render.
    Performance,
}

impl DiagnosticsMode {
    /// Read the mode from `STORE_LISTENERS_ENV`. Unset or unknown values
    /// select `Development`.
    pub fn from_env() -> Self {
        std::env::var(MODE_ENV_VAR)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => DiagnosticsMode::Production,
            "performance" => DiagnosticsMode::Performance,
            _ => DiagnosticsMode::Development,
        }
    }

    /// Whether resolved listeners must carry a non-empty event map.
    pub fn checks_events(self) -> bool {
        self != DiagnosticsMode::Production
    }

    /// Whether forced re-renders are reported.
    pub fn warns_forced_updates(self) -> bool {
        self == DiagnosticsMode::Performance
    }
}

/// Declarative unmount policy for a configured store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmountPolicy {
    Always,
    Never,
}

/// Default description for one store, minus the store reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    pub events: EventMap,
    pub listen_always: bool,
    pub suppress_update: bool,
    pub unmount: Option<UnmountPolicy>,
}

/// Declarative form of the default description map.
///
/// ```json
/// {
///   "stores": {
///     "user": {
///       "events": { "success": "USER_STORE_SUCCESS" },
///       "unmount": "always"
///     }
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub stores: BTreeMap<String, DescriptionConfig>,
}

impl RegistryConfig {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
