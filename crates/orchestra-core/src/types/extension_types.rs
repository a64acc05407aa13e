//! Extension data model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extension configuration: string keys to arbitrary JSON values
pub type ConfigMap = Map<String, Value>;

/// Lifecycle state of one extension
///
/// Derived from two flags: whether the extension is started in this process
/// and whether it is persisted as enabled. `Active` implies started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionState {
    /// Detected, neither started nor enabled
    #[default]
    Available,
    /// Started in this process but not persisted as enabled
    Started,
    /// Started and enabled
    Active,
    /// Enabled in memory but not started in this process
    Inactive,
}

impl ExtensionState {
    pub fn from_flags(started: bool, enabled: bool) -> Self {
        match (started, enabled) {
            (true, true) => Self::Active,
            (true, false) => Self::Started,
            (false, true) => Self::Inactive,
            (false, false) => Self::Available,
        }
    }

    /// Whether the extension is started in this process
    pub fn is_started(self) -> bool {
        matches!(self, Self::Started | Self::Active)
    }

    /// Whether the extension is persisted as enabled
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Active | Self::Inactive)
    }
}

impl std::fmt::Display for ExtensionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Available => "available",
            Self::Started => "started",
            Self::Active => "active",
            Self::Inactive => "inactive",
        };
        f.write_str(label)
    }
}

/// A detected extension and its current lifecycle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    /// Hierarchical name, e.g. `acme/blog`
    pub name: String,

    /// Human readable name
    pub display_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub state: ExtensionState,

    /// Stored configuration, empty when the extension was never configured
    #[serde(default)]
    pub config: ConfigMap,
}

impl Extension {
    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    pub fn is_active(&self) -> bool {
        self.state == ExtensionState::Active
    }
}

/// Convert a JSON value into a configuration map, dropping non-object values
pub fn config_from_value(value: Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        _ => ConfigMap::new(),
    }
}
