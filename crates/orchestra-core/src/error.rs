//! Error types for orchestra-core

use thiserror::Error;

/// Result type alias using orchestra-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Orchestra
#[derive(Error, Debug)]
pub enum Error {
    /// Extension is not known to any source
    #[error("Extension not found: {name}")]
    ExtensionNotFound { name: String },

    /// Extension is already started in this process
    #[error("Extension already started: {name}")]
    ExtensionAlreadyStarted { name: String },

    /// Operation requires a started extension
    #[error("Extension not started: {name}")]
    ExtensionNotStarted { name: String },

    /// Extension name does not follow the vendor/package format
    #[error("Invalid extension name '{name}': {reason}")]
    InvalidExtensionName { name: String, reason: String },

    /// Memory key cannot be addressed
    #[error("Invalid memory key: '{key}'")]
    InvalidKey { key: String },

    /// An event listener failed while the event was being fired
    #[error("Listener for '{topic}' failed: {source}")]
    Listener {
        topic: String,
        #[source]
        source: crate::events::ListenerError,
    },

    /// A listener was registered for a different payload type than the one fired
    #[error("Listener for '{topic}' expects a different payload than {payload}")]
    PayloadMismatch {
        topic: String,
        payload: &'static str,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// Asset publishing failed
    #[error("Failed to publish extension {name}: {message}")]
    Publish { name: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an extension not found error
    pub fn extension_not_found(name: impl Into<String>) -> Self {
        Self::ExtensionNotFound { name: name.into() }
    }

    /// Create an extension already started error
    pub fn extension_already_started(name: impl Into<String>) -> Self {
        Self::ExtensionAlreadyStarted { name: name.into() }
    }

    /// Create an extension not started error
    pub fn extension_not_started(name: impl Into<String>) -> Self {
        Self::ExtensionNotStarted { name: name.into() }
    }

    /// Create an invalid extension name error
    pub fn invalid_extension_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExtensionName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a publish error
    pub fn publish(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the error is a lifecycle precondition failure.
    ///
    /// Unknown, already started and not started extensions all surface to
    /// the admin layer as a single "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ExtensionNotFound { .. }
                | Self::ExtensionAlreadyStarted { .. }
                | Self::ExtensionNotStarted { .. }
                | Self::InvalidExtensionName { .. }
        )
    }
}
