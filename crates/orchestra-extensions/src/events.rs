//! Extension lifecycle event topics and payloads
//!
//! Topics are fired on the application's [`orchestra_core::Dispatcher`]:
//!
//! | Topic                                  | Payload          |
//! |----------------------------------------|------------------|
//! | `extension.started: {name}`            | `ExtensionEvent` |
//! | `extension.activated: {name}`          | `ExtensionEvent` |
//! | `extension.deactivated: {name}`        | `ExtensionEvent` |
//! | `extension.published: {name}`          | `ExtensionEvent` |
//! | `orchestra.form: extension.{name}`     | `FormEvent`      |
//! | `orchestra.saving: extension.{name}`   | `ConfigEvent`    |
//! | `orchestra.saved: extension.{name}`    | `ConfigEvent`    |

use crate::presenter::FormDescriptor;
use orchestra_core::{ConfigMap, ExtensionState};

pub fn started(name: &str) -> String {
    format!("extension.started: {name}")
}

pub fn activated(name: &str) -> String {
    format!("extension.activated: {name}")
}

pub fn deactivated(name: &str) -> String {
    format!("extension.deactivated: {name}")
}

pub fn published(name: &str) -> String {
    format!("extension.published: {name}")
}

pub fn form(name: &str) -> String {
    format!("orchestra.form: extension.{name}")
}

pub fn saving(name: &str) -> String {
    format!("orchestra.saving: extension.{name}")
}

pub fn saved(name: &str) -> String {
    format!("orchestra.saved: extension.{name}")
}

/// Payload for state transitions
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionEvent {
    pub name: String,
    /// State after the transition
    pub state: ExtensionState,
}

/// Payload for the configuration form; listeners may add fields
#[derive(Debug, Clone, PartialEq)]
pub struct FormEvent {
    pub name: String,
    pub config: ConfigMap,
    pub form: FormDescriptor,
}

/// Payload for configuration saves; `saving` listeners may rewrite `config`
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEvent {
    pub name: String,
    pub config: ConfigMap,
}
