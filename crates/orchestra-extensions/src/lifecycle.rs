//! Extension lifecycle facade and configure flow
//!
//! Configuration lives in two places: the canonical
//! `extensions.active.{name}.config` written on activation, and the
//! `extension_{name}` override bucket. Reads prefer the override bucket;
//! saves write both in a single batch.

use crate::events::{self, ConfigEvent, FormEvent};
use crate::keys;
use crate::presenter::{FormBuilder, FormDescriptor};
use crate::registry::ExtensionRegistry;
use orchestra_core::types::config_from_value;
use orchestra_core::{ConfigMap, Dispatcher, Error, Extension, Memory, MemoryExt, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Effective configuration of a started extension plus its form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub name: String,
    pub display_name: String,
    pub config: ConfigMap,
    pub form: FormDescriptor,
}

/// Entry point for every extension lifecycle operation
pub struct ExtensionLifecycle {
    registry: Arc<ExtensionRegistry>,
    memory: Arc<dyn Memory>,
    events: Arc<Dispatcher>,
    presenter: Box<dyn FormBuilder>,
}

impl ExtensionLifecycle {
    pub fn new(registry: Arc<ExtensionRegistry>, presenter: Box<dyn FormBuilder>) -> Self {
        Self {
            memory: Arc::clone(registry.memory()),
            events: Arc::clone(registry.events()),
            registry,
            presenter,
        }
    }

    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    pub fn detect(&self) -> Result<Vec<Extension>> {
        self.registry.detect_all()
    }

    pub fn activate(&self, name: &str) -> Result<Extension> {
        self.registry.activate(name)
    }

    pub fn deactivate(&self, name: &str) -> Result<()> {
        self.registry.deactivate(name)
    }

    pub fn publish(&self, name: &str) -> Result<usize> {
        self.registry.publish(name)
    }

    /// Effective configuration and form for a started extension.
    ///
    /// `orchestra.form: extension.{name}` listeners may amend the form
    /// before it is returned.
    pub fn get_configuration(&self, name: &str) -> Result<Configuration> {
        if !self.registry.is_started(name) {
            return Err(Error::extension_not_started(name));
        }

        let stored = self
            .memory
            .get_or(&keys::active_config(name), Value::Object(ConfigMap::new()));
        let config = config_from_value(self.memory.get_or(&keys::config_override(name), stored));
        let form = self.presenter.build_form(&config, name);

        let mut event = FormEvent {
            name: name.to_string(),
            config,
            form,
        };
        self.events.fire(&events::form(name), &mut event)?;

        let display_name = self
            .memory
            .get(&keys::available_name(name))
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| name.to_string());

        Ok(Configuration {
            name: name.to_string(),
            display_name,
            config: event.config,
            form: event.form,
        })
    }

    /// Merge `input` over the stored configuration and persist it.
    ///
    /// `orchestra.saving` listeners see the merged configuration before it is
    /// written and may rewrite it; an error from any of them aborts the save.
    /// Returns the configuration as persisted.
    pub fn save_configuration(&self, name: &str, input: ConfigMap) -> Result<ConfigMap> {
        if !self.registry.is_started(name) {
            return Err(Error::extension_not_started(name));
        }

        let mut config = self
            .memory
            .get(&keys::active_config(name))
            .map(config_from_value)
            .unwrap_or_default();
        config.extend(input);

        let mut event = ConfigEvent {
            name: name.to_string(),
            config,
        };
        self.events.fire(&events::saving(name), &mut event)?;

        self.registry.with_lock(name, || {
            // A concurrent deactivate must not be undone by this write
            if !self.registry.is_started(name) {
                return Err(Error::extension_not_started(name));
            }
            debug!("Persisting configuration for {}", name);
            self.memory.put_many(vec![
                (
                    keys::active_config(name),
                    Value::Object(event.config.clone()),
                ),
                (
                    keys::config_override(name),
                    Value::Object(event.config.clone()),
                ),
            ])
        })?;

        info!("Saved configuration for {}", name);
        let saved = event.config.clone();
        self.events.fire(&events::saved(name), &mut event)?;
        Ok(saved)
    }
}

impl std::fmt::Debug for ExtensionLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionLifecycle")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
