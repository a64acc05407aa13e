//! Builders for creating test fixtures

#![allow(dead_code)]

use super::mocks::{RecordingMemory, Timeline};
use orchestra_core::types::config_from_value;
use orchestra_core::{ConfigMap, Dispatcher, Memory};
use orchestra_extensions::{
    ExtensionLifecycle, ExtensionManifest, ExtensionPresenter, ExtensionRegistry, StaticSource,
};
use serde_json::Value;
use std::sync::Arc;

/// Builder for extension manifests
pub struct ManifestBuilder {
    manifest: ExtensionManifest,
}

impl ManifestBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            manifest: ExtensionManifest::new(name),
        }
    }

    /// The `acme/blog` extension used across scenarios
    pub fn blog() -> Self {
        Self::new("acme/blog")
            .with_display_name("Acme Blog")
            .with_version("1.0.0")
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.manifest.display_name = Some(display_name.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.manifest.version = version.to_string();
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.manifest.config = config_from_value(config);
        self
    }

    pub fn build(self) -> ExtensionManifest {
        self.manifest
    }
}

/// Convenience for building a `ConfigMap` from a `json!` literal
pub fn config(value: Value) -> ConfigMap {
    config_from_value(value)
}

/// Registry, lifecycle and their collaborators wired together
pub struct Harness {
    pub memory: Arc<RecordingMemory>,
    pub events: Arc<Dispatcher>,
    pub timeline: Timeline,
    pub lifecycle: ExtensionLifecycle,
}

impl Harness {
    pub fn new(manifests: Vec<ExtensionManifest>) -> Self {
        let timeline = Timeline::default();
        let memory = Arc::new(RecordingMemory::with_timeline(timeline.clone()));
        let events = Arc::new(Dispatcher::new());
        let registry = ExtensionRegistry::new(
            Arc::clone(&memory) as Arc<dyn Memory>,
            Arc::clone(&events),
            Box::new(StaticSource::new(manifests)),
        );
        let lifecycle = ExtensionLifecycle::new(
            Arc::new(registry),
            Box::new(ExtensionPresenter::new("admin")),
        );

        Self {
            memory,
            events,
            timeline,
            lifecycle,
        }
    }

    /// Harness knowing only `acme/blog`
    pub fn blog() -> Self {
        Self::new(vec![ManifestBuilder::blog().build()])
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        self.lifecycle.registry()
    }
}
