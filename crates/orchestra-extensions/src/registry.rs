//! Extension registry
//!
//! Tracks which extensions are started in this process and which are
//! persisted as enabled, and performs the activate/deactivate/publish
//! transitions.
//!
//! The started set is process-local: an extension enabled in memory is not
//! started until [`ExtensionRegistry::load_active`] or
//! [`ExtensionRegistry::activate`] runs. Events are fired after the
//! per-name lock is released so listeners may call back into the registry.

use crate::events::{self, ExtensionEvent};
use crate::keys;
use crate::manifest::{validate_name, ExtensionManifest};
use crate::publisher::{NullPublisher, Publisher};
use crate::source::ExtensionSource;
use orchestra_core::types::config_from_value;
use orchestra_core::{Dispatcher, Error, Extension, ExtensionState, Memory, MemoryExt, Result};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Registry of detected extensions and their lifecycle state
pub struct ExtensionRegistry {
    memory: Arc<dyn Memory>,
    events: Arc<Dispatcher>,
    source: Box<dyn ExtensionSource>,
    publisher: Box<dyn Publisher>,
    started: RwLock<BTreeSet<String>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ExtensionRegistry {
    /// Create a registry that publishes nothing on update
    pub fn new(
        memory: Arc<dyn Memory>,
        events: Arc<Dispatcher>,
        source: Box<dyn ExtensionSource>,
    ) -> Self {
        Self {
            memory,
            events,
            source,
            publisher: Box::new(NullPublisher),
            started: RwLock::new(BTreeSet::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the asset publisher
    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn memory(&self) -> &Arc<dyn Memory> {
        &self.memory
    }

    pub fn events(&self) -> &Arc<Dispatcher> {
        &self.events
    }

    /// Re-run discovery, record every extension under
    /// `extensions.available.*` and return them sorted by name.
    pub fn detect_all(&self) -> Result<Vec<Extension>> {
        let manifests = self.detect_manifests()?;

        let entries: Vec<(String, Value)> = manifests
            .values()
            .map(|manifest| {
                (
                    keys::available(&manifest.name),
                    json!({
                        "name": manifest.display_name(),
                        "description": manifest.description,
                        "version": manifest.version,
                        "author": manifest.author,
                    }),
                )
            })
            .collect();
        if !entries.is_empty() {
            self.memory.put_many(entries)?;
        }

        let extensions: Vec<Extension> = manifests.values().map(|m| self.describe(m)).collect();
        info!("Detected {} extension(s)", extensions.len());
        Ok(extensions)
    }

    /// Whether `name` is started in this process. Never touches memory.
    pub fn is_started(&self, name: &str) -> bool {
        self.started
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Whether `name` is persisted as enabled
    pub fn is_active(&self, name: &str) -> bool {
        self.memory.has(&keys::active(name))
    }

    pub fn state(&self, name: &str) -> ExtensionState {
        ExtensionState::from_flags(self.is_started(name), self.is_active(name))
    }

    /// Look up a single detected extension
    pub fn get(&self, name: &str) -> Result<Option<Extension>> {
        let manifests = self.detect_manifests()?;
        Ok(manifests.get(name).map(|manifest| self.describe(manifest)))
    }

    /// Start and enable `name`.
    ///
    /// Persists the manifest's default configuration the first time the
    /// extension is enabled, then fires `extension.started` and
    /// `extension.activated`. A failing listener undoes the activation.
    pub fn activate(&self, name: &str) -> Result<Extension> {
        validate_name(name)?;

        let (extension, was_enabled) = self.with_lock(name, || {
            if self.is_started(name) {
                return Err(Error::extension_already_started(name));
            }
            let manifest = self.find_manifest(name)?;
            let was_enabled = self.is_active(name);

            let config_key = keys::active_config(name);
            if !self.memory.has(&config_key) {
                debug!("Persisting default configuration for {}", name);
                self.memory
                    .put(&config_key, Value::Object(manifest.config.clone()))?;
            }

            self.mark_started(name);
            Ok((self.describe(&manifest), was_enabled))
        })?;

        let mut event = ExtensionEvent {
            name: name.to_string(),
            state: extension.state,
        };
        let fired = self
            .events
            .fire(&events::started(name), &mut event)
            .and_then(|_| self.events.fire(&events::activated(name), &mut event));
        if let Err(e) = fired {
            warn!("Rolling back activation of {}: {}", name, e);
            self.with_lock(name, || {
                self.unmark_started(name);
                if !was_enabled {
                    self.memory.forget(&keys::active(name))?;
                }
                Ok(())
            })?;
            return Err(e);
        }

        info!("Activated extension {}", name);
        Ok(extension)
    }

    /// Stop and disable `name`.
    ///
    /// Fails without touching memory unless the extension is started or
    /// persisted as enabled. A failing listener restores both flags.
    pub fn deactivate(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let (was_started, enabled) = self.with_lock(name, || {
            let started = self.is_started(name);
            let enabled = self.memory.get(&keys::active(name));
            if !started && enabled.is_none() {
                return Err(Error::extension_not_found(name));
            }

            if enabled.is_some() {
                self.memory.forget(&keys::active(name))?;
            }
            self.unmark_started(name);
            Ok((started, enabled))
        })?;

        let mut event = ExtensionEvent {
            name: name.to_string(),
            state: ExtensionState::Available,
        };
        if let Err(e) = self.events.fire(&events::deactivated(name), &mut event) {
            warn!("Rolling back deactivation of {}: {}", name, e);
            self.with_lock(name, || {
                if let Some(record) = enabled {
                    self.memory.put(&keys::active(name), record)?;
                }
                if was_started {
                    self.mark_started(name);
                }
                Ok(())
            })?;
            return Err(e);
        }

        info!("Deactivated extension {}", name);
        Ok(())
    }

    /// Publish the assets of a started extension.
    ///
    /// Returns the number of files published. State is unchanged, so a call
    /// failed by a listener can simply be retried.
    pub fn publish(&self, name: &str) -> Result<usize> {
        if !self.is_started(name) {
            return Err(Error::extension_not_started(name));
        }

        let manifest = self.find_manifest(name)?;
        let published = self.publisher.publish(&manifest)?;

        let mut event = ExtensionEvent {
            name: name.to_string(),
            state: self.state(name),
        };
        self.events.fire(&events::published(name), &mut event)?;
        Ok(published)
    }

    /// Start every detected extension that is persisted as enabled.
    ///
    /// Fires `extension.started` for each one and returns their names.
    pub fn load_active(&self) -> Result<Vec<String>> {
        let manifests = self.detect_manifests()?;
        let mut loaded = Vec::new();

        for name in manifests.keys() {
            let newly_started = self.with_lock(name, || {
                if self.is_started(name) || !self.is_active(name) {
                    return Ok(false);
                }
                self.mark_started(name);
                Ok(true)
            })?;

            if newly_started {
                let mut event = ExtensionEvent {
                    name: name.clone(),
                    state: ExtensionState::Active,
                };
                if let Err(e) = self.events.fire(&events::started(name), &mut event) {
                    self.with_lock(name, || {
                        self.unmark_started(name);
                        Ok(())
                    })?;
                    return Err(e);
                }
                loaded.push(name.clone());
            }
        }

        info!("Started {} enabled extension(s)", loaded.len());
        Ok(loaded)
    }

    /// Forget everything recorded about `name`
    pub fn unregister(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        self.with_lock(name, || {
            self.unmark_started(name);
            self.memory.forget(&keys::available(name))?;
            self.memory.forget(&keys::active(name))?;
            self.memory.forget(&keys::config_override(name))
        })?;

        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        info!("Unregistered extension {}", name);
        Ok(())
    }

    /// Run `f` while holding the mutation lock for `name`
    pub(crate) fn with_lock<R>(&self, name: &str, f: impl FnOnce() -> Result<R>) -> Result<R> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(name.to_string()).or_default())
        };
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    fn mark_started(&self, name: &str) {
        self.started
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
    }

    fn unmark_started(&self, name: &str) {
        self.started
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    /// Valid manifests keyed by name; the first of any duplicates wins
    fn detect_manifests(&self) -> Result<BTreeMap<String, ExtensionManifest>> {
        let mut manifests = BTreeMap::new();
        for manifest in self.source.detect()? {
            if let Err(e) = manifest.validate() {
                warn!("Ignoring extension: {}", e);
                continue;
            }
            if manifests.contains_key(&manifest.name) {
                warn!("Ignoring duplicate extension {}", manifest.name);
                continue;
            }
            manifests.insert(manifest.name.clone(), manifest);
        }
        Ok(manifests)
    }

    fn find_manifest(&self, name: &str) -> Result<ExtensionManifest> {
        self.detect_manifests()?
            .remove(name)
            .ok_or_else(|| Error::extension_not_found(name))
    }

    fn describe(&self, manifest: &ExtensionManifest) -> Extension {
        let config = self
            .memory
            .get(&keys::active_config(&manifest.name))
            .map(config_from_value)
            .unwrap_or_default();

        Extension {
            name: manifest.name.clone(),
            display_name: manifest.display_name().to_string(),
            description: manifest.description.clone(),
            version: manifest.version.clone(),
            author: manifest.author.clone(),
            state: self.state(&manifest.name),
            config,
        }
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let started = self.started.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ExtensionRegistry")
            .field("started", &*started)
            .finish_non_exhaustive()
    }
}
