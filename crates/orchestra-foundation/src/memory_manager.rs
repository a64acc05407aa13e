//! Named memory instances
//!
//! Names take the form `{driver}.{instance}`:
//!
//! | Driver    | Storage                                        |
//! |-----------|------------------------------------------------|
//! | `runtime` | in-process only, lost on exit                  |
//! | `file`    | `{instance}.json` next to the default memory   |
//!
//! The default memory is backed by the configured JSON file when one is set.

use camino::Utf8PathBuf;
use orchestra_core::{Error, JsonFileDriver, Memory, MemoryProvider, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Name the default memory is cached under
pub const DEFAULT_MEMORY: &str = "orchestra";

/// Creates memory instances for the application
pub trait MemoryFactory: Send + Sync {
    /// The application's primary memory
    fn make_default(&self) -> Result<Arc<dyn Memory>>;

    /// A named memory such as `runtime.orchestra`
    fn make(&self, name: &str) -> Result<Arc<dyn Memory>>;
}

/// Caches one memory per name
#[derive(Default)]
pub struct MemoryManager {
    default_path: Option<Utf8PathBuf>,
    instances: Mutex<HashMap<String, Arc<dyn Memory>>>,
}

impl MemoryManager {
    /// Manager whose memories all live in-process
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager whose default memory persists to `path`
    pub fn with_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            default_path: Some(path.into()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    fn cached<F>(&self, name: &str, create: F) -> Result<Arc<dyn Memory>>
    where
        F: FnOnce() -> Result<Arc<dyn Memory>>,
    {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(memory) = instances.get(name) {
            return Ok(Arc::clone(memory));
        }

        debug!("Creating memory '{}'", name);
        let memory = create()?;
        instances.insert(name.to_string(), Arc::clone(&memory));
        Ok(memory)
    }

    fn file_memory(&self, name: &str, path: Utf8PathBuf) -> Result<Arc<dyn Memory>> {
        let provider = MemoryProvider::with_driver(name, Box::new(JsonFileDriver::new(path)))?;
        Ok(Arc::new(provider))
    }
}

impl MemoryFactory for MemoryManager {
    fn make_default(&self) -> Result<Arc<dyn Memory>> {
        self.cached(DEFAULT_MEMORY, || match &self.default_path {
            Some(path) => self.file_memory(DEFAULT_MEMORY, path.clone()),
            None => Ok(Arc::new(MemoryProvider::new(DEFAULT_MEMORY))),
        })
    }

    fn make(&self, name: &str) -> Result<Arc<dyn Memory>> {
        let (driver, instance) = name.split_once('.').unwrap_or((name, DEFAULT_MEMORY));
        if instance.is_empty() {
            return Err(Error::invalid_config(format!(
                "Memory name '{}' has no instance",
                name
            )));
        }

        match driver {
            "runtime" => self.cached(name, || Ok(Arc::new(MemoryProvider::new(name)))),
            "file" => {
                let dir = self
                    .default_path
                    .as_ref()
                    .and_then(|path| path.parent())
                    .ok_or_else(|| {
                        Error::invalid_config("File memory requires a memory path")
                    })?;
                let path = dir.join(format!("{}.json", instance));
                self.cached(name, || self.file_memory(name, path))
            }
            other => Err(Error::invalid_config(format!(
                "Unknown memory driver '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Debug for MemoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryManager")
            .field("default_path", &self.default_path)
            .finish_non_exhaustive()
    }
}
