//! Hierarchical key/value memory
//!
//! Values are `serde_json::Value` trees addressed with dotted keys, e.g.
//! `extensions.active.acme/blog.config`. A key segment may contain any
//! character except `.`, which is why extension names use `/` as separator.
//!
//! A [`MemoryProvider`] keeps the whole tree in process and optionally writes
//! it through a [`MemoryDriver`] on every mutation so other processes can
//! pick it up.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs4::fs_std::FileExt;
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Key/value persistence with dotted-path addressing.
pub trait Memory: Send + Sync {
    /// Read the value stored at `key`. Missing keys and `null` are `None`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Replace the whole value at `key`.
    fn put(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key` and everything below it. Missing keys are ignored.
    fn forget(&self, key: &str) -> Result<()>;

    /// Apply several puts as one unit: either every entry is written or none.
    fn put_many(&self, entries: Vec<(String, Value)>) -> Result<()>;
}

/// Convenience reads layered on top of [`Memory`].
pub trait MemoryExt: Memory {
    /// Read `key`, falling back to `default` without touching the store.
    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Whether a non-null value is stored at `key`.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<M: Memory + ?Sized> MemoryExt for M {}

/// Backend that persists a memory tree outside the process.
pub trait MemoryDriver: Send + Sync {
    /// Load the stored tree. A missing store yields an empty object.
    fn load(&self) -> Result<Value>;

    /// Replace the stored tree.
    fn save(&self, items: &Value) -> Result<()>;
}

/// In-process memory tree with optional write-through persistence.
pub struct MemoryProvider {
    name: String,
    items: RwLock<Value>,
    driver: Option<Box<dyn MemoryDriver>>,
}

impl MemoryProvider {
    /// Create an empty, process-local memory
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: RwLock::new(Value::Object(Map::new())),
            driver: None,
        }
    }

    /// Create a memory backed by `driver`, loading its current contents
    pub fn with_driver(name: impl Into<String>, driver: Box<dyn MemoryDriver>) -> Result<Self> {
        let name = name.into();
        let items = driver.load()?;
        debug!("Loaded memory '{}' from driver", name);
        Ok(Self {
            name,
            items: RwLock::new(items),
            driver: Some(driver),
        })
    }

    /// Memory name, e.g. `orchestra` or `runtime.orchestra`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Value {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `mutate` to a copy of the tree, persist it, then swap it in.
    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Value),
    {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = items.clone();
        mutate(&mut next);

        if let Some(driver) = &self.driver {
            driver.save(&next)?;
        }

        *items = next;
        Ok(())
    }
}

impl Memory for MemoryProvider {
    fn get(&self, key: &str) -> Option<Value> {
        let segments = parse_key(key).ok()?;
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        lookup(&items, &segments).filter(|v| !v.is_null()).cloned()
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let segments = parse_key(key)?;
        self.update(|items| assign(items, &segments, value))
    }

    fn forget(&self, key: &str) -> Result<()> {
        let segments = parse_key(key)?;
        if lookup(&self.snapshot(), &segments).is_none() {
            return Ok(());
        }
        self.update(|items| remove(items, &segments))
    }

    fn put_many(&self, entries: Vec<(String, Value)>) -> Result<()> {
        let parsed = entries
            .iter()
            .map(|(key, _)| parse_key(key))
            .collect::<Result<Vec<_>>>()?;

        self.update(|items| {
            for (segments, (_, value)) in parsed.iter().zip(entries.iter()) {
                assign(items, segments, value.clone());
            }
        })
    }
}

impl std::fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("name", &self.name)
            .field("persistent", &self.driver.is_some())
            .finish()
    }
}

/// JSON document on disk, replaced atomically under an exclusive lock
pub struct JsonFileDriver {
    path: Utf8PathBuf,
}

impl JsonFileDriver {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn lock_path(&self) -> Utf8PathBuf {
        self.path.with_extension("json.lock")
    }
}

impl MemoryDriver for JsonFileDriver {
    fn load(&self) -> Result<Value> {
        if !self.path.exists() {
            return Ok(Value::Object(Map::new()));
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let items: Value = serde_json::from_str(&content)?;
        if !items.is_object() {
            return Err(Error::invalid_config(format!(
                "Memory file {} must contain a JSON object",
                self.path
            )));
        }
        Ok(items)
    }

    fn save(&self, items: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Held until the rename completes; released when dropped
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path)?;
            serde_json::to_writer_pretty(&mut file, items)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        debug!("Persisted memory to {}", self.path);
        Ok(())
    }
}

fn parse_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::invalid_key(key));
    }
    Ok(segments)
}

fn lookup<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| node.as_object()?.get(*segment))
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

fn assign(root: &mut Value, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        node = ensure_object(node)
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(node).insert((*last).to_string(), value);
}

fn remove(root: &mut Value, segments: &[&str]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        match node.as_object_mut().and_then(|map| map.get_mut(*segment)) {
            Some(child) => node = child,
            None => return,
        }
    }
    if let Some(map) = node.as_object_mut() {
        map.remove(*last);
    }
}
