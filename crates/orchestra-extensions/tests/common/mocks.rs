//! Mock implementations for testing
//!
//! Recording wrappers that let tests assert which memory operations and
//! events an extension operation performed, and in which order.

#![allow(dead_code)]

use orchestra_core::{Dispatcher, Memory, MemoryProvider, Result};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A single memory operation
#[derive(Clone, Debug, PartialEq)]
pub enum MemoryCall {
    Get(String),
    Put(String),
    Forget(String),
    PutMany(Vec<String>),
}

impl MemoryCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, MemoryCall::Get(_))
    }
}

/// In-memory store that records every call made against it
pub struct RecordingMemory {
    inner: MemoryProvider,
    calls: Arc<Mutex<Vec<MemoryCall>>>,
    /// Shared with event recorders so both land in one timeline
    timeline: Option<Timeline>,
}

impl Default for RecordingMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingMemory {
    pub fn new() -> Self {
        Self {
            inner: MemoryProvider::new("recording"),
            calls: Arc::new(Mutex::new(Vec::new())),
            timeline: None,
        }
    }

    pub fn with_timeline(timeline: Timeline) -> Self {
        Self {
            timeline: Some(timeline),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<MemoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<MemoryCall> {
        self.calls().into_iter().filter(MemoryCall::is_write).collect()
    }

    pub fn reads(&self) -> usize {
        self.calls().iter().filter(|c| !c.is_write()).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn snapshot(&self) -> Value {
        self.inner.snapshot()
    }

    fn record(&self, call: MemoryCall) {
        if let Some(timeline) = &self.timeline {
            if call.is_write() {
                timeline.push(format!("memory: {:?}", call));
            }
        }
        self.calls.lock().unwrap().push(call);
    }
}

impl Memory for RecordingMemory {
    fn get(&self, key: &str) -> Option<Value> {
        self.record(MemoryCall::Get(key.to_string()));
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        self.record(MemoryCall::Put(key.to_string()));
        self.inner.put(key, value)
    }

    fn forget(&self, key: &str) -> Result<()> {
        self.record(MemoryCall::Forget(key.to_string()));
        self.inner.forget(key)
    }

    fn put_many(&self, entries: Vec<(String, Value)>) -> Result<()> {
        self.record(MemoryCall::PutMany(
            entries.iter().map(|(key, _)| key.clone()).collect(),
        ));
        self.inner.put_many(entries)
    }
}

/// Ordered log shared between recorders
#[derive(Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<String>>>);

impl Timeline {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Register a listener on `topic` that logs each firing
    pub fn record<T: 'static>(&self, events: &Dispatcher, topic: &str) {
        let timeline = self.clone();
        let label = topic.to_string();
        events.listen::<T, _>(topic, move |_| {
            timeline.push(label.clone());
            Ok(())
        });
    }
}
