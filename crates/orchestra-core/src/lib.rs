//! # orchestra-core
//!
//! Core library for Orchestra Foundation providing:
//! - Hierarchical key/value memory with dotted-path addressing
//! - Synchronous named-topic event dispatcher
//! - Foundation configuration loading (orchestra.yaml + environment)
//! - Type definitions for extensions and their lifecycle state

pub mod config;
pub mod error;
pub mod events;
pub mod memory;
pub mod types;

pub use config::{ConfigLoader, FoundationConfig};
pub use error::{Error, Result};
pub use events::{Dispatcher, ListenerError, ListenerId};
pub use memory::{JsonFileDriver, Memory, MemoryDriver, MemoryExt, MemoryProvider};
pub use types::{ConfigMap, Extension, ExtensionState};
