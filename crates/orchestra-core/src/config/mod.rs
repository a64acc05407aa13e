//! Configuration loading and management

mod loader;

pub use loader::{ConfigLoader, ExtensionsConfig, FoundationConfig, MemoryConfig, CONFIG_FILE};
