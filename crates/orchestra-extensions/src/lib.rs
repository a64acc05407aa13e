//! Extension management for Orchestra
//!
//! This crate handles:
//! - Extension manifest parsing and validation
//! - Extension discovery from the deployment's extension directory
//! - The extension registry (activate, deactivate, publish)
//! - The configure flow (form building, saving, lifecycle events)
//! - Asset publishing

pub mod events;
pub mod keys;
pub mod lifecycle;
pub mod manifest;
pub mod presenter;
pub mod publisher;
pub mod registry;
pub mod source;

pub use events::{ConfigEvent, ExtensionEvent, FormEvent};
pub use lifecycle::{Configuration, ExtensionLifecycle};
pub use manifest::ExtensionManifest;
pub use presenter::{ExtensionPresenter, Field, FieldKind, Fieldset, FormBuilder, FormDescriptor};
pub use publisher::{AssetPublisher, NullPublisher, Publisher};
pub use registry::ExtensionRegistry;
pub use source::{DirectorySource, ExtensionSource, StaticSource, MANIFEST_FILE};
