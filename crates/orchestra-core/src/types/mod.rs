//! Type definitions for Orchestra extensions

mod extension_types;

pub use extension_types::*;
