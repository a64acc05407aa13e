//! Common test utilities for orchestra-extensions
//!
//! - Manifest builders and an assembled test harness
//! - A recording memory for asserting which reads and writes happen
//! - An event recorder for asserting firing order

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
