//! Common test utilities for orchestra-foundation

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mocks;

pub use mocks::*;
