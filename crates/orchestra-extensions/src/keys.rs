//! Memory layout for extension state
//!
//! | Key                                 | Contents                                  |
//! |-------------------------------------|-------------------------------------------|
//! | `extensions.available.{name}`       | name, description, version, author        |
//! | `extensions.active.{name}.config`   | canonical configuration of enabled ones   |
//! | `extension_{name}`                  | configuration override bucket             |
//!
//! An extension counts as enabled while `extensions.active.{name}` exists.

pub fn available(name: &str) -> String {
    format!("extensions.available.{name}")
}

pub fn available_name(name: &str) -> String {
    format!("extensions.available.{name}.name")
}

pub fn active(name: &str) -> String {
    format!("extensions.active.{name}")
}

pub fn active_config(name: &str) -> String {
    format!("extensions.active.{name}.config")
}

pub fn config_override(name: &str) -> String {
    format!("extension_{name}")
}
