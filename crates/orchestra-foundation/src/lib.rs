//! # orchestra-foundation
//!
//! The host application around the extension lifecycle:
//! - Application bootstrap (install detection, menus, service wiring)
//! - Named memory instances
//! - Admin request handling for the extensions screens
//! - Flash messages and translation lines

pub mod admin;
pub mod application;
pub mod memory_manager;
pub mod menu;
pub mod messages;
pub mod services;

pub use admin::{ExtensionsController, Response};
pub use application::{Application, Services};
pub use memory_manager::{MemoryFactory, MemoryManager};
pub use menu::{AdminMenuHandler, Menu, MenuItem, MenuWidget};
pub use messages::{LineTranslator, Message, MessageKind, Messages, Translator};
pub use services::{Acl, Mailer, MemoryAcl, Notifier, TracingMailer, TracingNotifier};
