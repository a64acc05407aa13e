//! Collaborators the application wires up during boot
//!
//! Access control rules, mail delivery and notification channels belong to
//! other packages. The application only attaches memory to them and picks a
//! notifier driver.

use orchestra_core::Memory;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Access control container
pub trait Acl: Send + Sync {
    /// Back the ACL with the application memory
    fn attach(&self, memory: Arc<dyn Memory>);
}

/// Outgoing mail
pub trait Mailer: Send + Sync {
    /// Read mail settings from the application memory
    fn attach(&self, memory: Arc<dyn Memory>);
}

/// Notification channels
pub trait Notifier: Send + Sync {
    fn set_default_driver(&self, driver: &str);
}

/// ACL that only keeps track of its attached memory
#[derive(Default)]
pub struct MemoryAcl {
    memory: RwLock<Option<Arc<dyn Memory>>>,
}

impl MemoryAcl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.memory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Acl for MemoryAcl {
    fn attach(&self, memory: Arc<dyn Memory>) {
        debug!("Attaching memory to ACL");
        *self.memory.write().unwrap_or_else(PoisonError::into_inner) = Some(memory);
    }
}

/// Mailer that logs instead of sending
#[derive(Debug, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn attach(&self, _memory: Arc<dyn Memory>) {
        debug!("Mailer attached to memory");
    }
}

/// Notifier that records its default driver
#[derive(Debug, Default)]
pub struct TracingNotifier {
    driver: RwLock<Option<String>>,
}

impl TracingNotifier {
    pub fn default_driver(&self) -> Option<String> {
        self.driver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for TracingNotifier {
    fn set_default_driver(&self, driver: &str) {
        info!("Default notifier driver: {}", driver);
        *self.driver.write().unwrap_or_else(PoisonError::into_inner) = Some(driver.to_string());
    }
}
