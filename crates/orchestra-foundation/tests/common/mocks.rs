//! Mock collaborators for application and controller tests

#![allow(dead_code)]

use mockall::mock;
use orchestra_core::{Dispatcher, FoundationConfig, Memory, Result};
use orchestra_extensions::{ExtensionManifest, NullPublisher, StaticSource};
use orchestra_foundation::{
    Acl, LineTranslator, Mailer, MemoryFactory, MenuWidget, Notifier, Services,
};
use serde_json::Value;
use std::sync::Arc;

mock! {
    pub Store {}

    impl Memory for Store {
        fn get(&self, key: &str) -> Option<Value>;
        fn put(&self, key: &str, value: Value) -> Result<()>;
        fn forget(&self, key: &str) -> Result<()>;
        fn put_many(&self, entries: Vec<(String, Value)>) -> Result<()>;
    }
}

mock! {
    pub Factory {}

    impl MemoryFactory for Factory {
        fn make_default(&self) -> Result<Arc<dyn Memory>>;
        fn make(&self, name: &str) -> Result<Arc<dyn Memory>>;
    }
}

mock! {
    pub AclService {}

    impl Acl for AclService {
        fn attach(&self, memory: Arc<dyn Memory>);
    }
}

mock! {
    pub MailService {}

    impl Mailer for MailService {
        fn attach(&self, memory: Arc<dyn Memory>);
    }
}

mock! {
    pub NotifierService {}

    impl Notifier for NotifierService {
        fn set_default_driver(&self, driver: &str);
    }
}

/// Services with every collaborator replaced
pub struct MockedServices {
    pub factory: MockFactory,
    pub acl: MockAclService,
    pub mailer: MockMailService,
    pub notifier: MockNotifierService,
    pub manifests: Vec<ExtensionManifest>,
}

impl Default for MockedServices {
    fn default() -> Self {
        Self {
            factory: MockFactory::new(),
            acl: MockAclService::new(),
            mailer: MockMailService::new(),
            notifier: MockNotifierService::new(),
            manifests: Vec::new(),
        }
    }
}

impl MockedServices {
    pub fn into_services(self) -> Services {
        Services {
            memory: Arc::new(self.factory),
            acl: Arc::new(self.acl),
            mailer: Arc::new(self.mailer),
            notifier: Arc::new(self.notifier),
            translator: Arc::new(LineTranslator::english().unwrap()),
            events: Arc::new(Dispatcher::new()),
            widget: Arc::new(MenuWidget::new()),
            source: Arc::new(StaticSource::new(self.manifests)),
            publisher: Arc::new(NullPublisher),
        }
    }
}

pub fn test_config() -> FoundationConfig {
    FoundationConfig {
        handles: "admin".to_string(),
        url: "http://localhost".to_string(),
        ..FoundationConfig::default()
    }
}
