//! Application bootstrap
//!
//! Boot decides whether Orchestra is installed by looking for `site.name` in
//! the default memory:
//!
//! - **Installed**: every enabled extension is started, the ACL is attached
//!   to memory, and the admin home link and the `orchestra.ready: admin`
//!   menu listener are registered.
//! - **Not installed**: a `runtime.orchestra` memory stands in for the
//!   default one and the admin menu links to the installer.
//!
//! Both paths attach the mailer, select the `orchestra` notifier driver,
//! create `menu.orchestra` and `menu.app`, and finally fire
//! `orchestra.started` with the memory in use.

use crate::admin::ExtensionsController;
use crate::memory_manager::{MemoryFactory, MemoryManager};
use crate::menu::{AdminMenuHandler, Menu, MenuWidget};
use crate::messages::{LineTranslator, Messages, Translator};
use crate::services::{Acl, Mailer, MemoryAcl, Notifier, TracingMailer, TracingNotifier};
use orchestra_core::{Dispatcher, FoundationConfig, Memory, Result};
use orchestra_extensions::{
    AssetPublisher, DirectorySource, ExtensionLifecycle, ExtensionPresenter, ExtensionRegistry,
    ExtensionSource, Publisher,
};
use serde_json::json;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, info};

/// Fired once boot completes; payload is the `Arc<dyn Memory>` in use
pub const STARTED: &str = "orchestra.started";

/// Fired when the admin area is about to render; payload is `()`
pub const ADMIN_READY: &str = "orchestra.ready: admin";

/// Memory used while Orchestra is not installed
pub const RUNTIME_MEMORY: &str = "runtime.orchestra";

/// Memory key whose presence marks an installed site
pub const SITE_NAME: &str = "site.name";

/// Collaborators the application is assembled from
pub struct Services {
    pub memory: Arc<dyn MemoryFactory>,
    pub acl: Arc<dyn Acl>,
    pub mailer: Arc<dyn Mailer>,
    pub notifier: Arc<dyn Notifier>,
    pub translator: Arc<dyn Translator>,
    pub events: Arc<Dispatcher>,
    pub widget: Arc<MenuWidget>,
    pub source: Arc<dyn ExtensionSource>,
    pub publisher: Arc<dyn Publisher>,
}

impl Services {
    /// Default wiring: file-backed memory, extensions discovered on disk
    pub fn from_config(config: &FoundationConfig) -> Result<Self> {
        Ok(Self {
            memory: Arc::new(MemoryManager::with_file(config.memory.path.clone())),
            acl: Arc::new(MemoryAcl::new()),
            mailer: Arc::new(TracingMailer),
            notifier: Arc::new(TracingNotifier::default()),
            translator: Arc::new(LineTranslator::english()?),
            events: Arc::new(Dispatcher::new()),
            widget: Arc::new(MenuWidget::new()),
            source: Arc::new(DirectorySource::new(config.extensions.directory.clone())),
            publisher: Arc::new(AssetPublisher::new(
                config.extensions.public_directory.clone(),
            )),
        })
    }
}

struct Booted {
    memory: Arc<dyn Memory>,
    installed: bool,
    extensions: Arc<ExtensionLifecycle>,
}

/// The Orchestra host application
pub struct Application {
    config: FoundationConfig,
    services: Services,
    messages: Arc<Messages>,
    boot_lock: Mutex<()>,
    booted: OnceLock<Booted>,
}

impl Application {
    pub fn new(config: FoundationConfig, services: Services) -> Self {
        Self {
            config,
            services,
            messages: Arc::new(Messages::new()),
            boot_lock: Mutex::new(()),
            booted: OnceLock::new(),
        }
    }

    /// Boot the application. Later calls return immediately.
    pub fn boot(&self) -> Result<&Self> {
        let _guard = self.boot_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.booted.get().is_some() {
            debug!("Application already booted");
            return Ok(self);
        }

        // Fallible steps first: a failed boot leaves nothing registered
        let (memory, installed) = self.boot_memory()?;
        let registry = ExtensionRegistry::new(
            Arc::clone(&memory),
            Arc::clone(&self.services.events),
            Box::new(Arc::clone(&self.services.source)),
        )
        .with_publisher(Box::new(Arc::clone(&self.services.publisher)));
        let extensions = Arc::new(ExtensionLifecycle::new(
            Arc::new(registry),
            Box::new(ExtensionPresenter::new(self.config.handles.clone())),
        ));
        if installed {
            extensions.registry().load_active()?;
            self.services.acl.attach(Arc::clone(&memory));
        }

        self.services.mailer.attach(Arc::clone(&memory));
        self.services.notifier.set_default_driver("orchestra");
        self.boot_menus(installed);

        // Listeners of `orchestra.started` may already query the application
        let mut payload = Arc::clone(&memory);
        let _ = self.booted.set(Booted {
            memory,
            installed,
            extensions,
        });

        info!(
            "Orchestra booted ({})",
            if installed { "installed" } else { "not installed" }
        );
        self.services.events.fire(STARTED, &mut payload)?;
        Ok(self)
    }

    /// Record `site.name` in the default memory so the next boot finds an
    /// installed site. Returns false when the site was already installed.
    pub fn install(&self, site_name: Option<&str>) -> Result<bool> {
        let memory = self.services.memory.make_default()?;
        if memory.get(SITE_NAME).is_some() {
            debug!("Orchestra is already installed");
            return Ok(false);
        }

        let site_name = site_name.unwrap_or(self.config.site_name.as_str());
        memory.put(SITE_NAME, json!(site_name))?;
        info!("Installed Orchestra as '{}'", site_name);
        Ok(true)
    }

    fn boot_memory(&self) -> Result<(Arc<dyn Memory>, bool)> {
        let memory = self.services.memory.make_default()?;
        if memory.get(SITE_NAME).is_some() {
            return Ok((memory, true));
        }

        info!("Orchestra is not installed, using {} memory", RUNTIME_MEMORY);
        let runtime = self.services.memory.make(RUNTIME_MEMORY)?;
        runtime.put(SITE_NAME, json!(self.config.site_name))?;
        Ok((runtime, false))
    }

    fn boot_menus(&self, installed: bool) {
        let widget = &self.services.widget;
        widget.make(AdminMenuHandler::MENU);
        widget.make("menu.app");

        if installed {
            widget.add(
                AdminMenuHandler::MENU,
                "home",
                self.services.translator.translate("title.home", &[]),
                self.handles(""),
            );

            let handler = AdminMenuHandler::new(
                Arc::clone(widget),
                Arc::clone(&self.services.translator),
                self.handles(""),
            );
            self.services
                .events
                .listen(ADMIN_READY, move |_: &mut ()| handler.handle());
        } else {
            widget.add(
                AdminMenuHandler::MENU,
                "install",
                self.services.translator.translate("title.install", &[]),
                self.handles("install"),
            );
        }
    }

    /// Fire `orchestra.ready: admin`
    pub fn admin_ready(&self) -> Result<usize> {
        self.services.events.fire(ADMIN_READY, &mut ())
    }

    /// Absolute URL of `path` inside the admin area
    pub fn handles(&self, path: &str) -> String {
        let root = self.config.url.trim_end_matches('/');
        let prefix = self.config.handles.trim_matches('/');
        let path = path.trim_matches('/');

        [root, prefix, path]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Whether boot found an installed site. False before boot.
    pub fn installed(&self) -> bool {
        self.booted.get().is_some_and(|booted| booted.installed)
    }

    /// Memory in use, once booted
    pub fn memory(&self) -> Option<Arc<dyn Memory>> {
        self.booted.get().map(|booted| Arc::clone(&booted.memory))
    }

    /// Extension lifecycle, once booted
    pub fn extensions(&self) -> Option<Arc<ExtensionLifecycle>> {
        self.booted.get().map(|booted| Arc::clone(&booted.extensions))
    }

    /// Controller for the extensions admin screens, once booted
    pub fn extensions_controller(&self) -> Option<ExtensionsController> {
        let extensions = self.extensions()?;
        Some(ExtensionsController::new(
            extensions,
            Arc::clone(&self.messages),
            Arc::clone(&self.services.translator),
            self.handles("extensions"),
        ))
    }

    pub fn menu(&self, name: &str) -> Option<Menu> {
        self.services.widget.get(name)
    }

    pub fn widget(&self) -> &Arc<MenuWidget> {
        &self.services.widget
    }

    pub fn acl(&self) -> &Arc<dyn Acl> {
        &self.services.acl
    }

    pub fn events(&self) -> &Arc<Dispatcher> {
        &self.services.events
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.services.translator
    }

    pub fn messages(&self) -> &Arc<Messages> {
        &self.messages
    }

    pub fn config(&self) -> &FoundationConfig {
        &self.config
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("handles", &self.config.handles)
            .field("booted", &self.booted.get().is_some())
            .field("installed", &self.installed())
            .finish_non_exhaustive()
    }
}
