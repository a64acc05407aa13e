//! Command implementations

pub mod boot;
pub mod extension;
pub mod install;

use anyhow::{Context, Result};
use orchestra_core::ConfigLoader;
use orchestra_foundation::{Application, Services};
use tracing::debug;

use crate::cli::AppOptions;

/// Load configuration and boot the application
pub fn boot_application(options: &AppOptions) -> Result<Application> {
    let app = load_application(options)?;
    app.boot().context("Failed to boot application")?;
    Ok(app)
}

/// Load configuration and assemble the application without booting it
pub fn load_application(options: &AppOptions) -> Result<Application> {
    let loader = match &options.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir.clone()),
        None => ConfigLoader::new().context("Failed to locate configuration directory")?,
    };

    let mut config = match &options.config {
        Some(path) => loader
            .load_file(path)
            .with_context(|| format!("Failed to load {}", path))?,
        None => loader.load().context("Failed to load configuration")?,
    };
    if let Some(handles) = &options.handles {
        config.handles = handles.trim_matches('/').to_string();
    }
    debug!("Using memory at {}", config.memory.path);

    let services = Services::from_config(&config).context("Failed to set up services")?;
    Ok(Application::new(config, services))
}
