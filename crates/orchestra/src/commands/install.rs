//! Install command

use anyhow::{Context, Result};

use crate::cli::{AppOptions, InstallArgs};
use crate::commands::load_application;
use crate::output;

pub fn run(args: InstallArgs, options: &AppOptions) -> Result<()> {
    let app = load_application(options)?;
    let installed = app
        .install(args.site_name.as_deref())
        .context("Failed to install Orchestra")?;
    app.boot().context("Failed to boot application")?;

    if installed {
        output::success("Orchestra installed");
    } else {
        output::info("Orchestra is already installed");
    }
    output::kv("Admin", &app.handles(""));
    Ok(())
}
