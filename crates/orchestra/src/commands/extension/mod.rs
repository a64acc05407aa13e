//! Extension management commands
//!
//! Each command boots the application and goes through the same controller
//! the admin screens use:
//! - list: List detected extensions and their state
//! - activate / deactivate: Change whether an extension is enabled
//! - configure: Show or save an extension's configuration
//! - update: Publish an extension's assets

mod configure;
mod list;
mod transition;

use anyhow::{bail, Context, Result};
use orchestra_foundation::{Application, ExtensionsController, Response};

use crate::cli::{AppOptions, ExtensionCommands};
use crate::commands::boot_application;
use crate::output;

/// Main entry point for extension subcommands
pub fn run(cmd: ExtensionCommands, options: &AppOptions) -> Result<()> {
    let app = boot_application(options)?;
    if !app.installed() && !matches!(cmd, ExtensionCommands::List(_)) {
        bail!("Orchestra is not installed; run `orchestra install` first");
    }
    match cmd {
        ExtensionCommands::List(args) => list::run(args, &app),
        ExtensionCommands::Activate(args) => transition::activate(args, &app),
        ExtensionCommands::Deactivate(args) => transition::deactivate(args, &app),
        ExtensionCommands::Configure(args) => configure::run(args, &app),
        ExtensionCommands::Update(args) => transition::update(args, &app),
    }
}

/// Controller for an admin request against `app`
fn controller(app: &Application) -> Result<ExtensionsController> {
    app.admin_ready()?;
    app.extensions_controller()
        .context("Application has not been booted")
}

/// Print flash messages left by a redirecting action
fn report(app: &Application, response: Response, name: &str) -> Result<()> {
    match response {
        Response::Redirect { .. } => {
            for message in app.messages().drain() {
                output::success(&message.text);
            }
            Ok(())
        }
        Response::NotFound => bail!(
            "Extension '{}' was not found or is not in a state that allows this",
            name
        ),
        Response::View { view, .. } => bail!("Unexpected view '{}'", view),
    }
}
