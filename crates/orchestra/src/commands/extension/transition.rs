//! Extension activate, deactivate and update commands

use anyhow::Result;
use orchestra_foundation::Application;

use super::{controller, report};
use crate::cli::ExtensionNameArgs;

pub(super) fn activate(args: ExtensionNameArgs, app: &Application) -> Result<()> {
    let response = controller(app)?.activate(&args.name)?;
    report(app, response, &args.name)
}

pub(super) fn deactivate(args: ExtensionNameArgs, app: &Application) -> Result<()> {
    let response = controller(app)?.deactivate(&args.name)?;
    report(app, response, &args.name)
}

pub(super) fn update(args: ExtensionNameArgs, app: &Application) -> Result<()> {
    let response = controller(app)?.update(&args.name)?;
    report(app, response, &args.name)
}
