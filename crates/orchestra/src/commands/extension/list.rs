//! Extension list command

use anyhow::{Context, Result};
use orchestra_core::Extension;
use orchestra_foundation::{Application, Response};
use tabled::{settings::Style, Table, Tabled};

use super::controller;
use crate::cli::ExtensionListArgs;
use crate::output;

#[derive(Tabled, serde::Serialize)]
struct ExtensionRow {
    name: String,
    #[tabled(rename = "display name")]
    display_name: String,
    version: String,
    state: String,
    description: String,
}

impl From<Extension> for ExtensionRow {
    fn from(extension: Extension) -> Self {
        Self {
            name: extension.name,
            display_name: extension.display_name,
            version: dash_if_empty(extension.version),
            state: extension.state.to_string(),
            description: dash_if_empty(extension.description),
        }
    }
}

fn dash_if_empty(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

/// List detected extensions
///
/// - All extensions: `orchestra extension list`
/// - Active only: `orchestra extension list --active`
/// - JSON output: `orchestra extension list --json`
pub(super) fn run(args: ExtensionListArgs, app: &Application) -> Result<()> {
    let Response::View { title, data, .. } = controller(app)?.index()? else {
        anyhow::bail!("Unexpected response while listing extensions");
    };

    let extensions: Vec<Extension> = serde_json::from_value(data["extensions"].clone())
        .context("Failed to read extension list")?;
    let rows: Vec<ExtensionRow> = extensions
        .into_iter()
        .filter(|extension| !args.active || extension.is_active())
        .map(ExtensionRow::from)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    output::header(&title);
    if rows.is_empty() {
        output::info("No extensions found");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}
