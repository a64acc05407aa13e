//! Boot command

use anyhow::Result;
use serde::Serialize;

use crate::cli::{AppOptions, BootArgs};
use crate::commands::boot_application;
use crate::output;

#[derive(Serialize)]
struct BootReport {
    installed: bool,
    site_name: Option<String>,
    admin_url: String,
    started: Vec<String>,
    menus: Vec<orchestra_foundation::Menu>,
}

pub fn run(args: BootArgs, options: &AppOptions) -> Result<()> {
    let app = boot_application(options)?;
    app.admin_ready()?;

    let site_name = app
        .memory()
        .and_then(|memory| memory.get("site.name"))
        .and_then(|value| value.as_str().map(str::to_string));
    let started = match app.extensions() {
        Some(extensions) => extensions
            .detect()?
            .into_iter()
            .filter(|extension| extension.is_started())
            .map(|extension| extension.name)
            .collect(),
        None => Vec::new(),
    };
    let menus = app
        .widget()
        .names()
        .iter()
        .filter_map(|name| app.menu(name))
        .collect();

    let report = BootReport {
        installed: app.installed(),
        site_name,
        admin_url: app.handles(""),
        started,
        menus,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.installed {
        output::success("Orchestra is installed");
    } else {
        output::warning("Orchestra is not installed yet; run `orchestra install`");
    }
    output::kv("Site", report.site_name.as_deref().unwrap_or("-"));
    output::kv("Admin", &report.admin_url);
    output::kv(
        "Started extensions",
        &if report.started.is_empty() {
            "-".to_string()
        } else {
            report.started.join(", ")
        },
    );

    for menu in &report.menus {
        output::header(&menu.name);
        if menu.items.is_empty() {
            output::info("No items");
        }
        for item in &menu.items {
            output::kv(&item.title, &item.link);
        }
    }
    Ok(())
}
