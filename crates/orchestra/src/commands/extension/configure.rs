//! Extension configure command

use anyhow::{bail, Context, Result};
use orchestra_core::ConfigMap;
use orchestra_foundation::{Application, Response};
use serde_json::Value;

use super::{controller, report};
use crate::cli::ExtensionConfigureArgs;
use crate::output;

/// Show the configuration of a started extension, or save `--set` values
pub(super) fn run(args: ExtensionConfigureArgs, app: &Application) -> Result<()> {
    let controller = controller(app)?;

    if !args.set.is_empty() {
        let input = parse_assignments(&args.set)?;
        let response = controller.save_configuration(&args.name, input)?;
        return report(app, response, &args.name);
    }

    let (title, description, data) = match controller.configure(&args.name)? {
        Response::View {
            title,
            description,
            data,
            ..
        } => (title, description, data),
        other => return report(app, other, &args.name),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    output::header(&title);
    if let Some(description) = description {
        output::info(&description);
    }

    let config = data["config"].as_object().cloned().unwrap_or_default();
    if config.is_empty() {
        output::info("No configuration values");
    }
    let mut keys: Vec<&String> = config.keys().collect();
    keys.sort();
    for key in keys {
        output::kv(key, &display_value(&config[key.as_str()]));
    }
    Ok(())
}

/// Parse `key=value` pairs. Values that are valid JSON keep their type.
fn parse_assignments(assignments: &[String]) -> Result<ConfigMap> {
    let mut input = ConfigMap::new();
    for assignment in assignments {
        let Some((key, raw)) = assignment.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{}'", assignment);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Missing key in '{}'", assignment);
        }
        let value = serde_json::from_str(raw)
            .or_else(|_| serde_json::to_value(raw))
            .with_context(|| format!("Invalid value for '{}'", key))?;
        input.insert(key.to_string(), value);
    }
    Ok(input)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
