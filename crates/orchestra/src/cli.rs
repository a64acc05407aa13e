//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Orchestra - extension administration for Orchestra Foundation
#[derive(Parser, Debug)]
#[command(name = "orchestra")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub app: AppOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where configuration comes from; flags win over file and environment
#[derive(Args, Debug, Clone, Default)]
pub struct AppOptions {
    /// Configuration directory (default: ~/.orchestra)
    #[arg(long, global = true, env = "ORCHESTRA_CONFIG_DIR")]
    pub config_dir: Option<Utf8PathBuf>,

    /// Explicit orchestra.yaml to load
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Admin URL prefix
    #[arg(long, global = true)]
    pub handles: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Boot the application and report its state
    Boot(BootArgs),

    /// Mark the site as installed so changes are persisted
    Install(InstallArgs),

    /// Extension management
    #[command(subcommand)]
    Extension(ExtensionCommands),
}

#[derive(Args, Debug)]
pub struct BootArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Site name (default: site-name from configuration)
    #[arg(long)]
    pub site_name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ExtensionCommands {
    /// List detected extensions
    List(ExtensionListArgs),

    /// Activate an extension
    Activate(ExtensionNameArgs),

    /// Deactivate an extension
    Deactivate(ExtensionNameArgs),

    /// Show or change an extension's configuration
    Configure(ExtensionConfigureArgs),

    /// Publish an extension's assets
    Update(ExtensionNameArgs),
}

#[derive(Args, Debug)]
pub struct ExtensionListArgs {
    /// Only show active extensions
    #[arg(long)]
    pub active: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionNameArgs {
    /// Extension name (acme/blog or acme.blog)
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ExtensionConfigureArgs {
    /// Extension name (acme/blog or acme.blog)
    pub name: String,

    /// Set a configuration value; values are parsed as JSON when possible
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
