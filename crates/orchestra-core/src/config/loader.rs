//! Foundation configuration loader with precedence
//!
//! Loads configuration from the following sources (low to high):
//! 1. Built-in defaults
//! 2. Config file (~/.orchestra/orchestra.yaml)
//! 3. Environment variables (ORCHESTRA_* prefix)
//! 4. CLI flags (handled by caller)
//!
//! Relative paths are resolved against the config directory.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tracing::debug;

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "orchestra.yaml";

/// Foundation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FoundationConfig {
    /// URL prefix the admin panel is served under
    pub handles: String,

    /// Application root URL
    pub url: String,

    /// Site name written on first install
    pub site_name: String,

    pub memory: MemoryConfig,

    pub extensions: ExtensionsConfig,
}

impl Default for FoundationConfig {
    fn default() -> Self {
        Self {
            handles: "admin".to_string(),
            url: "http://localhost".to_string(),
            site_name: "Orchestra Platform".to_string(),
            memory: MemoryConfig::default(),
            extensions: ExtensionsConfig::default(),
        }
    }
}

/// Memory persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MemoryConfig {
    /// JSON file backing the default memory
    pub path: Utf8PathBuf,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("memory.json"),
        }
    }
}

/// Extension discovery and publishing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtensionsConfig {
    /// Directory scanned for `<vendor>/<package>/extension.yaml`
    pub directory: Utf8PathBuf,

    /// Directory extension assets are published into
    pub public_directory: Utf8PathBuf,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            directory: Utf8PathBuf::from("extensions"),
            public_directory: Utf8PathBuf::from("public"),
        }
    }
}

/// Configuration hierarchy loader
pub struct ConfigLoader {
    config_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the standard config directory (~/.orchestra)
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = env::var("HOME")
            .ok()
            .map(Utf8PathBuf::from)
            .or_else(|| dirs::home_dir().and_then(|p| Utf8PathBuf::from_path_buf(p).ok()))
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;

        Ok(home.join(".orchestra"))
    }

    /// Load the foundation configuration with hierarchical precedence
    pub fn load(&self) -> Result<FoundationConfig> {
        let config_path = self.config_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            debug!("Loading configuration from {}", config_path);
            self.load_yaml_file(&config_path)?
        } else {
            FoundationConfig::default()
        };

        Self::apply_env_overrides(&mut config)?;
        self.resolve_paths(&mut config);

        Ok(config)
    }

    /// Load an explicit config file, failing if it is missing
    pub fn load_file(&self, path: &Utf8Path) -> Result<FoundationConfig> {
        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }
        let mut config = self.load_yaml_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        self.resolve_paths(&mut config);
        Ok(config)
    }

    fn load_yaml_file(&self, path: &Utf8Path) -> Result<FoundationConfig> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(FoundationConfig::default());
        }
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    fn apply_env_overrides(config: &mut FoundationConfig) -> Result<()> {
        if let Ok(val) = env::var("ORCHESTRA_HANDLES") {
            config.handles = val.trim_matches('/').to_string();
        }

        if let Ok(val) = env::var("ORCHESTRA_URL") {
            if val.trim().is_empty() {
                return Err(Error::invalid_config("ORCHESTRA_URL must not be empty"));
            }
            config.url = val.trim_end_matches('/').to_string();
        }

        if let Ok(val) = env::var("ORCHESTRA_MEMORY_PATH") {
            config.memory.path = Utf8PathBuf::from(val);
        }

        if let Ok(val) = env::var("ORCHESTRA_EXTENSIONS_DIR") {
            config.extensions.directory = Utf8PathBuf::from(val);
        }

        if let Ok(val) = env::var("ORCHESTRA_PUBLIC_DIR") {
            config.extensions.public_directory = Utf8PathBuf::from(val);
        }

        Ok(())
    }

    fn resolve_paths(&self, config: &mut FoundationConfig) {
        for path in [
            &mut config.memory.path,
            &mut config.extensions.directory,
            &mut config.extensions.public_directory,
        ] {
            if path.is_relative() {
                *path = self.config_dir.join(&*path);
            }
        }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (ConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        (ConfigLoader::with_dir(config_dir), temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let (loader, _temp) = create_temp_loader();
        let config = loader.load().unwrap();

        assert_eq!(config.handles, "admin");
        assert_eq!(config.url, "http://localhost");
        assert_eq!(config.memory.path, loader.config_dir().join("memory.json"));
        assert_eq!(
            config.extensions.directory,
            loader.config_dir().join("extensions")
        );
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
handles: backend
site-name: "Acme Admin"
memory:
  path: /var/lib/orchestra/memory.json
extensions:
  public-directory: assets
"#;
        fs::write(loader.config_dir().join(CONFIG_FILE), config_content).unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.handles, "backend");
        assert_eq!(config.site_name, "Acme Admin");
        assert_eq!(config.url, "http://localhost");
        assert_eq!(
            config.memory.path,
            Utf8PathBuf::from("/var/lib/orchestra/memory.json")
        );
        assert_eq!(
            config.extensions.public_directory,
            loader.config_dir().join("assets")
        );
    }

    #[test]
    #[serial]
    fn test_invalid_file_is_reported() {
        let (loader, _temp) = create_temp_loader();
        fs::write(loader.config_dir().join(CONFIG_FILE), "handles: [unclosed").unwrap();

        let err = loader.load().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("ORCHESTRA_HANDLES", "/manage/");
        env::set_var("ORCHESTRA_URL", "https://example.com/");
        env::set_var("ORCHESTRA_EXTENSIONS_DIR", "/srv/extensions");

        let config = loader.load().unwrap();
        assert_eq!(config.handles, "manage");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(
            config.extensions.directory,
            Utf8PathBuf::from("/srv/extensions")
        );

        env::remove_var("ORCHESTRA_HANDLES");
        env::remove_var("ORCHESTRA_URL");
        env::remove_var("ORCHESTRA_EXTENSIONS_DIR");
    }

    #[test]
    #[serial]
    fn test_load_file_missing() {
        let (loader, _temp) = create_temp_loader();
        let missing = loader.config_dir().join("nope.yaml");
        assert!(matches!(
            loader.load_file(&missing),
            Err(Error::ConfigNotFound { .. })
        ));
    }
}
