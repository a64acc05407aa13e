//! Extension discovery
//!
//! Sources enumerate the extensions a deployment ships. The registry asks its
//! source again on every detect, so extensions added on disk show up without
//! a restart.

use crate::manifest::ExtensionManifest;
use camino::{Utf8Path, Utf8PathBuf};
use orchestra_core::Result;
use std::fs;
use std::sync::Arc;
use tracing::{debug, warn};

/// Manifest file expected in every extension directory
pub const MANIFEST_FILE: &str = "extension.yaml";

/// Enumerates known extensions
pub trait ExtensionSource: Send + Sync {
    fn detect(&self) -> Result<Vec<ExtensionManifest>>;
}

impl<S: ExtensionSource + ?Sized> ExtensionSource for Arc<S> {
    fn detect(&self) -> Result<Vec<ExtensionManifest>> {
        (**self).detect()
    }
}

/// Fixed set of extensions, e.g. ones compiled into the host
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    manifests: Vec<ExtensionManifest>,
}

impl StaticSource {
    pub fn new(manifests: Vec<ExtensionManifest>) -> Self {
        Self { manifests }
    }
}

impl ExtensionSource for StaticSource {
    fn detect(&self) -> Result<Vec<ExtensionManifest>> {
        Ok(self.manifests.clone())
    }
}

/// Scans `<root>/<vendor>/<package>/extension.yaml`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: Utf8PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn load_manifest(&self, dir: &Utf8Path, name: String) -> Option<ExtensionManifest> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let content = match fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", manifest_path, e);
                return None;
            }
        };

        let mut manifest: ExtensionManifest = if content.trim().is_empty() {
            ExtensionManifest::new(String::new())
        } else {
            match serde_yaml_ng::from_str(&content) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("Skipping {}: {}", manifest_path, e);
                    return None;
                }
            }
        };

        if manifest.name.is_empty() {
            manifest.name = name;
        } else if manifest.name != name {
            warn!(
                "Skipping {}: manifest says '{}' but directory is '{}'",
                manifest_path, manifest.name, name
            );
            return None;
        }

        if let Err(e) = manifest.validate() {
            warn!("Skipping {}: {}", manifest_path, e);
            return None;
        }

        manifest.path = Some(dir.to_path_buf());
        Some(manifest)
    }
}

impl ExtensionSource for DirectorySource {
    fn detect(&self) -> Result<Vec<ExtensionManifest>> {
        if !self.root.is_dir() {
            debug!("Extension directory {} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut manifests = Vec::new();
        for vendor in sorted_subdirs(&self.root)? {
            for package in sorted_subdirs(&vendor)? {
                if !package.join(MANIFEST_FILE).is_file() {
                    continue;
                }
                let (Some(vendor_name), Some(package_name)) = (vendor.file_name(), package.file_name())
                else {
                    continue;
                };
                let name = format!("{}/{}", vendor_name, package_name);
                if let Some(manifest) = self.load_manifest(&package, name) {
                    manifests.push(manifest);
                }
            }
        }

        debug!("Detected {} extension(s) in {}", manifests.len(), self.root);
        Ok(manifests)
    }
}

fn sorted_subdirs(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut dirs = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.into_path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
