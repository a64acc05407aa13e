//! Extension asset publishing
//!
//! Run by the "update" action: copies an extension's `public/` directory into
//! the host's public directory under `packages/{name}/`.

use crate::manifest::ExtensionManifest;
use camino::{Utf8Path, Utf8PathBuf};
use orchestra_core::{Error, Result};
use std::fs;
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Publishes an extension's assets
pub trait Publisher: Send + Sync {
    /// Returns the number of files published
    fn publish(&self, manifest: &ExtensionManifest) -> Result<usize>;
}

impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    fn publish(&self, manifest: &ExtensionManifest) -> Result<usize> {
        (**self).publish(manifest)
    }
}

/// Publisher for hosts without public assets
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl Publisher for NullPublisher {
    fn publish(&self, manifest: &ExtensionManifest) -> Result<usize> {
        debug!("Nothing to publish for {}", manifest.name);
        Ok(0)
    }
}

/// Copies `<extension>/public/**` to `<public_dir>/packages/<name>/`
#[derive(Debug, Clone)]
pub struct AssetPublisher {
    public_dir: Utf8PathBuf,
}

impl AssetPublisher {
    /// Directory inside an extension holding its assets
    pub const ASSET_DIR: &'static str = "public";

    pub fn new(public_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    /// Destination directory for `name`
    pub fn destination(&self, name: &str) -> Utf8PathBuf {
        self.public_dir.join("packages").join(name)
    }

    fn copy_tree(&self, name: &str, source: &Utf8Path, destination: &Utf8Path) -> Result<usize> {
        let mut copied = 0;
        for entry in WalkDir::new(source).follow_links(false) {
            let entry = entry.map_err(|e| Error::publish(name, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| Error::publish(name, e.to_string()))?;
            let target = destination.as_std_path().join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
        Ok(copied)
    }
}

impl Publisher for AssetPublisher {
    fn publish(&self, manifest: &ExtensionManifest) -> Result<usize> {
        let Some(dir) = &manifest.path else {
            debug!("{} has no directory, skipping asset publish", manifest.name);
            return Ok(0);
        };

        let source = dir.join(Self::ASSET_DIR);
        if !source.is_dir() {
            debug!("{} ships no assets", manifest.name);
            return Ok(0);
        }

        let destination = self.destination(&manifest.name);
        let copied = self.copy_tree(&manifest.name, &source, &destination)?;
        info!(
            "Published {} asset(s) for {} to {}",
            copied, manifest.name, destination
        );
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn test_copies_public_tree() {
        let temp = TempDir::new().unwrap();
        let ext_dir = utf8(temp.path().join("extensions/acme/blog"));
        fs::create_dir_all(ext_dir.join("public/css")).unwrap();
        fs::write(ext_dir.join("public/css/blog.css"), "body {}").unwrap();
        fs::write(ext_dir.join("public/logo.svg"), "<svg/>").unwrap();

        let mut manifest = ExtensionManifest::new("acme/blog");
        manifest.path = Some(ext_dir);

        let publisher = AssetPublisher::new(utf8(temp.path().join("public")));
        let copied = publisher.publish(&manifest).unwrap();

        assert_eq!(copied, 2);
        let destination = publisher.destination("acme/blog");
        assert!(destination.join("css/blog.css").is_file());
        assert!(destination.join("logo.svg").is_file());
    }

    #[test]
    fn test_without_assets_publishes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut manifest = ExtensionManifest::new("acme/blog");
        manifest.path = Some(utf8(temp.path().to_path_buf()));

        let publisher = AssetPublisher::new(utf8(temp.path().join("public")));
        assert_eq!(publisher.publish(&manifest).unwrap(), 0);
        assert_eq!(NullPublisher.publish(&manifest).unwrap(), 0);
    }
}
