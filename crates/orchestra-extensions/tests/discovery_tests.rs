// Integration tests for directory based extension discovery and publishing

mod common;

use camino::Utf8PathBuf;
use common::*;
use orchestra_core::{Dispatcher, ExtensionState, Memory, MemoryProvider};
use orchestra_extensions::{
    AssetPublisher, DirectorySource, ExtensionRegistry, ExtensionSource, MANIFEST_FILE,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn root(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().join("extensions")).expect("Invalid UTF-8 path")
}

fn write_manifest(root: &Utf8PathBuf, name: &str, content: &str) -> Utf8PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(MANIFEST_FILE), content).unwrap();
    dir
}

#[test]
fn test_detects_vendor_package_layout() {
    let temp = TempDir::new().unwrap();
    let root = root(&temp);
    write_manifest(
        &root,
        "acme/blog",
        "display-name: Acme Blog\nversion: 1.0.0\nconfig:\n  title: Blog\n",
    );
    write_manifest(&root, "acme/wiki", "name: acme/wiki\n");
    write_manifest(&root, "zeta/shop", "");

    let manifests = DirectorySource::new(root.clone()).detect().unwrap();

    let names: Vec<&str> = manifests.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["acme/blog", "acme/wiki", "zeta/shop"]);
    assert_eq!(manifests[0].display_name(), "Acme Blog");
    assert_eq!(manifests[0].config["title"], serde_json::json!("Blog"));
    assert_eq!(manifests[0].path, Some(root.join("acme/blog")));
}

#[test]
fn test_skips_broken_and_mismatched_manifests() {
    let temp = TempDir::new().unwrap();
    let root = root(&temp);
    write_manifest(&root, "acme/blog", "name: acme/blog\n");
    write_manifest(&root, "acme/broken", "config: [not, a, map\n");
    write_manifest(&root, "acme/liar", "name: other/name\n");
    write_manifest(&root, "Acme/Upper", "");
    fs::create_dir_all(root.join("acme/no-manifest")).unwrap();

    let manifests = DirectorySource::new(root).detect().unwrap();

    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].name, "acme/blog");
}

#[test]
fn test_registry_sees_extensions_added_later() {
    let temp = TempDir::new().unwrap();
    let root = root(&temp);
    write_manifest(&root, "acme/blog", "");

    let registry = ExtensionRegistry::new(
        Arc::new(MemoryProvider::new("test")),
        Arc::new(Dispatcher::new()),
        Box::new(DirectorySource::new(root.clone())),
    );
    assert_eq!(registry.detect_all().unwrap().len(), 1);
    assert!(registry.activate("acme/wiki").is_err());

    write_manifest(&root, "acme/wiki", "");

    assert_eq!(registry.detect_all().unwrap().len(), 2);
    let wiki = registry.activate("acme/wiki").unwrap();
    assert_eq!(wiki.state, ExtensionState::Active);
}

#[test]
fn test_update_publishes_assets_from_directory() {
    let temp = TempDir::new().unwrap();
    let root = root(&temp);
    let dir = write_manifest(&root, "acme/blog", "");
    fs::create_dir_all(dir.join("public/js")).unwrap();
    fs::write(dir.join("public/js/blog.js"), "console.log('blog')").unwrap();

    let public = Utf8PathBuf::from_path_buf(temp.path().join("public")).unwrap();
    let harness_memory = Arc::new(RecordingMemory::new());
    let registry = ExtensionRegistry::new(
        Arc::clone(&harness_memory) as Arc<dyn Memory>,
        Arc::new(Dispatcher::new()),
        Box::new(DirectorySource::new(root)),
    )
    .with_publisher(Box::new(AssetPublisher::new(public.clone())));

    registry.activate("acme/blog").unwrap();
    assert_eq!(registry.publish("acme/blog").unwrap(), 1);
    assert!(public.join("packages/acme/blog/js/blog.js").is_file());
}
