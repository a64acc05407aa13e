//! Extension manifest declaration and validation

use camino::Utf8PathBuf;
use orchestra_core::{ConfigMap, Error, Result};
use serde::{Deserialize, Serialize};

/// Declarative extension manifest (`extension.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionManifest {
    /// Hierarchical name, e.g. `acme/blog`. Derived from the directory
    /// layout when omitted.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub author: String,

    /// Default configuration persisted on first activation
    #[serde(default)]
    pub config: ConfigMap,

    /// Directory the manifest was loaded from
    #[serde(skip)]
    pub path: Option<Utf8PathBuf>,
}

impl ExtensionManifest {
    /// Create a manifest with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: String::new(),
            version: String::new(),
            author: String::new(),
            config: ConfigMap::new(),
            path: None,
        }
    }

    /// Name shown to administrators
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Validates declaration-level manifest invariants
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Checks that `name` is a `vendor/package` style extension name.
///
/// Segments are lowercase ascii letters, digits, `-` and `_`. A `.` is never
/// allowed since names are embedded in dotted memory keys.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_extension_name(name, "name must not be empty"));
    }
    if name.contains('.') {
        return Err(Error::invalid_extension_name(name, "name must not contain '.'"));
    }

    for segment in name.split('/') {
        if segment.is_empty() {
            return Err(Error::invalid_extension_name(name, "empty path segment"));
        }
        let valid = segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(Error::invalid_extension_name(
                name,
                format!("invalid characters in '{}'", segment),
            ));
        }
    }
    Ok(())
}

/// Converts a URL-safe name (`acme.blog`) back to its canonical form (`acme/blog`)
pub fn normalize_name(raw: &str) -> String {
    raw.trim().replace('.', "/")
}

/// Converts a canonical name to its URL-safe form
pub fn url_name(name: &str) -> String {
    name.replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_manifest_yaml() {
        let yaml = r#"
name: acme/blog
display-name: Acme Blog
description: A small blog
version: 1.2.0
author: Acme
config:
  title: My Blog
  posts-per-page: 10
"#;
        let manifest: ExtensionManifest = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(manifest.name, "acme/blog");
        assert_eq!(manifest.display_name(), "Acme Blog");
        assert_eq!(manifest.config.len(), 2);
        assert!(manifest.path.is_none());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let mut manifest = ExtensionManifest::new("acme/blog");
        assert_eq!(manifest.display_name(), "acme/blog");
        manifest.display_name = Some("  ".to_string());
        assert_eq!(manifest.display_name(), "acme/blog");
    }

    #[test_case("acme/blog" ; "vendor package")]
    #[test_case("blog" ; "single segment")]
    #[test_case("acme-co/blog_2" ; "dash underscore digits")]
    fn test_valid_names(name: &str) {
        assert!(validate_name(name).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("acme.blog" ; "dot")]
    #[test_case("acme//blog" ; "empty segment")]
    #[test_case("Acme/Blog" ; "uppercase")]
    #[test_case("acme/blog post" ; "space")]
    fn test_invalid_names(name: &str) {
        let err = validate_name(name).unwrap_err();
        assert!(matches!(err, Error::InvalidExtensionName { .. }));
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name("acme.blog"), "acme/blog");
        assert_eq!(url_name("acme/blog"), "acme.blog");
    }
}
