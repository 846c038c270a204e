// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.
//!
//! A manifest names a plugin, describes it, and declares the matcher that
//! selects the types it transforms. Manifests can also be derived from the
//! `[[plugins]]` declarations of the main configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smelt_config::{MatcherConfig, PluginDeclaration};
use smelt_core::SmeltError;

/// Parsed plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique name of the plugin (e.g., "trace-calls").
    pub name: String,
    /// Semantic version string.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Optional author identifier.
    pub author: Option<String>,
    /// Types the plugin applies to.
    pub matcher: MatcherConfig,
    /// Whether the plugin registers a live loaded initializer.
    pub live_initializer: bool,
}

#[derive(Debug, Deserialize)]
struct PluginManifestFile {
    plugin: PluginSection,
}

/// The `[plugin]` section of a `plugin.toml` file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    author: Option<String>,
    #[serde(default)]
    matcher: MatcherConfig,
    #[serde(default)]
    live_initializer: bool,
}

/// Parse a plugin manifest from TOML content.
///
/// Name and version must be non-empty.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginManifest, SmeltError> {
    let file: PluginManifestFile = toml::from_str(toml_content)
        .map_err(|e| SmeltError::Config(format!("invalid plugin manifest: {e}")))?;

    let section = file.plugin;

    if section.name.is_empty() {
        return Err(SmeltError::Config(
            "plugin manifest: name must not be empty".to_string(),
        ));
    }

    if section.version.is_empty() {
        return Err(SmeltError::Config(
            "plugin manifest: version must not be empty".to_string(),
        ));
    }

    Ok(PluginManifest {
        name: section.name,
        version: section.version,
        description: section.description,
        author: section.author,
        matcher: section.matcher,
        live_initializer: section.live_initializer,
    })
}

/// Read and parse the `plugin.toml` manifest at `path`.
pub fn load_plugin_manifest(path: &Path) -> Result<PluginManifest, SmeltError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SmeltError::io(format!("reading plugin manifest {}", path.display()), e))?;
    parse_plugin_manifest(&content)
}

impl From<&PluginDeclaration> for PluginManifest {
    fn from(declaration: &PluginDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: declaration.description.clone().unwrap_or_default(),
            author: None,
            matcher: declaration.matcher.clone(),
            live_initializer: declaration.live_initializer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_manifest() {
        let toml = r#"
[plugin]
name = "trace-calls"
version = "0.1.0"
description = "Adds call tracing to service types"
author = "Smelt Contributors"
matcher = { name_ends_with = "Service" }
"#;
        let manifest = parse_plugin_manifest(toml).unwrap();
        assert_eq!(manifest.name, "trace-calls");
        assert_eq!(manifest.version, "0.1.0");
        assert_eq!(manifest.matcher, MatcherConfig::NameEndsWith("Service".into()));
        assert_eq!(manifest.author.as_deref(), Some("Smelt Contributors"));
        assert!(!manifest.live_initializer);
    }

    #[test]
    fn parse_nested_matcher() {
        let toml = r#"
[plugin]
name = "nested"
version = "1.0.0"

[plugin.matcher]
and = [{ in_package = "com.example" }, { not = { named = "com.example.Main" } }]
"#;
        let manifest = parse_plugin_manifest(toml).unwrap();
        assert_eq!(
            manifest.matcher,
            MatcherConfig::And(vec![
                MatcherConfig::InPackage("com.example".into()),
                MatcherConfig::Not(Box::new(MatcherConfig::Named("com.example.Main".into()))),
            ])
        );
    }

    #[test]
    fn parse_missing_name() {
        let toml = r#"
[plugin]
name = ""
version = "0.1.0"
"#;
        let err = parse_plugin_manifest(toml).unwrap_err().to_string();
        assert!(err.contains("name must not be empty"));
    }

    #[test]
    fn parse_missing_version() {
        let toml = r#"
[plugin]
name = "test"
version = ""
"#;
        let err = parse_plugin_manifest(toml).unwrap_err().to_string();
        assert!(err.contains("version must not be empty"));
    }

    #[test]
    fn parse_unknown_field() {
        let toml = r#"
[plugin]
name = "test"
version = "0.1.0"
adapter_type = "Channel"
"#;
        let err = parse_plugin_manifest(toml).unwrap_err().to_string();
        assert!(err.contains("invalid plugin manifest"));
    }

    #[test]
    fn parse_minimal_manifest() {
        let toml = r#"
[plugin]
name = "minimal"
version = "1.0.0"
"#;
        let manifest = parse_plugin_manifest(toml).unwrap();
        assert_eq!(manifest.matcher, MatcherConfig::Any);
        assert!(manifest.description.is_empty());
        assert!(manifest.author.is_none());
    }

    #[test]
    fn load_reads_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin.toml");
        std::fs::write(&path, "[plugin]\nname = \"on-disk\"\nversion = \"2.0.0\"\n").unwrap();

        let manifest = load_plugin_manifest(&path).unwrap();
        assert_eq!(manifest.name, "on-disk");
        assert_eq!(manifest.version, "2.0.0");

        let err = load_plugin_manifest(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SmeltError::Io { .. }));
    }

    #[test]
    fn manifest_from_declaration() {
        let declaration = PluginDeclaration {
            name: "decl".into(),
            enabled: true,
            description: Some("declared in smelt.toml".into()),
            matcher: MatcherConfig::Named("Foo".into()),
            live_initializer: true,
            manifest: None,
        };
        let manifest = PluginManifest::from(&declaration);
        assert_eq!(manifest.name, "decl");
        assert_eq!(manifest.description, "declared in smelt.toml");
        assert_eq!(manifest.matcher, MatcherConfig::Named("Foo".into()));
        assert!(manifest.live_initializer);
    }
}
