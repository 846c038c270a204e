// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Smelt plugin engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Smelt configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmeltConfig {
    /// Engine run settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Element filtering applied before type resolution.
    #[serde(default)]
    pub source: SourceConfig,

    /// Declared plugins, applied in declaration order.
    #[serde(default)]
    pub plugins: Vec<PluginDeclaration>,
}

/// Engine run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Target class-file version, e.g. `"17"`, `"1.8"` or `"61.0"`.
    #[serde(default = "default_class_file_version")]
    pub class_file_version: String,

    /// How the initial builder of each type is created.
    #[serde(default)]
    pub entry_point: EntryPointKind,

    /// Abort the whole run on the first plugin failure.
    #[serde(default)]
    pub fail_fast: bool,

    /// Notify the listener of a plugin failure before a fail-fast abort.
    #[serde(default = "default_true")]
    pub notify_on_abort: bool,

    /// Abort the run when a transformed type requires a live load-time initializer.
    #[serde(default = "default_true")]
    pub fail_on_live_initializer: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            class_file_version: default_class_file_version(),
            entry_point: EntryPointKind::default(),
            fail_fast: false,
            notify_on_abort: true,
            fail_on_live_initializer: true,
        }
    }
}

fn default_class_file_version() -> String {
    "17".to_string()
}

fn default_true() -> bool {
    true
}

/// Strategy used to seed the builder of a type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EntryPointKind {
    /// Keep original methods, renaming them when redefined.
    #[default]
    Rebase,
    /// Replace original method bodies.
    Redefine,
    /// Like `Redefine`, but only for methods declared by the type itself.
    RedefineLocal,
    /// Only add annotations and visitors; no structural changes.
    Decorate,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Element filtering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Entry name prefixes that are never resolved to types.
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            skip_prefixes: default_skip_prefixes(),
        }
    }
}

fn default_skip_prefixes() -> Vec<String> {
    vec!["META-INF/".to_string()]
}

/// A plugin declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDeclaration {
    /// Unique plugin name.
    pub name: String,

    /// Disabled plugins are registered but never applied.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Types this plugin applies to.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Whether the transformation needs a live load-time initializer.
    #[serde(default)]
    pub live_initializer: bool,

    /// `plugin.toml` manifest supplying the description, matcher and
    /// initializer flag instead of the keys above.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

/// Declarative type matcher.
///
/// In TOML a matcher is either a bare keyword (`"any"`, `"none"`) or a
/// single-key table such as `{ name_starts_with = "com.example." }`;
/// `and`/`or` take arrays of matchers and `not` a nested matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherConfig {
    #[default]
    Any,
    None,
    Named(String),
    NameStartsWith(String),
    NameEndsWith(String),
    NameContains(String),
    NameMatches(String),
    InPackage(String),
    And(Vec<MatcherConfig>),
    Or(Vec<MatcherConfig>),
    Not(Box<MatcherConfig>),
}
