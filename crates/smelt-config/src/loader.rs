// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./smelt.toml` > `~/.config/smelt/smelt.toml` > `/etc/smelt/smelt.toml`
//! with environment variable overrides via `SMELT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::SmeltConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/smelt/smelt.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "smelt.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/smelt/smelt.toml` (system-wide)
/// 3. `~/.config/smelt/smelt.toml` (user XDG config)
/// 4. `./smelt.toml` (local directory)
/// 5. `SMELT_*` environment variables
pub fn load_config() -> Result<SmeltConfig, figment::Error> {
    debug!(user_config = ?user_config_path(), "loading configuration hierarchy");
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SmeltConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmeltConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SmeltConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(SmeltConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SmeltConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Path of the per-user configuration file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("smelt/smelt.toml"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SMELT_ENGINE_FAIL_FAST` must map to `engine.fail_fast`,
/// not `engine.fail.fast`. Plugins cannot be declared through the environment.
fn env_provider() -> Env {
    Env::prefixed("SMELT_")
        .filter(|key| !key.as_str().to_ascii_lowercase().starts_with("plugins"))
        .map(|key| {
            let mapped = key
                .as_str()
                .to_ascii_lowercase()
                .replacen("engine_", "engine.", 1)
                .replacen("logging_", "logging.", 1)
                .replacen("source_", "source.", 1);
            mapped.into()
        })
}
