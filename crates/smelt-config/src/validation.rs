// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as parseable class-file versions, unique plugin names, and valid regexes.

use std::collections::HashSet;

use smelt_core::ClassFileVersion;

use crate::diagnostic::ConfigError;
use crate::model::{MatcherConfig, SmeltConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SmeltConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(err) = config
        .engine
        .class_file_version
        .parse::<ClassFileVersion>()
    {
        errors.push(ConfigError::Validation {
            message: format!("engine.class_file_version: {err}"),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (i, prefix) in config.source.skip_prefixes.iter().enumerate() {
        if prefix.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("source.skip_prefixes[{i}] must not be empty"),
            });
        }
    }

    let mut seen_names = HashSet::new();
    for (i, plugin) in config.plugins.iter().enumerate() {
        if plugin.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].name must not be empty"),
            });
        } else if !seen_names.insert(plugin.name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate plugin name `{}` in [[plugins]] array", plugin.name),
            });
        }
        if plugin
            .manifest
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].manifest must not be empty"),
            });
        }
        validate_matcher(&plugin.matcher, &format!("plugins[{i}].matcher"), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_matcher(matcher: &MatcherConfig, path: &str, errors: &mut Vec<ConfigError>) {
    match matcher {
        MatcherConfig::NameMatches(pattern) => {
            if let Err(err) = regex::Regex::new(pattern) {
                errors.push(ConfigError::Validation {
                    message: format!("{path}: invalid name_matches pattern `{pattern}`: {err}"),
                });
            }
        }
        MatcherConfig::And(members) | MatcherConfig::Or(members) => {
            if members.is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("{path}: and/or matchers need at least one member"),
                });
            }
            for (i, member) in members.iter().enumerate() {
                validate_matcher(member, &format!("{path}[{i}]"), errors);
            }
        }
        MatcherConfig::Not(inner) => validate_matcher(inner, path, errors),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PluginDeclaration;

    fn declaration(name: &str, matcher: MatcherConfig) -> PluginDeclaration {
        PluginDeclaration {
            name: name.to_string(),
            enabled: true,
            description: None,
            matcher,
            live_initializer: false,
            manifest: None,
        }
    }

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn empty_manifest_path_fails_validation() {
        let mut config = SmeltConfig::default();
        let mut plugin = declaration("from-file", MatcherConfig::Any);
        plugin.manifest = Some("".into());
        config.plugins.push(plugin);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "plugins[0].manifest"));
    }

    #[test]
    fn default_config_validates() {
        let config = SmeltConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_class_file_version_fails_validation() {
        let mut config = SmeltConfig::default();
        config.engine.class_file_version = "seventeen".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "class_file_version"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SmeltConfig::default();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "logging.level"));
    }

    #[test]
    fn duplicate_plugin_names_fail_validation() {
        let mut config = SmeltConfig::default();
        config.plugins = vec![
            declaration("rename", MatcherConfig::Any),
            declaration("rename", MatcherConfig::None),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "duplicate plugin name `rename`"));
    }

    #[test]
    fn nested_invalid_regex_is_reported_with_path() {
        let mut config = SmeltConfig::default();
        config.plugins = vec![declaration(
            "broken",
            MatcherConfig::Or(vec![
                MatcherConfig::Any,
                MatcherConfig::NameMatches("com.(example".into()),
            ]),
        )];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "plugins[0].matcher[1]"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = SmeltConfig::default();
        config.engine.class_file_version = "x".to_string();
        config.logging.level = "x".to_string();
        config.plugins = vec![declaration("", MatcherConfig::And(Vec::new()))];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
