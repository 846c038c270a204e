// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Smelt plugin engine.

use thiserror::Error;

/// The primary error type returned by engine runs and collaborator calls.
///
/// Every variant except [`SmeltError::Config`] aborts an engine run; per-artifact
/// plugin failures are only surfaced here when fail-fast is enabled.
#[derive(Debug, Error)]
pub enum SmeltError {
    /// Configuration errors (missing engine settings, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while reading a source or writing back an element.
    #[error("i/o error while {context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// A plugin failed while fail-fast was enabled.
    #[error("plugin failure on {type_name}: {source}")]
    Plugin {
        type_name: String,
        source: PluginError,
    },

    /// A finalized artifact carries a live load-time initializer that policy forbids.
    #[error("cannot apply live initializer for {type_name}: {initializer}")]
    LiveInitializer {
        type_name: String,
        initializer: String,
    },

    /// The accumulated builder could not be finalized into an artifact.
    #[error("failed to make {type_name}: {message}")]
    Make { type_name: String, message: String },

    /// The underlying container is malformed.
    #[error("malformed source: {0}")]
    Source(String),
}

impl SmeltError {
    /// Wraps an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SmeltError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Failure raised by a single plugin's `apply`.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin reported a failure.
    #[error("plugin `{plugin}` failed: {message}")]
    Failed {
        plugin: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The plugin panicked; the panic was contained by the engine.
    #[error("plugin `{plugin}` panicked: {message}")]
    Panicked { plugin: String, message: String },

    /// A non-operational plugin was applied.
    #[error("cannot apply non-operational plugin")]
    NonOperational,
}

impl PluginError {
    /// Creates a [`PluginError::Failed`] without an underlying cause.
    pub fn failed(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        PluginError::Failed {
            plugin: plugin.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a [`PluginError::Failed`] wrapping the error that caused it.
    pub fn caused_by<E>(plugin: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PluginError::Failed {
            plugin: plugin.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Name of the plugin that failed, when known.
    pub fn plugin(&self) -> Option<&str> {
        match self {
            PluginError::Failed { plugin, .. } | PluginError::Panicked { plugin, .. } => {
                Some(plugin)
            }
            PluginError::NonOperational => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_error_keeps_context_and_source() {
        let err = SmeltError::io(
            "replacing com/example/Foo.class",
            std::io::Error::other("disk full"),
        );
        assert_eq!(
            err.to_string(),
            "i/o error while replacing com/example/Foo.class: disk full"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn plugin_error_exposes_plugin_name() {
        assert_eq!(PluginError::failed("rename", "boom").plugin(), Some("rename"));
        let panicked = PluginError::Panicked {
            plugin: "logger".into(),
            message: "index out of bounds".into(),
        };
        assert_eq!(panicked.plugin(), Some("logger"));
        assert_eq!(PluginError::NonOperational.plugin(), None);
    }

    #[test]
    fn caused_by_chains_source() {
        let err = PluginError::caused_by("rename", std::io::Error::other("missing method"));
        assert_eq!(err.to_string(), "plugin `rename` failed: missing method");
        assert!(err.source().is_some());
    }

    #[test]
    fn fail_fast_error_wraps_plugin_error() {
        let err = SmeltError::Plugin {
            type_name: "com.example.Qux".into(),
            source: PluginError::failed("p2", "unsupported"),
        };
        assert!(err.to_string().starts_with("plugin failure on com.example.Qux"));
        assert!(err.source().is_some());
    }
}
