// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry.
//!
//! The `PluginRegistry` stores `PluginEntry` records in registration order,
//! indexed by name. Each entry holds a manifest, a status and an optional
//! factory that builds the plugin instance when a compound is assembled.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smelt_core::{Builder, Plugin, SmeltError};
use tracing::{debug, info};

use crate::compound::Compound;
use crate::manifest::PluginManifest;

/// Status of a plugin in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginStatus {
    /// Plugin takes part in assembled compounds.
    Enabled,
    /// Plugin is explicitly disabled by user.
    Disabled,
    /// Plugin is declared but its manifest could not be loaded.
    NotConfigured,
}

impl fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginStatus::Enabled => write!(f, "enabled"),
            PluginStatus::Disabled => write!(f, "disabled"),
            PluginStatus::NotConfigured => write!(f, "not-configured"),
        }
    }
}

/// Creates plugin instances from manifests.
///
/// Factories are optional: the registry can hold manifests without one for
/// listing purposes, but such plugins cannot be assembled.
pub trait PluginFactory<B: Builder>: Send + Sync {
    fn create(&self, manifest: &PluginManifest) -> Result<Arc<dyn Plugin<B>>, SmeltError>;
}

/// A single entry in the plugin registry.
pub struct PluginEntry<B: Builder> {
    pub manifest: PluginManifest,
    pub status: PluginStatus,
    pub factory: Option<Arc<dyn PluginFactory<B>>>,
}

impl<B: Builder> fmt::Debug for PluginEntry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("manifest", &self.manifest)
            .field("status", &self.status)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// Registry of named plugins for one builder type.
pub struct PluginRegistry<B: Builder> {
    entries: Vec<PluginEntry<B>>,
    index: HashMap<String, usize>,
}

impl<B: Builder> PluginRegistry<B> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a plugin with default status `Enabled`.
    pub fn register(
        &mut self,
        manifest: PluginManifest,
        factory: Option<Arc<dyn PluginFactory<B>>>,
    ) {
        self.register_with_status(manifest, factory, PluginStatus::Enabled);
    }

    /// Register a plugin with an explicit status.
    ///
    /// Re-registering a name replaces the entry but keeps its position.
    pub fn register_with_status(
        &mut self,
        manifest: PluginManifest,
        factory: Option<Arc<dyn PluginFactory<B>>>,
        status: PluginStatus,
    ) {
        let entry = PluginEntry {
            manifest,
            status,
            factory,
        };
        match self.index.get(&entry.manifest.name) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index
                    .insert(entry.manifest.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Get a plugin entry by name.
    pub fn get(&self, name: &str) -> Option<&PluginEntry<B>> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// List all plugin entries, sorted by name.
    pub fn list_all(&self) -> Vec<&PluginEntry<B>> {
        let mut entries: Vec<&PluginEntry<B>> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
        entries
    }

    /// Assembles the named plugins, in the given order, into one compound.
    ///
    /// Unknown names and enabled plugins without a factory are configuration
    /// errors; plugins that are not enabled are skipped.
    pub fn assemble<S: AsRef<str>>(&self, names: &[S]) -> Result<Compound<B>, SmeltError> {
        let mut plugins = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let entry = self
                .get(name)
                .ok_or_else(|| SmeltError::Config(format!("unknown plugin `{name}`")))?;
            if let Some(plugin) = Self::instantiate(entry)? {
                plugins.push(plugin);
            }
        }
        Ok(Compound::new(plugins))
    }

    /// Assembles every registered plugin in registration order.
    pub fn assemble_all(&self) -> Result<Compound<B>, SmeltError> {
        let mut plugins = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if let Some(plugin) = Self::instantiate(entry)? {
                plugins.push(plugin);
            }
        }
        Ok(Compound::new(plugins))
    }

    fn instantiate(entry: &PluginEntry<B>) -> Result<Option<Arc<dyn Plugin<B>>>, SmeltError> {
        let name = &entry.manifest.name;
        if entry.status != PluginStatus::Enabled {
            info!(plugin = %name, status = %entry.status, "skipping plugin");
            return Ok(None);
        }
        let factory = entry
            .factory
            .as_ref()
            .ok_or_else(|| SmeltError::Config(format!("plugin `{name}` has no factory")))?;
        let plugin = factory.create(&entry.manifest)?;
        debug!(plugin = %name, "plugin instantiated");
        Ok(Some(plugin))
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: Builder> Default for PluginRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}
