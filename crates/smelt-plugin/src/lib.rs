// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin composition, matchers, manifests, and registry.
//!
//! Plugins are composed through [`Compound::new`], which flattens nested
//! compounds and drops [`NoOp`] members. Declarative plugins pair an
//! [`ElementMatcher`] with a closure; the [`PluginRegistry`] assembles named
//! plugins from their manifests into one ordered compound.

pub mod compound;
pub mod manifest;
pub mod matcher;
pub mod registry;

pub use compound::{Compound, ForElementMatcher, NoOp};
pub use manifest::{load_plugin_manifest, parse_plugin_manifest, PluginManifest};
pub use matcher::ElementMatcher;
pub use registry::{PluginEntry, PluginFactory, PluginRegistry, PluginStatus};
