// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer of per-element outcomes.

use crate::error::PluginError;
use crate::types::TypeDescriptor;

/// Receives exactly one outcome notification per element, in source order.
///
/// `on_plugin_failure` is additionally invoked once per failing plugin
/// before the aggregate `on_failure`. Listeners cannot influence the run.
pub trait Listener {
    fn on_success(&self, _target: &TypeDescriptor) {}

    fn on_ignore(&self, _target: &TypeDescriptor) {}

    fn on_plugin_failure(&self, _target: &TypeDescriptor, _error: &PluginError) {}

    fn on_failure(&self, _target: &TypeDescriptor) {}

    fn on_unresolved(&self, _name: &str) {}
}

/// A listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl Listener for NoOpListener {}

/// Shared no-op listener used when a run is started without one.
pub static NO_OP_LISTENER: NoOpListener = NoOpListener;
