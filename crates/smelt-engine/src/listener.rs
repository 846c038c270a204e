// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listener implementations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use smelt_core::{Listener, PluginError, TypeDescriptor};
use tracing::{debug, info, warn};

use crate::engine::RunReport;
use crate::lock;

/// Logs every notification as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn on_success(&self, target: &TypeDescriptor) {
        info!(target_type = %target, "transformed");
    }

    fn on_ignore(&self, target: &TypeDescriptor) {
        debug!(target_type = %target, "ignored");
    }

    fn on_plugin_failure(&self, target: &TypeDescriptor, error: &PluginError) {
        warn!(target_type = %target, plugin = error.plugin().unwrap_or("unknown"), error = %error, "plugin failure");
    }

    fn on_failure(&self, target: &TypeDescriptor) {
        warn!(target_type = %target, "failed");
    }

    fn on_unresolved(&self, name: &str) {
        debug!(element = %name, "unresolved");
    }
}

/// Forwards every notification to its members, in order.
#[derive(Default)]
pub struct CompoundListener<'a> {
    listeners: Vec<&'a dyn Listener>,
}

impl<'a> CompoundListener<'a> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn with(mut self, listener: &'a dyn Listener) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Listener for CompoundListener<'_> {
    fn on_success(&self, target: &TypeDescriptor) {
        self.listeners.iter().for_each(|l| l.on_success(target));
    }

    fn on_ignore(&self, target: &TypeDescriptor) {
        self.listeners.iter().for_each(|l| l.on_ignore(target));
    }

    fn on_plugin_failure(&self, target: &TypeDescriptor, error: &PluginError) {
        self.listeners
            .iter()
            .for_each(|l| l.on_plugin_failure(target, error));
    }

    fn on_failure(&self, target: &TypeDescriptor) {
        self.listeners.iter().for_each(|l| l.on_failure(target));
    }

    fn on_unresolved(&self, name: &str) {
        self.listeners.iter().for_each(|l| l.on_unresolved(name));
    }
}

/// One per-plugin failure remembered by [`SummaryListener`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginFailureRecord {
    pub target: String,
    pub plugin: Option<String>,
    pub message: String,
}

/// Counts outcomes and remembers per-plugin failures.
#[derive(Debug, Default)]
pub struct SummaryListener {
    transformed: AtomicUsize,
    ignored: AtomicUsize,
    failed: AtomicUsize,
    unresolved: AtomicUsize,
    failures: Mutex<Vec<PluginFailureRecord>>,
}

impl SummaryListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome counts observed so far.
    pub fn report(&self) -> RunReport {
        RunReport {
            transformed: self.transformed.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
        }
    }

    pub fn plugin_failures(&self) -> Vec<PluginFailureRecord> {
        lock(&self.failures).clone()
    }
}

impl Listener for SummaryListener {
    fn on_success(&self, _target: &TypeDescriptor) {
        self.transformed.fetch_add(1, Ordering::Relaxed);
    }

    fn on_ignore(&self, _target: &TypeDescriptor) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    fn on_plugin_failure(&self, target: &TypeDescriptor, error: &PluginError) {
        lock(&self.failures).push(PluginFailureRecord {
            target: target.name().to_string(),
            plugin: error.plugin().map(str::to_string),
            message: error.to_string(),
        });
    }

    fn on_failure(&self, _target: &TypeDescriptor) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn on_unresolved(&self, _name: &str) {
        self.unresolved.fetch_add(1, Ordering::Relaxed);
    }
}
