// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listener capturing every notification for assertions.

use std::sync::Mutex;

use smelt_core::{Listener, PluginError, TypeDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    Success(String),
    Ignored(String),
    PluginFailure { target: String, plugin: Option<String> },
    Failure(String),
    Unresolved(String),
}

#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ListenerEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notifications received so far, in order.
    pub fn events(&self) -> Vec<ListenerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: ListenerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Listener for RecordingListener {
    fn on_success(&self, target: &TypeDescriptor) {
        self.push(ListenerEvent::Success(target.name().to_string()));
    }

    fn on_ignore(&self, target: &TypeDescriptor) {
        self.push(ListenerEvent::Ignored(target.name().to_string()));
    }

    fn on_plugin_failure(&self, target: &TypeDescriptor, error: &PluginError) {
        self.push(ListenerEvent::PluginFailure {
            target: target.name().to_string(),
            plugin: error.plugin().map(str::to_string),
        });
    }

    fn on_failure(&self, target: &TypeDescriptor) {
        self.push(ListenerEvent::Failure(target.name().to_string()));
    }

    fn on_unresolved(&self, name: &str) {
        self.push(ListenerEvent::Unresolved(name.to_string()));
    }
}
