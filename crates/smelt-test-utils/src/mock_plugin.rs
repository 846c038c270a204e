// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock plugin with scripted behavior.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use smelt_core::{ClassFileLocator, Plugin, PluginError, TypeDescriptor};

use crate::mock_builder::RecordingBuilder;

/// What a [`MockPlugin`] does when applied.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Records its name on the builder.
    Record,
    /// Returns a plugin failure with the message.
    Fail(String),
    /// Panics with the message.
    Panic(String),
    /// Records its name and registers a live initializer.
    LiveInitializer(String),
}

/// A plugin matching either every type or a fixed set of names.
#[derive(Debug)]
pub struct MockPlugin {
    name: String,
    targets: Option<HashSet<String>>,
    behavior: MockBehavior,
    applications: AtomicUsize,
}

impl MockPlugin {
    pub fn matching_all(name: &str) -> Self {
        Self {
            name: name.to_string(),
            targets: None,
            behavior: MockBehavior::Record,
            applications: AtomicUsize::new(0),
        }
    }

    pub fn matching(name: &str, targets: &[&str]) -> Self {
        Self {
            targets: Some(targets.iter().map(|t| t.to_string()).collect()),
            ..Self::matching_all(name)
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn failing(self, message: &str) -> Self {
        self.with_behavior(MockBehavior::Fail(message.to_string()))
    }

    pub fn panicking(self, message: &str) -> Self {
        self.with_behavior(MockBehavior::Panic(message.to_string()))
    }

    /// Number of times `apply` was called.
    pub fn applications(&self) -> usize {
        self.applications.load(Ordering::SeqCst)
    }
}

impl Plugin<RecordingBuilder> for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, target: &TypeDescriptor) -> bool {
        self.targets
            .as_ref()
            .is_none_or(|targets| targets.contains(target.name()))
    }

    fn apply(
        &self,
        builder: RecordingBuilder,
        target: &TypeDescriptor,
        _locator: &dyn ClassFileLocator,
    ) -> Result<RecordingBuilder, PluginError> {
        self.applications.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(plugin = %self.name, target = %target, "mock plugin applied");
        match &self.behavior {
            MockBehavior::Record => Ok(builder.record(&self.name)),
            MockBehavior::Fail(message) => Err(PluginError::failed(&self.name, message)),
            MockBehavior::Panic(message) => panic!("{message}"),
            MockBehavior::LiveInitializer(description) => {
                Ok(builder.record(&self.name).with_live_initializer(description))
            }
        }
    }
}
