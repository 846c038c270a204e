// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock source and type pool.
//!
//! `MockSource` yields named elements and records every interaction in a
//! shared [`SourceLog`] that stays readable after the source is consumed.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use smelt_core::{DynamicType, Element, Resolution, SmeltError, Source, TypeDescriptor, TypePool};

/// Interactions observed by a [`MockSource`].
#[derive(Debug, Default)]
pub struct SourceLog {
    pub yielded: Vec<String>,
    pub retained: Vec<String>,
    pub replaced: Vec<(String, DynamicType)>,
    pub close_count: usize,
}

impl SourceLog {
    pub fn replaced_names(&self) -> Vec<String> {
        self.replaced.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn replacement(&self, name: &str) -> Option<&DynamicType> {
        self.replaced
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, artifact)| artifact)
    }
}

fn lock(log: &Mutex<SourceLog>) -> MutexGuard<'_, SourceLog> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct MockSource {
    pending: VecDeque<String>,
    log: Arc<Mutex<SourceLog>>,
    broken_at: Option<String>,
    failing_replace: HashSet<String>,
    failing_close: bool,
}

impl MockSource {
    pub fn new(names: &[&str]) -> Self {
        Self {
            pending: names.iter().map(|n| n.to_string()).collect(),
            log: Arc::new(Mutex::new(SourceLog::default())),
            broken_at: None,
            failing_replace: HashSet::new(),
            failing_close: false,
        }
    }

    /// Yields a `SmeltError::Source` instead of the named element.
    pub fn broken_at(mut self, name: &str) -> Self {
        self.broken_at = Some(name.to_string());
        self
    }

    /// Makes `replace` fail with an I/O error for the named element.
    pub fn failing_replace(mut self, name: &str) -> Self {
        self.failing_replace.insert(name.to_string());
        self
    }

    /// Makes `close` fail after recording the call.
    pub fn failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    /// Handle to the interaction log.
    pub fn log(&self) -> Arc<Mutex<SourceLog>> {
        Arc::clone(&self.log)
    }

    /// Locks a log handle obtained from [`MockSource::log`].
    pub fn read(log: &Arc<Mutex<SourceLog>>) -> MutexGuard<'_, SourceLog> {
        lock(log)
    }
}

impl Source for MockSource {
    type Element = MockElement;

    fn next_element(&mut self) -> Option<Result<MockElement, SmeltError>> {
        let name = self.pending.pop_front()?;
        if self.broken_at.as_deref() == Some(name.as_str()) {
            return Some(Err(SmeltError::Source(format!("unreadable entry {name}"))));
        }
        lock(&self.log).yielded.push(name.clone());
        Some(Ok(MockElement {
            fail_replace: self.failing_replace.contains(&name),
            name,
            log: Arc::clone(&self.log),
        }))
    }

    fn close(&mut self) -> Result<(), SmeltError> {
        lock(&self.log).close_count += 1;
        if self.failing_close {
            return Err(SmeltError::io(
                "closing mock source",
                std::io::Error::other("close failed"),
            ));
        }
        Ok(())
    }
}

pub struct MockElement {
    name: String,
    log: Arc<Mutex<SourceLog>>,
    fail_replace: bool,
}

impl Element for MockElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn retain(self) {
        lock(&self.log).retained.push(self.name);
    }

    fn replace(self, artifact: DynamicType) -> Result<(), SmeltError> {
        if self.fail_replace {
            return Err(SmeltError::io(
                format!("replacing {}", self.name),
                std::io::Error::other("replace failed"),
            ));
        }
        lock(&self.log).replaced.push((self.name, artifact));
        Ok(())
    }
}

/// Resolves a fixed set of names; everything else is unresolved.
#[derive(Debug, Clone, Default)]
pub struct StaticTypePool {
    known: HashSet<String>,
}

impl StaticTypePool {
    pub fn new(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl TypePool for StaticTypePool {
    fn describe(&self, name: &str) -> Resolution {
        if self.known.contains(name) {
            Resolution::Resolved(TypeDescriptor::new(name))
        } else {
            Resolution::Unresolved
        }
    }
}
