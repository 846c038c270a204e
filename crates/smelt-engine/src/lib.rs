// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin-application engine for Smelt.
//!
//! The [`Engine`] walks a [`Source`](smelt_core::Source), resolves every
//! element through a type pool, folds the matching plugins over a builder
//! and commits or retains the element, reporting each outcome to a
//! listener. This crate also ships the reference sources (tar archive,
//! directory tree, in-memory), listeners, and type-pool adapters.

pub mod engine;
pub mod listener;
pub mod pool;
pub mod source;

pub use engine::{Engine, EngineBuilder, FailurePolicy, InitializerPolicy, RunReport};
pub use listener::{CompoundListener, PluginFailureRecord, SummaryListener, TracingListener};
pub use pool::{CachedTypePool, ClassFileTypePool, DirectoryLocator};
pub use source::{
    ArchiveLedger, Disposition, ForArchive, ForDirectory, InMemory, InMemoryStore, LedgerEntry,
};

use std::sync::{Mutex, MutexGuard};

/// Locks shared state, recovering it if a panicking plugin poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
