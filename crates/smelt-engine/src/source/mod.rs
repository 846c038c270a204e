// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference [`Source`](smelt_core::Source) implementations.
//!
//! The engine knows no container format; these adapters cover tar archives,
//! directory trees, and in-memory maps.

mod archive;
mod directory;
mod memory;

pub use archive::{ArchiveElement, ArchiveLedger, Disposition, ForArchive, LedgerEntry};
pub use directory::{DirectoryElement, ForDirectory};
pub use memory::{InMemory, InMemoryElement, InMemoryStore};
