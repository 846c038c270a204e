// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type resolution and class-file lookup.

use crate::types::Resolution;

/// Resolves element names to type descriptors.
///
/// Resolution must be referentially stable for a given name within one run.
pub trait TypePool: Send + Sync {
    fn describe(&self, name: &str) -> Resolution;
}

impl<F> TypePool for F
where
    F: Fn(&str) -> Resolution + Send + Sync,
{
    fn describe(&self, name: &str) -> Resolution {
        self(name)
    }
}

/// Locates the class file of other types in the scope of the run.
pub trait ClassFileLocator: Send + Sync {
    /// Returns the class file bytes for a binary type name, `None` when unknown.
    fn locate(&self, type_name: &str) -> std::io::Result<Option<Vec<u8>>>;
}

/// A locator that knows no types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLocator;

impl ClassFileLocator for NoOpLocator {
    fn locate(&self, _type_name: &str) -> std::io::Result<Option<Vec<u8>>> {
        Ok(None)
    }
}
