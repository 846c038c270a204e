// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin, builder, and entry-point traits.

use std::sync::Arc;

use crate::error::{PluginError, SmeltError};
use crate::traits::pool::ClassFileLocator;
use crate::types::{ClassFileVersion, DynamicType, TypeDescriptor};

/// Accumulator of pending transformations for one artifact.
///
/// The engine clones the builder before every plugin application so that a
/// failing plugin leaves the last good state in place; implementations
/// should make cloning cheap.
pub trait Builder: Clone + Send + 'static {
    /// Finalizes the accumulated transformations into an artifact.
    fn make(self) -> Result<DynamicType, SmeltError>;
}

/// A transformation applied to every type it matches.
pub trait Plugin<B: Builder>: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Pure predicate; may be called any number of times, in any order.
    fn matches(&self, target: &TypeDescriptor) -> bool;

    /// Registers this plugin's transformation on top of `builder`.
    ///
    /// The returned builder must keep every contribution already present.
    fn apply(
        &self,
        builder: B,
        target: &TypeDescriptor,
        locator: &dyn ClassFileLocator,
    ) -> Result<B, PluginError>;

    /// Members of a composite plugin, expanded in place when composing.
    fn members(&self) -> Option<&[Arc<dyn Plugin<B>>]> {
        None
    }

    /// Whether this plugin never matches and is dropped when composing.
    fn is_no_op(&self) -> bool {
        false
    }
}

/// Produces the initial builder for a resolved type.
pub trait EntryPoint<B: Builder>: Send + Sync {
    fn transform(
        &self,
        target: &TypeDescriptor,
        version: ClassFileVersion,
        locator: &dyn ClassFileLocator,
    ) -> Result<B, SmeltError>;
}

impl<B, F> EntryPoint<B> for F
where
    B: Builder,
    F: Fn(&TypeDescriptor, ClassFileVersion) -> B + Send + Sync,
{
    fn transform(
        &self,
        target: &TypeDescriptor,
        version: ClassFileVersion,
        _locator: &dyn ClassFileLocator,
    ) -> Result<B, SmeltError> {
        Ok(self(target, version))
    }
}
