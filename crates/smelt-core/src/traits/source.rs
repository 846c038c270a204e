// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact sources and their elements.

use crate::error::SmeltError;
use crate::types::DynamicType;

/// One named, replaceable artifact slot.
///
/// `retain` and `replace` consume the element, so at most one of them runs.
pub trait Element {
    fn name(&self) -> &str;

    /// Keeps the slot unchanged.
    fn retain(self);

    /// Replaces the slot with a finalized artifact.
    fn replace(self, artifact: DynamicType) -> Result<(), SmeltError>;
}

/// An ordered, finite, one-shot sequence of elements owning its resources.
pub trait Source {
    type Element: Element;

    /// Yields the next element in container order.
    fn next_element(&mut self) -> Option<Result<Self::Element, SmeltError>>;

    /// Releases the underlying resources. Called exactly once by the engine.
    fn close(&mut self) -> Result<(), SmeltError>;
}
