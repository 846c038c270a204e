// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the engine.
//!
//! The engine owns none of these: plugins, entry points, type pools, sources
//! and listeners are all injected by the embedder.

pub mod listener;
pub mod plugin;
pub mod pool;
pub mod source;

pub use listener::{Listener, NoOpListener, NO_OP_LISTENER};
pub use plugin::{Builder, EntryPoint, Plugin};
pub use pool::{ClassFileLocator, NoOpLocator, TypePool};
pub use source::{Element, Source};
