// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Smelt integration tests.
//!
//! Provides recording collaborators for fast, deterministic tests of the
//! engine without real class files or archives.
//!
//! # Components
//!
//! - [`RecordingBuilder`] - Builder whose artifact lists the plugins applied to it
//! - [`MockPlugin`] - Plugin with a scripted behavior and an application counter
//! - [`RecordingListener`] - Listener capturing every notification in order
//! - [`MockSource`] - Source over named elements with an inspectable log
//! - [`StaticTypePool`] - Type pool resolving a fixed set of names

pub mod mock_builder;
pub mod mock_listener;
pub mod mock_plugin;
pub mod mock_source;

pub use mock_builder::RecordingBuilder;
pub use mock_listener::{ListenerEvent, RecordingListener};
pub use mock_plugin::{MockBehavior, MockPlugin};
pub use mock_source::{MockElement, MockSource, SourceLog, StaticTypePool};
