// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Smelt plugin engine.
//!
//! This crate provides the data model, error types, and the collaborator
//! traits (plugins, builders, entry points, type pools, sources, listeners)
//! used throughout the Smelt workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{PluginError, SmeltError};
pub use types::{
    ClassFileVersion, DynamicType, LoadedInitializer, Outcome, Resolution, TypeDescriptor,
};

pub use traits::{
    Builder, ClassFileLocator, Element, EntryPoint, Listener, NoOpListener, NoOpLocator, Plugin,
    Source, TypePool, NO_OP_LISTENER,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct NameBuilder(String);

    impl Builder for NameBuilder {
        fn make(self) -> Result<DynamicType, SmeltError> {
            Ok(DynamicType::new(TypeDescriptor::new(self.0), Vec::new()))
        }
    }

    #[test]
    fn closures_act_as_entry_points() {
        let entry = |target: &TypeDescriptor, _: ClassFileVersion| NameBuilder(target.name().into());
        let builder = entry
            .transform(&TypeDescriptor::new("Foo"), ClassFileVersion::JAVA_V8, &NoOpLocator)
            .unwrap();
        assert_eq!(builder.make().unwrap().descriptor().name(), "Foo");
    }

    #[test]
    fn closures_act_as_type_pools() {
        let pool = |name: &str| -> Resolution {
            if name == "Foo" {
                Resolution::Resolved(TypeDescriptor::new("Foo"))
            } else {
                Resolution::Unresolved
            }
        };
        assert!(pool.describe("Foo").is_resolved());
        assert!(!pool.describe("Bar").is_resolved());
    }

    #[test]
    fn no_op_locator_finds_nothing() {
        assert!(NoOpLocator.locate("java.lang.Object").unwrap().is_none());
    }

    #[test]
    fn no_op_listener_accepts_all_notifications() {
        let target = TypeDescriptor::new("Foo");
        let listener: &dyn Listener = &NO_OP_LISTENER;
        listener.on_success(&target);
        listener.on_ignore(&target);
        listener.on_plugin_failure(&target, &PluginError::NonOperational);
        listener.on_failure(&target);
        listener.on_unresolved("Bar");
    }
}
