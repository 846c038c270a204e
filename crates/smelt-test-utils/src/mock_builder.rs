// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording builder for deterministic engine tests.
//!
//! The made artifact's bytes are the applied plugin names, one per line, so
//! tests can assert which contributions were committed and in which order.

use smelt_core::{
    Builder, ClassFileVersion, DynamicType, LoadedInitializer, SmeltError, TypeDescriptor,
};

#[derive(Debug, Clone)]
pub struct RecordingBuilder {
    target: TypeDescriptor,
    version: ClassFileVersion,
    applied: Vec<String>,
    live_initializers: Vec<String>,
    make_failure: Option<String>,
}

impl RecordingBuilder {
    pub fn new(target: TypeDescriptor, version: ClassFileVersion) -> Self {
        Self {
            target,
            version,
            applied: Vec::new(),
            live_initializers: Vec::new(),
            make_failure: None,
        }
    }

    /// Entry point usable directly with the engine builder.
    pub fn entry_point(target: &TypeDescriptor, version: ClassFileVersion) -> Self {
        Self::new(target.clone(), version)
    }

    /// Records a contribution by `plugin`.
    pub fn record(mut self, plugin: &str) -> Self {
        self.applied.push(plugin.to_string());
        self
    }

    /// Registers a live initializer on the made artifact.
    pub fn with_live_initializer(mut self, description: &str) -> Self {
        self.live_initializers.push(description.to_string());
        self
    }

    /// Makes `make` fail with the given message.
    pub fn failing_make(mut self, message: &str) -> Self {
        self.make_failure = Some(message.to_string());
        self
    }

    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    pub fn version(&self) -> ClassFileVersion {
        self.version
    }

    /// Decodes the contributions recorded in a made artifact.
    pub fn contributions(artifact: &DynamicType) -> Vec<String> {
        String::from_utf8_lossy(artifact.bytes())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Builder for RecordingBuilder {
    fn make(self) -> Result<DynamicType, SmeltError> {
        if let Some(message) = self.make_failure {
            return Err(SmeltError::Make {
                type_name: self.target.name().to_string(),
                message,
            });
        }
        let bytes = self.applied.join("\n").into_bytes();
        let mut artifact = DynamicType::new(self.target.clone(), bytes);
        for (index, description) in self.live_initializers.into_iter().enumerate() {
            let auxiliary = TypeDescriptor::new(format!("{}$Initializer{index}", self.target.name()));
            artifact = artifact.with_initializer(auxiliary, LoadedInitializer::live(description));
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn made_artifact_lists_contributions_in_order() {
        let builder = RecordingBuilder::entry_point(&TypeDescriptor::new("Foo"), ClassFileVersion::JAVA_V8)
            .record("p1")
            .record("p2");
        let artifact = builder.make().unwrap();
        assert_eq!(RecordingBuilder::contributions(&artifact), ["p1", "p2"]);
        assert!(artifact.live_initializer().is_none());
    }

    #[test]
    fn live_initializers_are_carried_by_auxiliary_types() {
        let artifact = RecordingBuilder::new(TypeDescriptor::new("Foo"), ClassFileVersion::JAVA_V8)
            .with_live_initializer("register agent")
            .make()
            .unwrap();
        let (target, init) = artifact.live_initializer().unwrap();
        assert_eq!(target.name(), "Foo$Initializer0");
        assert_eq!(init.description(), "register agent");
    }

    #[test]
    fn failing_make_reports_type() {
        let err = RecordingBuilder::new(TypeDescriptor::new("Foo"), ClassFileVersion::JAVA_V8)
            .failing_make("broken")
            .make()
            .unwrap_err();
        assert!(matches!(err, SmeltError::Make { ref type_name, .. } if type_name == "Foo"));
    }
}
