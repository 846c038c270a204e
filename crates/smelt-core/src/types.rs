// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the engine, plugins, and sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SmeltError;

/// Resolved structural identity of an artifact.
///
/// Descriptors are compared and hashed by their binary name
/// (`com.example.Foo`), which is stable for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeDescriptor {
    name: String,
}

impl TypeDescriptor {
    /// Creates a descriptor from a binary name such as `com.example.Foo`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a descriptor from an internal name such as `com/example/Foo`.
    pub fn from_internal_name(internal: &str) -> Self {
        Self::new(internal.replace('/', "."))
    }

    /// The binary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package part of the name, `None` for the default package.
    pub fn package(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(package, _)| package)
    }

    /// The name without its package.
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(_, simple)| simple)
    }

    /// The `/`-separated internal name.
    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }

    /// The archive entry name a class file for this type is stored under.
    pub fn entry_name(&self) -> String {
        format!("{}.class", self.internal_name())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Result of resolving an element name to a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(TypeDescriptor),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Consumes the resolution, returning the descriptor if there is one.
    pub fn resolve(self) -> Option<TypeDescriptor> {
        match self {
            Resolution::Resolved(descriptor) => Some(descriptor),
            Resolution::Unresolved => None,
        }
    }
}

impl From<Option<TypeDescriptor>> for Resolution {
    fn from(descriptor: Option<TypeDescriptor>) -> Self {
        descriptor.map_or(Resolution::Unresolved, Resolution::Resolved)
    }
}

/// Target class-file format version of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassFileVersion {
    major: u16,
    minor: u16,
}

/// Major version of Java 1.1; later releases increment it by one.
const JAVA_1_MAJOR: u16 = 44;

impl ClassFileVersion {
    pub const JAVA_V5: Self = Self::new(49, 0);
    pub const JAVA_V6: Self = Self::new(50, 0);
    pub const JAVA_V7: Self = Self::new(51, 0);
    pub const JAVA_V8: Self = Self::new(52, 0);
    pub const JAVA_V11: Self = Self::new(55, 0);
    pub const JAVA_V17: Self = Self::new(61, 0);
    pub const JAVA_V21: Self = Self::new(65, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Version for a Java release number (`8`, `17`, ...).
    pub fn of_java(release: u16) -> Result<Self, SmeltError> {
        if release == 0 || release > 99 {
            return Err(SmeltError::Config(format!(
                "unsupported Java release {release}"
            )));
        }
        Ok(Self::new(JAVA_1_MAJOR + release, 0))
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// The Java release this version corresponds to.
    pub fn java_release(&self) -> u16 {
        self.major.saturating_sub(JAVA_1_MAJOR)
    }
}

impl FromStr for ClassFileVersion {
    type Err = SmeltError;

    /// Parses `"8"`, `"1.8"` (legacy release notation) or `"52.0"` (major.minor).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SmeltError::Config(format!("invalid class file version `{s}`"));
        let s = s.trim();
        match s.split_once('.') {
            None => Self::of_java(s.parse().map_err(|_| invalid())?),
            Some(("1", release)) => Self::of_java(release.parse().map_err(|_| invalid())?),
            Some((major, minor)) => {
                let major: u16 = major.parse().map_err(|_| invalid())?;
                let minor: u16 = minor.parse().map_err(|_| invalid())?;
                if major <= JAVA_1_MAJOR {
                    return Err(invalid());
                }
                Ok(Self::new(major, minor))
            }
        }
    }
}

impl fmt::Display for ClassFileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Java {} ({}.{})",
            self.java_release(),
            self.major,
            self.minor
        )
    }
}

/// Load-time initializer attached to a finalized artifact.
///
/// An alive initializer requires executing code when the type is loaded,
/// which a build-time transformation cannot trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedInitializer {
    alive: bool,
    description: String,
}

impl LoadedInitializer {
    /// An initializer with nothing to run.
    pub fn dormant() -> Self {
        Self {
            alive: false,
            description: "no-op".to_string(),
        }
    }

    /// An initializer that must run when the type is loaded.
    pub fn live(description: impl Into<String>) -> Self {
        Self {
            alive: true,
            description: description.into(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A finalized artifact produced by making a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicType {
    descriptor: TypeDescriptor,
    bytes: Vec<u8>,
    initializers: Vec<(TypeDescriptor, LoadedInitializer)>,
}

impl DynamicType {
    /// Creates an artifact whose own initializer is dormant.
    pub fn new(descriptor: TypeDescriptor, bytes: Vec<u8>) -> Self {
        let initializers = vec![(descriptor.clone(), LoadedInitializer::dormant())];
        Self {
            descriptor,
            bytes,
            initializers,
        }
    }

    /// Sets the initializer for `target`, replacing any existing one.
    pub fn with_initializer(mut self, target: TypeDescriptor, initializer: LoadedInitializer) -> Self {
        match self.initializers.iter_mut().find(|(t, _)| *t == target) {
            Some(entry) => entry.1 = initializer,
            None => self.initializers.push((target, initializer)),
        }
        self
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Initializers of the artifact and every auxiliary type it carries.
    pub fn loaded_initializers(&self) -> &[(TypeDescriptor, LoadedInitializer)] {
        &self.initializers
    }

    /// The first alive initializer, if any.
    pub fn live_initializer(&self) -> Option<&(TypeDescriptor, LoadedInitializer)> {
        self.initializers.iter().find(|(_, init)| init.is_alive())
    }
}

/// Per-element outcome reported to listeners and tallied per run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Ignored,
    Failed,
    Unresolved,
}
