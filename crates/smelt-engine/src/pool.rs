// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type pool and class-file locator adapters.

use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use smelt_core::{ClassFileLocator, Resolution, TypeDescriptor, TypePool};

const CLASS_SUFFIX: &str = ".class";
const METADATA_PREFIX: &str = "META-INF/";

/// Resolves class-file entry names (`com/example/Foo.class`) to descriptors.
///
/// Leading `./` and `/` segments are ignored. Metadata entries, module and
/// package descriptors, and non-class files are unresolved.
#[derive(Debug, Clone, Default)]
pub struct ClassFileTypePool {
    skip_prefixes: Vec<String>,
}

impl ClassFileTypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Additional entry prefixes that are never resolved.
    pub fn with_skip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }
}

impl TypePool for ClassFileTypePool {
    fn describe(&self, name: &str) -> Resolution {
        let name = relative_entry_name(name);
        if name.starts_with(METADATA_PREFIX)
            || self.skip_prefixes.iter().any(|p| name.starts_with(p.as_str()))
        {
            return Resolution::Unresolved;
        }
        let Some(internal) = name.strip_suffix(CLASS_SUFFIX) else {
            return Resolution::Unresolved;
        };
        let simple = internal.rsplit('/').next().unwrap_or(internal);
        if simple.is_empty() || simple == "module-info" || simple == "package-info" {
            return Resolution::Unresolved;
        }
        Resolution::Resolved(TypeDescriptor::from_internal_name(internal))
    }
}

/// Strips the `./` and `/` prefixes archivers put in front of entry names.
fn relative_entry_name(mut name: &str) -> &str {
    loop {
        if let Some(rest) = name.strip_prefix("./") {
            name = rest;
        } else if let Some(rest) = name.strip_prefix('/') {
            name = rest;
        } else {
            return name;
        }
    }
}

/// Memoizes the resolutions of an inner pool.
///
/// Safe to share between threads; a name is resolved by the inner pool at
/// most once while no concurrent lookup races it.
#[derive(Debug)]
pub struct CachedTypePool<P> {
    inner: P,
    cache: DashMap<String, Resolution>,
}

impl<P: TypePool> CachedTypePool<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of memoized names.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<P: TypePool> TypePool for CachedTypePool<P> {
    fn describe(&self, name: &str) -> Resolution {
        if let Some(hit) = self.cache.get(name) {
            return hit.value().clone();
        }
        let resolution = self.inner.describe(name);
        self.cache
            .entry(name.to_string())
            .or_insert(resolution)
            .value()
            .clone()
    }
}

/// Locates class files below a directory using their entry names.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    root: PathBuf,
}

impl DirectoryLocator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ClassFileLocator for DirectoryLocator {
    fn locate(&self, type_name: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.root.join(TypeDescriptor::new(type_name).entry_name());
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
