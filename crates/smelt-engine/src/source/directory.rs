// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use smelt_core::{DynamicType, Element, SmeltError, Source};
use tracing::trace;

/// A source over the regular files of a directory tree.
///
/// Files are yielded in lexicographic order of their `/`-separated relative
/// names. Replacing an element overwrites the file in place.
#[derive(Debug)]
pub struct ForDirectory {
    root: PathBuf,
    pending: VecDeque<(String, PathBuf)>,
}

impl ForDirectory {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SmeltError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SmeltError::Source(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let mut files = Vec::new();
        walk(&root, &root, &mut files)?;
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self {
            root,
            pending: files.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<(String, PathBuf)>) -> Result<(), SmeltError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| SmeltError::io(format!("reading directory {}", dir.display()), e))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| SmeltError::io(format!("reading directory {}", dir.display()), e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| SmeltError::io(format!("inspecting {}", path.display()), e))?;
        if file_type.is_dir() {
            walk(root, &path, files)?;
        } else if file_type.is_file() {
            files.push((relative_name(root, &path), path));
        } else {
            trace!(path = %path.display(), "skipping non-regular file");
        }
    }
    Ok(())
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl Source for ForDirectory {
    type Element = DirectoryElement;

    fn next_element(&mut self) -> Option<Result<DirectoryElement, SmeltError>> {
        let (name, path) = self.pending.pop_front()?;
        Some(Ok(DirectoryElement { name, path }))
    }

    fn close(&mut self) -> Result<(), SmeltError> {
        self.pending.clear();
        Ok(())
    }
}

#[derive(Debug)]
pub struct DirectoryElement {
    name: String,
    path: PathBuf,
}

impl Element for DirectoryElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn retain(self) {}

    fn replace(self, artifact: DynamicType) -> Result<(), SmeltError> {
        fs::write(&self.path, artifact.bytes())
            .map_err(|e| SmeltError::io(format!("writing {}", self.path.display()), e))
    }
}
