// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smelt scan` command implementation.

use std::path::Path;

use smelt_config::SmeltConfig;
use smelt_core::{Element, Resolution, SmeltError, Source, TypePool};
use smelt_engine::{ClassFileTypePool, ForArchive};

use crate::output;

/// One archive entry and what the type pool made of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLine {
    pub entry: String,
    pub type_name: Option<String>,
}

/// Resolves every entry of `archive` with the configured skip prefixes.
pub fn scan_archive(config: &SmeltConfig, archive: &Path) -> Result<Vec<ScanLine>, SmeltError> {
    let pool =
        ClassFileTypePool::new().with_skip_prefixes(config.source.skip_prefixes.iter().cloned());
    let mut source = ForArchive::open(archive)?;
    let mut lines = Vec::new();
    while let Some(element) = source.next_element() {
        let element = element?;
        let type_name = match pool.describe(element.name()) {
            Resolution::Resolved(descriptor) => Some(descriptor.name().to_string()),
            Resolution::Unresolved => None,
        };
        lines.push(ScanLine {
            entry: element.name().to_string(),
            type_name,
        });
        element.retain();
    }
    source.close()?;
    Ok(lines)
}

/// Run the `smelt scan` command.
pub fn run_scan(config: &SmeltConfig, archive: &Path, color: bool) -> Result<(), SmeltError> {
    let lines = scan_archive(config, archive)?;
    println!("{}", output::heading(&format!("Entries of {}", archive.display()), color));

    let mut resolved = 0;
    for line in &lines {
        match &line.type_name {
            Some(type_name) => {
                resolved += 1;
                println!("  {} {type_name}", output::success("type", color));
            }
            None => println!("  {} {}", output::muted("skip", color), line.entry),
        }
    }
    println!("\n{resolved} of {} entries resolved", lines.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn scan_reports_resolution_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.tar");
        let mut builder = tar::Builder::new(File::create(&path).unwrap());
        for name in ["META-INF/MANIFEST.MF", "com/example/Foo.class", "shaded/Dep.class"] {
            let mut header = tar::Header::new_gnu();
            header.set_size(1);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, &b"x"[..]).unwrap();
        }
        builder.finish().unwrap();

        let config = smelt_config::load_and_validate_str(
            r#"
[source]
skip_prefixes = ["shaded/"]
"#,
        )
        .unwrap();
        let lines = scan_archive(&config, &path).unwrap();
        let types: Vec<Option<&str>> = lines.iter().map(|l| l.type_name.as_deref()).collect();
        assert_eq!(types, [None, Some("com.example.Foo"), None]);
    }
}
