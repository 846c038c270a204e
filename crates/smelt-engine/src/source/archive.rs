// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use smelt_core::{DynamicType, Element, SmeltError, Source};
use tracing::{debug, trace};

use crate::lock;

/// What happened to one archive entry during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Not yet visited by the engine.
    Pending,
    /// Kept unchanged.
    Retained,
    /// Superseded by a made artifact.
    Replaced(DynamicType),
}

/// One regular-file entry of an archive.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    /// Entry path as stored in the archive.
    pub name: String,
    /// Bytes read when the archive was opened.
    pub original: Vec<u8>,
    /// What the engine did with the entry.
    pub disposition: Disposition,
}

impl LedgerEntry {
    /// Bytes the entry carries after the run.
    pub fn bytes(&self) -> &[u8] {
        match &self.disposition {
            Disposition::Replaced(artifact) => artifact.bytes(),
            Disposition::Pending | Disposition::Retained => &self.original,
        }
    }
}

/// Dispositions of every regular-file entry of a [`ForArchive`] source.
///
/// The archive itself is never rewritten by the engine; the assembly step
/// reads the ledger, or writes a new archive from it with [`write_to`].
///
/// [`write_to`]: ArchiveLedger::write_to
#[derive(Debug, Clone, Default)]
pub struct ArchiveLedger {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
}

impl ArchiveLedger {
    /// Snapshot of every entry in archive order.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        lock(&self.entries).clone()
    }

    pub fn disposition(&self, name: &str) -> Option<Disposition> {
        lock(&self.entries)
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.disposition.clone())
    }

    pub fn retained(&self) -> Vec<String> {
        self.names_where(|d| matches!(d, Disposition::Retained))
    }

    pub fn replaced(&self) -> Vec<String> {
        self.names_where(|d| matches!(d, Disposition::Replaced(_)))
    }

    fn names_where(&self, predicate: impl Fn(&Disposition) -> bool) -> Vec<String> {
        lock(&self.entries)
            .iter()
            .filter(|e| predicate(&e.disposition))
            .map(|e| e.name.clone())
            .collect()
    }

    fn set(&self, index: usize, disposition: Disposition) {
        if let Some(entry) = lock(&self.entries).get_mut(index) {
            entry.disposition = disposition;
        }
    }

    /// Writes a tar archive holding every entry in its original order, with
    /// replaced entries carrying their new bytes.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<W, SmeltError> {
        let mut builder = tar::Builder::new(writer);
        for entry in lock(&self.entries).iter() {
            let bytes = entry.bytes();
            let mut header = tar::Header::new_gnu();
            header.set_size(bytes.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, &entry.name, bytes)
                .map_err(|e| SmeltError::io(format!("writing archive entry {}", entry.name), e))?;
        }
        builder
            .into_inner()
            .map_err(|e| SmeltError::io("finishing archive", e))
    }
}

/// A source over the regular-file entries of a tar archive.
///
/// Entries are read when the source is opened and yielded in container
/// order; directories, links and other special entries are skipped.
#[derive(Debug)]
pub struct ForArchive {
    ledger: ArchiveLedger,
    cursor: usize,
}

impl ForArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SmeltError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| SmeltError::io(format!("opening archive {}", path.display()), e))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SmeltError> {
        let mut archive = tar::Archive::new(reader);
        let mut entries = Vec::new();
        let iter = archive
            .entries()
            .map_err(|e| SmeltError::Source(format!("unreadable tar archive: {e}")))?;
        for entry in iter {
            let mut entry =
                entry.map_err(|e| SmeltError::Source(format!("unreadable tar entry: {e}")))?;
            let name = entry
                .path()
                .map_err(|e| SmeltError::Source(format!("invalid tar entry path: {e}")))?
                .to_string_lossy()
                .into_owned();
            if !entry.header().entry_type().is_file() {
                trace!(entry = %name, "skipping non-regular entry");
                continue;
            }
            let mut original = Vec::new();
            entry
                .read_to_end(&mut original)
                .map_err(|e| SmeltError::io(format!("reading archive entry {name}"), e))?;
            entries.push(LedgerEntry {
                name,
                original,
                disposition: Disposition::Pending,
            });
        }
        debug!(entries = entries.len(), "archive opened");
        Ok(Self {
            ledger: ArchiveLedger {
                entries: Arc::new(Mutex::new(entries)),
            },
            cursor: 0,
        })
    }

    /// Handle to the dispositions recorded during a run.
    pub fn ledger(&self) -> ArchiveLedger {
        self.ledger.clone()
    }
}

impl Source for ForArchive {
    type Element = ArchiveElement;

    fn next_element(&mut self) -> Option<Result<ArchiveElement, SmeltError>> {
        let name = lock(&self.ledger.entries).get(self.cursor)?.name.clone();
        let index = self.cursor;
        self.cursor += 1;
        Some(Ok(ArchiveElement {
            index,
            name,
            ledger: self.ledger.clone(),
        }))
    }

    fn close(&mut self) -> Result<(), SmeltError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct ArchiveElement {
    index: usize,
    name: String,
    ledger: ArchiveLedger,
}

impl Element for ArchiveElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn retain(self) {
        self.ledger.set(self.index, Disposition::Retained);
    }

    fn replace(self, artifact: DynamicType) -> Result<(), SmeltError> {
        self.ledger.set(self.index, Disposition::Replaced(artifact));
        Ok(())
    }
}
