// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::{Arc, Mutex};

use smelt_core::{DynamicType, Element, SmeltError, Source};

use crate::lock;

#[derive(Debug, Clone)]
struct StoredEntry {
    name: String,
    bytes: Vec<u8>,
    replaced: bool,
}

/// Shared view of an [`InMemory`] source's contents, readable after a run.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<Vec<StoredEntry>>>,
}

impl InMemoryStore {
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        lock(&self.entries)
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.bytes.clone())
    }

    /// Entry names in source order.
    pub fn names(&self) -> Vec<String> {
        lock(&self.entries).iter().map(|e| e.name.clone()).collect()
    }

    /// Names of the entries whose bytes were replaced.
    pub fn replaced(&self) -> Vec<String> {
        lock(&self.entries)
            .iter()
            .filter(|e| e.replaced)
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

/// A source over ordered `(name, bytes)` pairs held in memory.
#[derive(Debug)]
pub struct InMemory {
    store: InMemoryStore,
    cursor: usize,
}

impl InMemory {
    pub fn new<I, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<u8>)>,
        N: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, bytes)| StoredEntry {
                name: name.into(),
                bytes,
                replaced: false,
            })
            .collect();
        Self {
            store: InMemoryStore {
                entries: Arc::new(Mutex::new(entries)),
            },
            cursor: 0,
        }
    }

    pub fn store(&self) -> InMemoryStore {
        self.store.clone()
    }
}

impl Source for InMemory {
    type Element = InMemoryElement;

    fn next_element(&mut self) -> Option<Result<InMemoryElement, SmeltError>> {
        let name = lock(&self.store.entries).get(self.cursor)?.name.clone();
        let index = self.cursor;
        self.cursor += 1;
        Some(Ok(InMemoryElement {
            index,
            name,
            store: self.store.clone(),
        }))
    }

    fn close(&mut self) -> Result<(), SmeltError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct InMemoryElement {
    index: usize,
    name: String,
    store: InMemoryStore,
}

impl Element for InMemoryElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn retain(self) {}

    fn replace(self, artifact: DynamicType) -> Result<(), SmeltError> {
        let mut entries = lock(&self.store.entries);
        let entry = entries
            .get_mut(self.index)
            .ok_or_else(|| SmeltError::Source(format!("entry {} vanished", self.name)))?;
        entry.bytes = artifact.into_bytes();
        entry.replaced = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smelt_core::TypeDescriptor;

    #[test]
    fn replace_overwrites_store_bytes() {
        let mut source = InMemory::new([("A", vec![1]), ("B", vec![2])]);
        let store = source.store();

        let a = source.next_element().unwrap().unwrap();
        assert_eq!(a.name(), "A");
        a.retain();
        let b = source.next_element().unwrap().unwrap();
        b.replace(DynamicType::new(TypeDescriptor::new("B"), vec![9, 9])).unwrap();
        assert!(source.next_element().is_none());
        source.close().unwrap();

        assert_eq!(store.get("A"), Some(vec![1]));
        assert_eq!(store.get("B"), Some(vec![9, 9]));
        assert_eq!(store.replaced(), ["B"]);
        assert_eq!(store.names(), ["A", "B"]);
    }

    #[test]
    fn empty_source_yields_nothing() {
        let mut source = InMemory::new(Vec::<(String, Vec<u8>)>::new());
        assert!(source.store().is_empty());
        assert!(source.next_element().is_none());
    }
}
