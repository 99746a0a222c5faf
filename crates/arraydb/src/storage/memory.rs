use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Entry, Result, Storage};

/// In-memory [`Storage`], ordered by key.
///
/// Serializable with serde, so a populated mapping can be written to any
/// format serde supports and loaded back later.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStorage {
    entries: BTreeMap<String, Entry>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Total size in bytes of every raw payload held.
    pub fn payload_bytes(&self) -> usize {
        self.entries
            .values()
            .filter_map(Entry::as_bytes)
            .map(<[u8]>::len)
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, entry: Entry) -> Result<()> {
        self.entries.insert(key.to_owned(), entry);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn remove(&mut self, key: &str) -> Result<Option<Entry>> {
        Ok(self.entries.remove(key))
    }
}

impl FromIterator<(String, Entry)> for MemoryStorage {
    fn from_iter<T: IntoIterator<Item = (String, Entry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
