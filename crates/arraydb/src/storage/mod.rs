use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

mod memory;

pub use memory::*;

/// Value stored under one key of a [`Storage`] mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entry {
    /// Raw, possibly compressed, array payload.
    Bytes(Vec<u8>),
    /// Self-describing record: an array descriptor or the root header.
    Record(Map<String, Value>),
}

impl Entry {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Record(_) => None,
        }
    }
}

/// Key/value mapping that serialized arrays are written into.
///
/// Where the mapping lives (memory, files, a remote store) is up to the
/// implementor. Serialization only needs unique keys, insertion and lookup;
/// `keys` and `remove` are used to prune unreachable entries.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<Entry>>;

    fn set(&mut self, key: &str, entry: Entry) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn keys(&self) -> Result<Vec<String>>;

    fn remove(&mut self, key: &str) -> Result<Option<Entry>>;
}

impl Storage for HashMap<String, Entry> {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        Ok(HashMap::get(self, key).cloned())
    }

    fn set(&mut self, key: &str, entry: Entry) -> Result<()> {
        self.insert(key.to_owned(), entry);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(HashMap::keys(self).cloned().collect())
    }

    fn remove(&mut self, key: &str) -> Result<Option<Entry>> {
        Ok(HashMap::remove(self, key))
    }
}

impl Storage for BTreeMap<String, Entry> {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        Ok(BTreeMap::get(self, key).cloned())
    }

    fn set(&mut self, key: &str, entry: Entry) -> Result<()> {
        self.insert(key.to_owned(), entry);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(BTreeMap::keys(self).cloned().collect())
    }

    fn remove(&mut self, key: &str) -> Result<Option<Entry>> {
        Ok(BTreeMap::remove(self, key))
    }
}
