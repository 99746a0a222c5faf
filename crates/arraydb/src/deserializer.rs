use std::collections::HashSet;

use log::trace;
use serde_json::{Map, Value};

use crate::{
    Array, CodecRegistry, CompressionRegistry, Descriptor, Entry, Error, Header, ROOT_KEY, Result,
    Storage,
};

/// Rebuilds arrays from a [`Storage`] populated by a [`Serializer`](crate::Serializer).
///
/// Never mutates the storage. A key holding the root [`Header`] is followed
/// to the descriptor it names.
pub struct Deserializer<'a> {
    storage: &'a dyn Storage,
    codecs: &'a CodecRegistry,
    pending: HashSet<String>,
}

impl<'a> Deserializer<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            codecs: CodecRegistry::standard(),
            pending: HashSet::new(),
        }
    }

    pub fn with_codecs(mut self, codecs: &'a CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    /// Reconstructs the value whose descriptor (or header) is at `key`.
    pub fn deserialize(&mut self, key: &str) -> Result<Array> {
        if !self.pending.insert(key.to_owned()) {
            return Err(Error::CyclicReference(key.to_owned()));
        }
        let result = self.deserialize_(key);
        self.pending.remove(key);
        result
    }

    fn deserialize_(&mut self, key: &str) -> Result<Array> {
        let record = self.record(key)?;
        if Header::is_header(&record) {
            let header = Header::from_record(&record)?;
            return self.deserialize(header.root());
        }

        let descriptor = Descriptor::from_record(key, record);
        let codecs = self.codecs;
        let codec = codecs.strategy_for_decoding(&descriptor)?;
        trace!("Decoding {} descriptor at {key:?}.", codec.kind());
        codec.decode(&descriptor, self)
    }

    pub fn descriptor(&self, key: &str) -> Result<Descriptor> {
        Ok(Descriptor::from_record(key, self.record(key)?))
    }

    /// Reads the payload at `key` and undoes `compression`.
    pub fn payload(&self, key: &str, compression: &str) -> Result<Vec<u8>> {
        let bytes = match self.entry(key)? {
            Entry::Bytes(bytes) => bytes,
            Entry::Record(_) => return Err(Error::ExpectedPayload(key.to_owned())),
        };
        if compression == CompressionRegistry::NONE {
            return Ok(bytes);
        }
        let compressor = CompressionRegistry::global()
            .read()
            .get(compression)
            .ok_or_else(|| Error::Decompression {
                scheme: compression.to_owned(),
                source: "scheme is not registered".into(),
            })?;
        compressor
            .decompress(&bytes)
            .map_err(|source| Error::Decompression {
                scheme: compression.to_owned(),
                source,
            })
    }

    fn record(&self, key: &str) -> Result<Map<String, Value>> {
        match self.entry(key)? {
            Entry::Record(record) => Ok(record),
            Entry::Bytes(_) => Err(Error::ExpectedRecord(key.to_owned())),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        self.storage
            .get(key)?
            .ok_or_else(|| Error::MissingKey(key.to_owned()))
    }
}

/// Reconstructs the default root of `storage`.
pub fn deserialize(storage: &dyn Storage) -> Result<Array> {
    deserialize_key(storage, ROOT_KEY)
}

/// Reconstructs the value whose descriptor is at `key`.
pub fn deserialize_key(storage: &dyn Storage, key: &str) -> Result<Array> {
    Deserializer::new(storage).deserialize(key)
}
