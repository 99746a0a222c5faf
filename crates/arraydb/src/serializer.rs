use std::sync::Arc;

use log::{debug, trace};

use crate::{
    Array, CodecRegistry, Compression, CompressionRegistry, Compressor, Entry, Error, Header,
    Identity, ROOT_KEY, Result, Storage,
};

/// Writes arrays into a [`Storage`] as descriptors and raw payloads.
///
/// Keys are `"{prefix}{n}"` with `n` taken from a counter, assigned in
/// pre-order: a value's descriptor key is reserved before its sub-values are
/// written. Keys already present in the storage are skipped.
///
/// A failed call may leave orphaned entries behind; they are unreachable from
/// any root and can be dropped with [`retain_reachable`](crate::retain_reachable).
pub struct Serializer<'a> {
    storage: &'a mut dyn Storage,
    codecs: &'a CodecRegistry,
    scheme: String,
    compressor: Arc<dyn Compressor>,
    min_compress_size: usize,
    prefix: String,
    counter: usize,
}

impl<'a> Serializer<'a> {
    /// Uncompressed serializer using the standard codecs.
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        Self {
            storage,
            codecs: CodecRegistry::standard(),
            scheme: CompressionRegistry::NONE.to_owned(),
            compressor: Arc::new(Identity),
            min_compress_size: 0,
            prefix: String::new(),
            counter: 0,
        }
    }

    pub fn with_codecs(mut self, codecs: &'a CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    /// Selects the scheme by name or by its registered compression function.
    ///
    /// Fails with [`Error::UnregisteredCompression`] when the global registry
    /// has no such scheme.
    pub fn with_compression(mut self, compression: impl Into<Compression>) -> Result<Self> {
        let (scheme, compressor) = compression.into().resolve()?;
        self.scheme = scheme;
        self.compressor = compressor;
        Ok(self)
    }

    /// Name of the scheme applied to payloads at or above the size threshold.
    #[inline]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Payloads shorter than `size` bytes are stored uncompressed.
    pub fn with_min_compress_size(mut self, size: usize) -> Self {
        self.min_compress_size = size;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Serializes `value` and every sub-value, returning the key of its
    /// descriptor.
    pub fn serialize(&mut self, value: &Array) -> Result<String> {
        let codecs = self.codecs;
        let codec = codecs.strategy_for_encoding(value)?;
        let key = self.fresh_key()?;
        let descriptor = codec.encode(value, self)?;
        trace!("Writing {} descriptor at {key:?}.", codec.kind());
        self.storage.set(&key, Entry::Record(descriptor.into_record()))?;
        Ok(key)
    }

    /// Compresses `bytes` and stores them under a fresh key.
    ///
    /// Returns the key and the name of the scheme actually applied, which
    /// codecs record in their descriptor.
    pub fn write_payload(&mut self, bytes: &[u8]) -> Result<(String, String)> {
        let key = self.fresh_key()?;
        let (payload, scheme) =
            if self.scheme == CompressionRegistry::NONE || bytes.len() < self.min_compress_size {
                (bytes.to_vec(), CompressionRegistry::NONE)
            } else {
                let scheme = self.scheme.as_str();
                let payload =
                    self.compressor
                        .compress(bytes)
                        .map_err(|source| Error::Compression {
                            scheme: scheme.to_owned(),
                            source,
                        })?;
                (payload, scheme)
            };
        trace!(
            "Writing payload at {key:?}: {} bytes, {} stored with {scheme:?}.",
            bytes.len(),
            payload.len()
        );
        let scheme = scheme.to_owned();
        self.storage.set(&key, Entry::Bytes(payload))?;
        Ok((key, scheme))
    }

    /// Points the mapping's [`ROOT_KEY`] at `root` unless a root is already
    /// recorded. Returns whether the header was written.
    pub fn write_header(&mut self, root: &str) -> Result<bool> {
        if self.storage.contains(ROOT_KEY)? {
            debug!("Header already present, {root:?} is not the default root.");
            return Ok(false);
        }
        debug!("Writing header with root {root:?}.");
        self.storage
            .set(ROOT_KEY, Entry::Record(Header::new(root).to_record()?))?;
        Ok(true)
    }

    fn fresh_key(&mut self) -> Result<String> {
        loop {
            let key = format!("{}{}", self.prefix, self.counter);
            self.counter += 1;
            if key != ROOT_KEY && !self.storage.contains(&key)? {
                return Ok(key);
            }
        }
    }
}

/// Serializes `value` into `storage` and returns the root descriptor key.
///
/// The first value serialized into a mapping also becomes its default root,
/// read back by [`deserialize`](crate::deserialize).
pub fn serialize(
    value: &Array,
    storage: &mut dyn Storage,
    compression: impl Into<Compression>,
) -> Result<String> {
    let mut serializer = Serializer::new(storage).with_compression(compression)?;
    let root = serializer.serialize(value)?;
    serializer.write_header(&root)?;
    Ok(root)
}
