use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt::{self, Debug},
    ptr,
    sync::{Arc, LazyLock},
};

use log::debug;
use parking_lot::RwLock;

use crate::{BoxError, Error, Result};

#[cfg(feature = "lz4")]
mod lz4;
#[cfg(feature = "zlib")]
mod zlib;
#[cfg(feature = "zstd")]
mod zstd;

#[cfg(feature = "lz4")]
pub use lz4::*;
#[cfg(feature = "zlib")]
pub use zlib::*;
#[cfg(feature = "zstd")]
pub use self::zstd::*;

/// Byte-to-byte transform applied to every raw payload.
///
/// Implementations must be pure: the same input always yields the same
/// output, and `decompress(compress(b)) == b`.
pub trait Compressor: Send + Sync + Debug {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError>;

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError>;

    /// The plain function behind `compress`, if there is one.
    fn compress_fn(&self) -> Option<CompressFn> {
        None
    }
}

/// Stores payloads as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Compressor for Identity {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(bytes.to_vec())
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(bytes.to_vec())
    }
}

pub type CompressFn = fn(&[u8]) -> Result<Vec<u8>, BoxError>;

/// A compress/decompress function pair registered as a scheme.
#[derive(Clone, Copy)]
pub struct Functions {
    pub compress: CompressFn,
    pub decompress: CompressFn,
}

impl Debug for Functions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Functions").finish_non_exhaustive()
    }
}

impl Compressor for Functions {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        (self.compress)(bytes)
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        (self.decompress)(bytes)
    }

    fn compress_fn(&self) -> Option<CompressFn> {
        Some(self.compress)
    }
}

static GLOBAL: LazyLock<RwLock<CompressionRegistry>> =
    LazyLock::new(|| RwLock::new(CompressionRegistry::default()));

/// Closed set of compression schemes known by name.
///
/// Descriptors only record the scheme name; readers look the name up here to
/// find the matching decompressor. One process-wide instance backs
/// serialization, see [`CompressionRegistry::global`].
#[derive(Debug, Clone)]
pub struct CompressionRegistry {
    schemes: BTreeMap<String, Arc<dyn Compressor>>,
}

impl CompressionRegistry {
    pub const NONE: &'static str = "none";
    pub const ZLIB: &'static str = "zlib";
    pub const LZ4: &'static str = "lz4";
    pub const ZSTD: &'static str = "zstd";

    /// Registry holding only the identity scheme.
    pub fn empty() -> Self {
        let mut schemes: BTreeMap<String, Arc<dyn Compressor>> = BTreeMap::new();
        schemes.insert(Self::NONE.to_owned(), Arc::new(Identity));
        Self { schemes }
    }

    pub fn global() -> &'static RwLock<Self> {
        &GLOBAL
    }

    pub fn register(&mut self, name: &str, compressor: impl Compressor + 'static) -> Result<()> {
        if self.schemes.contains_key(name) {
            return Err(Error::CompressionAlreadyRegistered(name.to_owned()));
        }
        debug!("Registered compression scheme {name:?}.");
        self.schemes.insert(name.to_owned(), Arc::new(compressor));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Compressor>> {
        self.schemes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    /// Scheme registered with `compress` as its compression function.
    pub fn find_function(&self, compress: CompressFn) -> Option<(&str, Arc<dyn Compressor>)> {
        self.schemes.iter().find_map(|(name, compressor)| {
            compressor
                .compress_fn()
                .is_some_and(|f| ptr::fn_addr_eq(f, compress))
                .then(|| (name.as_str(), compressor.clone()))
        })
    }
}

impl Default for CompressionRegistry {
    /// Identity plus every built-in scheme enabled by crate features.
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut schemes = Self::empty();
        #[cfg(feature = "zlib")]
        schemes
            .schemes
            .insert(Self::ZLIB.to_owned(), Arc::new(Zlib::default()));
        #[cfg(feature = "lz4")]
        schemes.schemes.insert(Self::LZ4.to_owned(), Arc::new(LZ4));
        #[cfg(feature = "zstd")]
        schemes
            .schemes
            .insert(Self::ZSTD.to_owned(), Arc::new(Zstd::default()));
        schemes
    }
}

/// Adds an external scheme to the global registry.
pub fn register_compression(name: &str, compressor: impl Compressor + 'static) -> Result<()> {
    CompressionRegistry::global().write().register(name, compressor)
}

/// Selects the compression scheme for a serialization.
///
/// Either a scheme name, or the compression function of a scheme registered
/// through [`Functions`]. Converts from `&str`, `String`, [`CompressFn`] and
/// `Option<Compression>`, where `None` means uncompressed.
#[derive(Debug, Clone)]
pub struct Compression(Selector);

#[derive(Debug, Clone)]
enum Selector {
    Named(Cow<'static, str>),
    Function(CompressFn),
}

impl Compression {
    pub const fn none() -> Self {
        Self(Selector::Named(Cow::Borrowed(CompressionRegistry::NONE)))
    }

    pub const fn zlib() -> Self {
        Self(Selector::Named(Cow::Borrowed(CompressionRegistry::ZLIB)))
    }

    pub const fn lz4() -> Self {
        Self(Selector::Named(Cow::Borrowed(CompressionRegistry::LZ4)))
    }

    pub const fn zstd() -> Self {
        Self(Selector::Named(Cow::Borrowed(CompressionRegistry::ZSTD)))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(Selector::Named(Cow::Owned(name.into())))
    }

    /// Selects the registered scheme whose compression function is `compress`.
    pub const fn function(compress: CompressFn) -> Self {
        Self(Selector::Function(compress))
    }

    /// Scheme name, `None` when selected by function.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Selector::Named(name) => Some(name),
            Selector::Function(_) => None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.name() == Some(CompressionRegistry::NONE)
    }

    /// Looks the scheme up in the global registry and returns its name and
    /// compressor.
    pub fn resolve(&self) -> Result<(String, Arc<dyn Compressor>)> {
        let registry = CompressionRegistry::global().read();
        let found = match &self.0 {
            Selector::Named(name) => registry
                .get(name)
                .map(|compressor| (name.to_string(), compressor)),
            Selector::Function(compress) => registry
                .find_function(*compress)
                .map(|(name, compressor)| (name.to_owned(), compressor)),
        };
        found.ok_or_else(|| Error::UnregisteredCompression(self.to_string()))
    }
}

impl Default for Compression {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for Compression {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Selector::Named(a), Selector::Named(b)) => a == b,
            (Selector::Function(a), Selector::Function(b)) => ptr::fn_addr_eq(*a, *b),
            _ => false,
        }
    }
}

impl Eq for Compression {}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Selector::Named(name) => f.write_str(name),
            Selector::Function(compress) => write!(f, "fn@{:p}", *compress),
        }
    }
}

impl From<&str> for Compression {
    fn from(value: &str) -> Self {
        Self::named(value)
    }
}

impl From<String> for Compression {
    fn from(value: String) -> Self {
        Self::named(value)
    }
}

impl From<CompressFn> for Compression {
    fn from(value: CompressFn) -> Self {
        Self::function(value)
    }
}

impl From<Option<Compression>> for Compression {
    fn from(value: Option<Compression>) -> Self {
        value.unwrap_or_default()
    }
}
