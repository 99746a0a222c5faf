use std::{
    fmt::Debug,
    sync::{Arc, LazyLock},
};

use crate::{Array, Descriptor, Deserializer, Error, Result, Serializer};

mod flat;
mod jagged;

pub use flat::*;
pub use jagged::*;

/// Encode/decode strategy for one structural kind of array.
pub trait Codec: Send + Sync + Debug {
    /// Discriminator written to the `kind` field of every descriptor this
    /// codec produces.
    fn kind(&self) -> &str;

    /// Whether this codec can encode `value`.
    fn matches(&self, value: &Array) -> bool;

    /// Writes `value`'s payloads and sub-values through `serializer` and
    /// returns its descriptor, which the serializer stores under the key it
    /// reserved for `value`.
    fn encode(&self, value: &Array, serializer: &mut Serializer<'_>) -> Result<Descriptor>;

    /// Rebuilds a value from its descriptor, resolving referenced keys through
    /// `deserializer`.
    fn decode(&self, descriptor: &Descriptor, deserializer: &mut Deserializer<'_>)
    -> Result<Array>;

    /// Storage keys referenced by a descriptor of this kind.
    fn references(&self, descriptor: &Descriptor) -> Result<Vec<String>>;
}

static STANDARD: LazyLock<CodecRegistry> = LazyLock::new(CodecRegistry::default);

/// Ordered list of codecs, checked in registration order, first match wins.
///
/// Prepending a codec with a narrower predicate shadows the general one for
/// the values it matches, without touching existing codecs.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn Codec>>,
}

impl CodecRegistry {
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Shared registry holding the built-in codecs.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Appends `codec`, lowest priority.
    pub fn register(&mut self, codec: impl Codec + 'static) -> &mut Self {
        self.codecs.push(Arc::new(codec));
        self
    }

    /// Prepends `codec`, highest priority.
    pub fn register_first(&mut self, codec: impl Codec + 'static) -> &mut Self {
        self.codecs.insert(0, Arc::new(codec));
        self
    }

    pub fn with(mut self, codec: impl Codec + 'static) -> Self {
        self.register(codec);
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.codecs.iter().map(|codec| codec.kind())
    }

    pub fn strategy_for_encoding(&self, value: &Array) -> Result<&dyn Codec> {
        self.codecs
            .iter()
            .find(|codec| codec.matches(value))
            .map(|codec| &**codec)
            .ok_or(Error::UnsupportedType(value.kind_name()))
    }

    pub fn strategy_for_decoding(&self, descriptor: &Descriptor) -> Result<&dyn Codec> {
        let kind = descriptor.kind()?;
        self.codecs
            .iter()
            .find(|codec| codec.kind() == kind)
            .map(|codec| &**codec)
            .ok_or_else(|| Error::UnknownDescriptorKind {
                key: descriptor.key().to_owned(),
                kind: kind.to_owned(),
            })
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::empty().with(NdArrayCodec).with(JaggedArrayCodec)
    }
}
