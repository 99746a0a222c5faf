use crate::{
    Array, CompressionRegistry, DType, Descriptor, Deserializer, Error, FlatArray, Result,
    Serializer,
};

use super::Codec;

/// Codec for [`FlatArray`]: one descriptor plus one raw payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdArrayCodec;

impl NdArrayCodec {
    pub const KIND: &'static str = "ndarray";
}

impl Codec for NdArrayCodec {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn matches(&self, value: &Array) -> bool {
        matches!(value, Array::Flat(_))
    }

    fn encode(&self, value: &Array, serializer: &mut Serializer<'_>) -> Result<Descriptor> {
        let Array::Flat(flat) = value else {
            return Err(Error::UnsupportedType(value.kind_name()));
        };
        let (data, compression) = serializer.write_payload(flat.data())?;
        Descriptor::new(Self::KIND)
            .with(Descriptor::DTYPE, flat.dtype())?
            .with(Descriptor::SHAPE, flat.shape())?
            .with(Descriptor::COMPRESSION, compression)?
            .with(Descriptor::DATA, data)
    }

    fn decode(
        &self,
        descriptor: &Descriptor,
        deserializer: &mut Deserializer<'_>,
    ) -> Result<Array> {
        let dtype: DType = descriptor.parse(Descriptor::DTYPE)?;
        let shape: Vec<usize> = descriptor.parse(Descriptor::SHAPE)?;
        let compression = match descriptor.get(Descriptor::COMPRESSION) {
            None => CompressionRegistry::NONE,
            Some(_) => descriptor.str_field(Descriptor::COMPRESSION)?,
        };
        let data = deserializer.payload(descriptor.str_field(Descriptor::DATA)?, compression)?;
        Ok(FlatArray::new(dtype, shape, data)?.into())
    }

    fn references(&self, descriptor: &Descriptor) -> Result<Vec<String>> {
        Ok(vec![descriptor.str_field(Descriptor::DATA)?.to_owned()])
    }
}
