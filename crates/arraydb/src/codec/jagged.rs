use crate::{Array, Descriptor, Deserializer, Error, JaggedArray, Result, Serializer};

use super::Codec;

/// Codec for [`JaggedArray`]: offsets and content are serialized as values of
/// their own and referenced by key.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaggedArrayCodec;

impl JaggedArrayCodec {
    pub const KIND: &'static str = "jaggedarray";
}

impl Codec for JaggedArrayCodec {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn matches(&self, value: &Array) -> bool {
        matches!(value, Array::Jagged(_))
    }

    fn encode(&self, value: &Array, serializer: &mut Serializer<'_>) -> Result<Descriptor> {
        let Array::Jagged(jagged) = value else {
            return Err(Error::UnsupportedType(value.kind_name()));
        };
        let offsets = serializer.serialize(&Array::Flat(jagged.offsets().clone()))?;
        let content = serializer.serialize(jagged.content())?;
        Descriptor::new(Self::KIND)
            .with(Descriptor::OFFSETS, offsets)?
            .with(Descriptor::CONTENT, content)
    }

    fn decode(
        &self,
        descriptor: &Descriptor,
        deserializer: &mut Deserializer<'_>,
    ) -> Result<Array> {
        let offsets = match deserializer.deserialize(descriptor.str_field(Descriptor::OFFSETS)?)? {
            Array::Flat(offsets) => offsets,
            other => {
                return Err(Error::InvariantViolation(format!(
                    "offsets must be a flat array, got a {} array",
                    other.kind_name()
                )));
            }
        };
        let content = deserializer.deserialize(descriptor.str_field(Descriptor::CONTENT)?)?;
        Ok(JaggedArray::new(offsets, content)?.into())
    }

    fn references(&self, descriptor: &Descriptor) -> Result<Vec<String>> {
        Ok(vec![
            descriptor.str_field(Descriptor::OFFSETS)?.to_owned(),
            descriptor.str_field(Descriptor::CONTENT)?.to_owned(),
        ])
    }
}
