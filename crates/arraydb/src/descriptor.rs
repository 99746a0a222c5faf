use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Self-describing record emitted for every serialized array.
///
/// A flat mapping of field names to JSON primitives. References to payloads
/// and to other descriptors are plain string fields holding storage keys, so
/// the descriptors of one value form a DAG addressed through the storage.
///
/// Wire shape:
///
/// ```text
/// {"kind": "ndarray", "dtype": ">u2", "shape": [20, 5], "compression": "none", "data": "1"}
/// {"kind": "jaggedarray", "offsets": "1", "content": "3"}
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    key: String,
    fields: Map<String, Value>,
}

impl Descriptor {
    pub const KIND: &'static str = "kind";
    pub const DTYPE: &'static str = "dtype";
    pub const SHAPE: &'static str = "shape";
    pub const COMPRESSION: &'static str = "compression";
    pub const DATA: &'static str = "data";
    pub const OFFSETS: &'static str = "offsets";
    pub const CONTENT: &'static str = "content";

    pub fn new(kind: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(Self::KIND.to_owned(), Value::from(kind));
        Self {
            key: String::new(),
            fields,
        }
    }

    /// Wraps a record read from storage under `key`.
    pub fn from_record(key: &str, fields: Map<String, Value>) -> Self {
        Self {
            key: key.to_owned(),
            fields,
        }
    }

    pub fn with(mut self, field: &str, value: impl Serialize) -> Result<Self> {
        self.set(field, value)?;
        Ok(self)
    }

    pub fn set(&mut self, field: &str, value: impl Serialize) -> Result<()> {
        self.fields
            .insert(field.to_owned(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Storage key this descriptor was read from, empty while encoding.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_record(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn kind(&self) -> Result<&str> {
        self.str_field(Self::KIND)
    }

    pub fn str_field(&self, field: &'static str) -> Result<&str> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "expected a string"))
    }

    /// Parses a field through serde.
    pub fn parse<T: DeserializeOwned>(&self, field: &'static str) -> Result<T> {
        Deserialize::deserialize(self.required(field)?)
            .map_err(|e: serde_json::Error| self.invalid(field, e.to_string()))
    }

    fn required(&self, field: &'static str) -> Result<&Value> {
        self.fields
            .get(field)
            .ok_or_else(|| self.invalid(field, "missing field"))
    }

    pub fn invalid(&self, field: &'static str, reason: impl Into<String>) -> Error {
        Error::InvalidDescriptor {
            key: self.key.clone(),
            field,
            reason: reason.into(),
        }
    }
}
