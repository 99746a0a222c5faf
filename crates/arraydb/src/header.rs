use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, FORMAT_VERSION, Result, Version};

/// Well-known key of the header naming the default root of a mapping.
pub const ROOT_KEY: &str = "root";

const FORMAT_NAME: &str = "arraydb";

/// Record stored at [`ROOT_KEY`]: which descriptor to start reading from and
/// which schema version wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    format: String,
    version: Version,
    root: String,
}

impl Header {
    pub fn new(root: &str) -> Self {
        Self {
            format: FORMAT_NAME.to_owned(),
            version: FORMAT_VERSION,
            root: root.to_owned(),
        }
    }

    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether a record is a header rather than a descriptor.
    pub fn is_header(record: &Map<String, Value>) -> bool {
        record.get("format").and_then(Value::as_str) == Some(FORMAT_NAME)
    }

    pub fn from_record(record: &Map<String, Value>) -> Result<Self> {
        let header: Self = serde_json::from_value(Value::Object(record.clone()))?;
        header.verify()?;
        Ok(header)
    }

    pub fn to_record(&self) -> Result<Map<String, Value>> {
        let mut record = Map::new();
        record.insert("format".to_owned(), Value::from(self.format.as_str()));
        record.insert("version".to_owned(), serde_json::to_value(self.version)?);
        record.insert("root".to_owned(), Value::from(self.root.as_str()));
        Ok(record)
    }

    fn verify(&self) -> Result<()> {
        if self.version > FORMAT_VERSION {
            return Err(Error::DifferentVersion {
                found: self.version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(())
    }
}
