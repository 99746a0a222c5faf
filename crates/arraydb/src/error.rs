use std::{io, result};

use thiserror::Error;

use crate::Version;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Boxed error returned by pluggable compressors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for arraydb operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),
    #[error(transparent)]
    SerdeJSON(#[from] serde_json::Error),
    #[error("Storage backend error: {0}")]
    Storage(String),

    // Encode errors
    #[error("No registered codec can encode a {0} array")]
    UnsupportedType(&'static str),
    #[error("Compression with scheme {scheme:?} failed: {source}")]
    Compression { scheme: String, source: BoxError },
    #[error("Compression scheme {0:?} is not registered")]
    UnregisteredCompression(String),
    #[error("Compression scheme {0:?} is already registered")]
    CompressionAlreadyRegistered(String),

    // Decode errors
    #[error("Unknown descriptor kind {kind:?} at key {key:?}")]
    UnknownDescriptorKind { key: String, kind: String },
    #[error("Missing key {0:?} in storage")]
    MissingKey(String),
    #[error("Decompression with scheme {scheme:?} failed: {source}")]
    Decompression { scheme: String, source: BoxError },
    #[error("Invalid descriptor at key {key:?}, field {field:?}: {reason}")]
    InvalidDescriptor {
        key: String,
        field: &'static str,
        reason: String,
    },
    #[error("Expected a record at key {0:?}, found a raw payload")]
    ExpectedRecord(String),
    #[error("Expected a raw payload at key {0:?}, found a record")]
    ExpectedPayload(String),
    #[error("Cyclic reference through key {0:?}")]
    CyclicReference(String),
    #[error("Different version found: {found:?}, expected at most: {expected:?}")]
    DifferentVersion { found: Version, expected: Version },

    // Array errors
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Invalid dtype {0:?}")]
    InvalidDType(String),
    #[error("DType mismatch: array is {found}, requested {expected}")]
    DTypeMismatch { expected: String, found: String },
    #[error("Payload size mismatch: expected {expected} bytes, got {actual}")]
    PayloadSizeMismatch { expected: usize, actual: usize },
}
