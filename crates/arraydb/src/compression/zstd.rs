use zstd::{decode_all, encode_all};

use crate::BoxError;

use super::Compressor;

/// Zstd compression level (1-22). Level 3 provides a good balance
/// between compression ratio and speed for most workloads.
const ZSTD_COMPRESSION_LEVEL: i32 = 3;

/// Zstd compression for high ratios.
#[derive(Debug, Clone, Copy)]
pub struct Zstd {
    level: i32,
}

impl Zstd {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Default for Zstd {
    fn default() -> Self {
        Self::new(ZSTD_COMPRESSION_LEVEL)
    }
}

impl Compressor for Zstd {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(encode_all(bytes, self.level)?)
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(decode_all(bytes)?)
    }
}
