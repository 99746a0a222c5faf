use lz4_flex::{compress_prepend_size, decompress_size_prepended};

use crate::BoxError;

use super::Compressor;

/// LZ4 block compression with the uncompressed size prepended.
///
/// Very fast in both directions with moderate ratios.
#[derive(Debug, Clone, Copy, Default)]
pub struct LZ4;

impl Compressor for LZ4 {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(compress_prepend_size(bytes))
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(decompress_size_prepended(bytes)?)
    }
}
