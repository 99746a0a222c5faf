use std::io::{Read, Write};

use flate2::{Compression as Level, read::ZlibDecoder, write::ZlibEncoder};

use crate::BoxError;

use super::Compressor;

/// Zlib (deflate) compression via flate2.
#[derive(Debug, Clone, Copy)]
pub struct Zlib {
    level: u32,
}

impl Zlib {
    /// `level` ranges from 0 (store) to 9 (best).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

impl Default for Zlib {
    fn default() -> Self {
        Self::new(Level::default().level())
    }
}

impl Compressor for Zlib {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Level::new(self.level));
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        let mut decoder = ZlibDecoder::new(bytes);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}
