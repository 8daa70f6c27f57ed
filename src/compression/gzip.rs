//! Handler for gzip compressed MRC files (`.mrc.gz`)

use std::io::{Read, Write};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use crate::mrc::errors::{MrcError, MrcResult};
use super::handler::CompressionHandler;

/// Gzip compression handler
pub struct GzipHandler {
    /// Compression level (0-9)
    compression_level: u32,
}

impl GzipHandler {
    /// Create a new gzip handler with the default level
    pub fn new() -> Self {
        GzipHandler {
            compression_level: 6
        }
    }

    /// Create a new gzip handler with the given level, clamped to 0-9
    pub fn with_level(level: u32) -> Self {
        GzipHandler {
            compression_level: level.min(9)
        }
    }
}

impl Default for GzipHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for GzipHandler {
    fn decompress(&self, data: &[u8]) -> MrcResult<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut decompressed_data = Vec::new();
        decoder.read_to_end(&mut decompressed_data)
            .map_err(|e| MrcError::CompressionError("Gzip", e.to_string()))?;
        debug!("Gzip decompressed {} bytes to {}", data.len(), decompressed_data.len());
        Ok(decompressed_data)
    }

    fn compress(&self, data: &[u8]) -> MrcResult<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.compression_level));
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        debug!("Gzip compressed {} bytes to {} at level {}",
               data.len(), compressed.len(), self.compression_level);
        Ok(compressed)
    }

    fn name(&self) -> &'static str {
        "Gzip"
    }
}
