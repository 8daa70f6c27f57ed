//! Handler for zstd compressed MRC files (`.mrc.zst`)

use log::debug;

use crate::mrc::errors::{MrcError, MrcResult};
use super::handler::CompressionHandler;

/// Level used when none is requested
const DEFAULT_LEVEL: i32 = 3;

/// Zstandard frame handler
pub struct ZstdHandler {
    /// Encoder level, 1-22
    compression_level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        ZstdHandler { compression_level: DEFAULT_LEVEL }
    }

    /// Handler encoding at `level`, clamped to the range zstd accepts
    pub fn with_level(level: i32) -> Self {
        ZstdHandler { compression_level: level.clamp(1, 22) }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> MrcResult<Vec<u8>> {
        let decoded = zstd::decode_all(data)
            .map_err(|e| MrcError::CompressionError("ZSTD", e.to_string()))?;
        debug!("ZSTD decompressed {} bytes to {}", data.len(), decoded.len());
        Ok(decoded)
    }

    fn compress(&self, data: &[u8]) -> MrcResult<Vec<u8>> {
        let encoded = zstd::encode_all(data, self.compression_level)
            .map_err(|e| MrcError::CompressionError("ZSTD", e.to_string()))?;
        debug!("ZSTD compressed {} bytes to {} at level {}",
               data.len(), encoded.len(), self.compression_level);
        Ok(encoded)
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }
}
