//! Factory for creating compression handlers

use std::path::Path;

use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::gzip::GzipHandler;
use super::zstd::ZstdHandler;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Pick a handler for existing file content by its magic bytes
    pub fn detect(data: &[u8]) -> Box<dyn CompressionHandler> {
        if data.starts_with(&GZIP_MAGIC) {
            Box::new(GzipHandler::new())
        } else if data.starts_with(&ZSTD_MAGIC) {
            Box::new(ZstdHandler::new())
        } else {
            Box::new(UncompressedHandler)
        }
    }

    /// Pick a handler for an output path by its final extension
    ///
    /// `level` is passed to encoders that support levels and ignored otherwise.
    pub fn for_output(path: &Path, level: u32) -> Box<dyn CompressionHandler> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "gz" => Box::new(GzipHandler::with_level(level)),
            "zst" | "zstd" => Box::new(ZstdHandler::with_level(level as i32)),
            _ => Box::new(UncompressedHandler),
        }
    }
}
