//! Compression handling for MRC files
//!
//! Inputs are decompressed transparently based on their magic bytes; outputs
//! are compressed when their extension asks for it.

mod handler;
mod uncompressed;
mod gzip;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use gzip::GzipHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
