//! MRC file writer
//!
//! Writes float32 arrays as little-endian MRC2014 files. Existing files are
//! replaced.

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use std::fs;
use std::path::Path;

use ndarray::ArrayViewD;

use crate::compression::CompressionFactory;
use crate::mrc::constants::header;
use crate::mrc::errors::MrcResult;
use crate::mrc::header::MrcHeader;

/// Writer for float32 MRC files
#[derive(Debug, Clone, Copy)]
pub struct MrcWriter {
    /// Level handed to gzip/zstd when the output extension selects one
    compression_level: u32,
}

impl MrcWriter {
    pub fn new(compression_level: u32) -> Self {
        MrcWriter { compression_level }
    }

    /// Encode an array into the bytes of an uncompressed MRC file
    pub fn encode(data: &ArrayViewD<'_, f32>, voxel_size: [f32; 3]) -> MrcResult<Vec<u8>> {
        let mut file_header = MrcHeader::for_data(data.shape(), voxel_size)?;
        file_header.update_stats(data);

        let mut buffer = file_header.to_bytes()?;
        buffer.reserve(data.len() * 4);
        debug_assert_eq!(buffer.len(), header::SIZE);

        // Logical order, independent of the view's memory layout.
        for &value in data.iter() {
            buffer.write_f32::<LittleEndian>(value)?;
        }
        Ok(buffer)
    }

    /// Write an array to `path`, compressing according to its extension
    pub fn write(&self, data: &ArrayViewD<'_, f32>, voxel_size: [f32; 3], path: &Path) -> MrcResult<()> {
        let encoded = Self::encode(data, voxel_size)?;
        let handler = CompressionFactory::for_output(path, self.compression_level);
        let bytes = handler.compress(&encoded)?;

        fs::write(path, &bytes)?;
        debug!("Wrote {} ({} bytes, {})", path.display(), bytes.len(), handler.name());
        Ok(())
    }
}
