//! MRC file reader
//!
//! Loads the header and data block of an MRC file, decompressing gzip or
//! zstd containers first, and converts the samples to float32.

use log::{debug, info};
use std::fs;
use std::io::{Cursor, SeekFrom};
use std::path::Path;

use ndarray::{ArrayD, IxDyn};

use crate::compression::CompressionFactory;
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::mrc::constants::{self, header, modes};
use crate::mrc::errors::{MrcError, MrcResult};
use crate::mrc::header::MrcHeader;
use crate::mrc::image::MrcImage;

/// Reader for MRC files
#[derive(Debug, Default, Clone, Copy)]
pub struct MrcReader;

impl MrcReader {
    /// Creates a new MRC reader
    pub fn new() -> Self {
        MrcReader
    }

    /// Loads an MRC file from the given path
    ///
    /// # Arguments
    /// * `path` - Path to a plain, gzip or zstd compressed MRC file
    ///
    /// # Returns
    /// The decoded image
    pub fn load(&self, path: &Path) -> MrcResult<MrcImage> {
        info!("Loading MRC file: {}", path.display());
        let mut cursor = Self::open(path)?;
        let (_, image) = self.read(&mut cursor)?;
        Ok(image)
    }

    /// Loads only the header of an MRC file
    pub fn load_header(&self, path: &Path) -> MrcResult<MrcHeader> {
        let mut cursor = Self::open(path)?;
        let raw = Self::read_raw_header(&mut cursor)?;
        let (parsed, _) = MrcHeader::parse(&raw)?;
        Ok(parsed)
    }

    fn open(path: &Path) -> MrcResult<Cursor<Vec<u8>>> {
        let bytes = fs::read(path)?;
        let handler = CompressionFactory::detect(&bytes);
        debug!("{} container: {}", path.display(), handler.name());
        let bytes = handler.decompress(&bytes)?;
        Ok(Cursor::new(bytes))
    }

    fn read_raw_header(reader: &mut dyn SeekableReader) -> MrcResult<Vec<u8>> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < header::SIZE as u64 {
            return Err(MrcError::TruncatedHeader(file_size as usize));
        }
        reader.seek(SeekFrom::Start(0))?;

        let mut raw = vec![0u8; header::SIZE];
        reader.read_exact(&mut raw)?;
        Ok(raw)
    }

    /// Reads an MRC file from the given reader
    ///
    /// This method handles the core process of reading an MRC file:
    /// 1. Parse the fixed header and detect byte order
    /// 2. Skip the extended header
    /// 3. Decode the data block into float32 samples
    pub fn read(&self, reader: &mut dyn SeekableReader) -> MrcResult<(MrcHeader, MrcImage)> {
        let raw = Self::read_raw_header(reader)?;
        let (parsed, byte_order) = MrcHeader::parse(&raw)?;
        let handler = byte_order.create_handler();

        let data_offset = header::SIZE as u64 + parsed.nsymbt as u64;
        let file_size = reader.seek(SeekFrom::End(0))?;
        let sample_size = constants::bytes_per_sample(parsed.mode)
            .ok_or(MrcError::UnsupportedMode(parsed.mode, constants::mode_name(parsed.mode)))?;
        let sample_count = parsed.sample_count()?;
        let expected = parsed.data_size(sample_size)?;
        let found = file_size.saturating_sub(data_offset) as usize;
        if found < expected {
            return Err(MrcError::TruncatedData { expected, found });
        }

        reader.seek(SeekFrom::Start(data_offset))?;
        let samples = Self::read_samples(reader, handler.as_ref(), parsed.mode, sample_count)?;

        let data = ArrayD::from_shape_vec(IxDyn(&parsed.data_shape()), samples)
            .map_err(|e| MrcError::InvalidHeader(e.to_string()))?;
        let image = MrcImage::new(data, parsed.voxel_size())?;

        debug!("Decoded {} samples into shape {:?}", sample_count, image.shape());
        Ok((parsed, image))
    }

    fn read_samples(
        reader: &mut dyn SeekableReader,
        handler: &dyn ByteOrderHandler,
        mode: i32,
        count: usize,
    ) -> MrcResult<Vec<f32>> {
        let samples = match mode {
            modes::INT8 => {
                let mut raw = vec![0u8; count];
                reader.read_exact(&mut raw)?;
                raw.into_iter().map(|v| v as i8 as f32).collect()
            },
            modes::INT16 => {
                let mut raw = vec![0i16; count];
                handler.read_i16_into(reader, &mut raw)?;
                raw.into_iter().map(f32::from).collect()
            },
            modes::UINT16 => {
                let mut raw = vec![0u16; count];
                handler.read_u16_into(reader, &mut raw)?;
                raw.into_iter().map(f32::from).collect()
            },
            modes::FLOAT16 => {
                let mut raw = vec![0u16; count];
                handler.read_u16_into(reader, &mut raw)?;
                raw.into_iter().map(f16_to_f32).collect()
            },
            modes::FLOAT32 => {
                let mut raw = vec![0f32; count];
                handler.read_f32_into(reader, &mut raw)?;
                raw
            },
            other => return Err(MrcError::UnsupportedMode(other, constants::mode_name(other))),
        };
        Ok(samples)
    }
}

/// Widen an IEEE 754 half precision value
fn f16_to_f32(bits: u16) -> f32 {
    let exponent = i32::from((bits >> 10) & 0x1f);
    let mantissa = f32::from(bits & 0x3ff);
    let magnitude = match exponent {
        0 => mantissa * 2f32.powi(-24),
        0x1f if mantissa == 0.0 => f32::INFINITY,
        0x1f => f32::NAN,
        _ => (1.0 + mantissa / 1024.0) * 2f32.powi(exponent - 15),
    };
    if bits & 0x8000 != 0 { -magnitude } else { magnitude }
}
