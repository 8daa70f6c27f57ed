//! Byte order handling for MRC files
//!
//! MRC files record their byte order in the machine stamp at header offset
//! 212. This module implements the Strategy pattern for reading header words
//! and sample data in either order.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use log::warn;
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::mrc::constants::{header, machine_stamp};

/// Represents the byte order of an MRC file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (stamp 0x44 0x44 or 0x44 0x41)
    LittleEndian,
    /// Big-endian byte order (stamp 0x11 0x11)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from a raw 1024-byte MRC header
    ///
    /// An unknown stamp falls back to whichever reading of NX is plausible.
    pub fn detect(raw_header: &[u8]) -> Self {
        let stamp = &raw_header[header::MACHST..header::MACHST + 2];

        if stamp == machine_stamp::LITTLE_ENDIAN || stamp == machine_stamp::LITTLE_ENDIAN_ALT {
            return ByteOrder::LittleEndian;
        }
        if stamp == machine_stamp::BIG_ENDIAN {
            return ByteOrder::BigEndian;
        }

        let nx_bytes = [raw_header[0], raw_header[1], raw_header[2], raw_header[3]];
        let nx_le = i32::from_le_bytes(nx_bytes);
        let guess = if nx_le > 0 && nx_le < (1 << 24) {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        };

        warn!(
            "Unrecognised machine stamp {:#04x} {:#04x}, assuming {}",
            stamp[0], stamp[1], guess.name()
        );
        guess
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian",
            ByteOrder::BigEndian => "Big Endian",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read an i32 header word
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32>;

    /// Read an f32 header word
    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;

    /// Fill `dst` with i16 samples
    fn read_i16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i16]) -> Result<()>;

    /// Fill `dst` with u16 samples
    fn read_u16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u16]) -> Result<()>;

    /// Fill `dst` with f32 samples
    fn read_f32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f32]) -> Result<()>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<LittleEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<LittleEndian>()
    }

    fn read_i16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i16]) -> Result<()> {
        reader.read_i16_into::<LittleEndian>(dst)
    }

    fn read_u16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u16]) -> Result<()> {
        reader.read_u16_into::<LittleEndian>(dst)
    }

    fn read_f32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f32]) -> Result<()> {
        reader.read_f32_into::<LittleEndian>(dst)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<BigEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<BigEndian>()
    }

    fn read_i16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i16]) -> Result<()> {
        reader.read_i16_into::<BigEndian>(dst)
    }

    fn read_u16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u16]) -> Result<()> {
        reader.read_u16_into::<BigEndian>(dst)
    }

    fn read_f32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f32]) -> Result<()> {
        reader.read_f32_into::<BigEndian>(dst)
    }
}
