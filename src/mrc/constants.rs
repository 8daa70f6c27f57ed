//! MRC2014 format constants
//!
//! Byte offsets into the fixed 1024-byte header, sample mode codes and
//! machine stamps.

/// Header layout (byte offsets)
pub mod header {
    /// Size of the fixed header in bytes
    pub const SIZE: usize = 1024;

    pub const NX: usize = 0;
    pub const MODE: usize = 12;
    pub const NXSTART: usize = 16;
    pub const MX: usize = 28;
    pub const CELLA: usize = 40;
    pub const CELLB: usize = 52;
    pub const MAPC: usize = 64;
    pub const DMIN: usize = 76;
    pub const ISPG: usize = 88;
    pub const NSYMBT: usize = 92;
    pub const EXTTYP: usize = 104;
    pub const NVERSION: usize = 108;
    pub const ORIGIN: usize = 196;
    pub const MAP: usize = 208;
    pub const MACHST: usize = 212;
    pub const RMS: usize = 216;
    pub const NLABL: usize = 220;
    pub const LABELS: usize = 224;

    /// Width of one text label
    pub const LABEL_SIZE: usize = 80;
    /// Number of label slots
    pub const LABEL_COUNT: usize = 10;

    /// Expected content of the MAP field
    pub const MAP_ID: &[u8; 4] = b"MAP ";
    /// Format version written to new files
    pub const NVERSION_2014: i32 = 20140;
}

/// Sample modes
pub mod modes {
    /// 8-bit signed integer
    pub const INT8: i32 = 0;
    /// 16-bit signed integer
    pub const INT16: i32 = 1;
    /// 32-bit float
    pub const FLOAT32: i32 = 2;
    /// Complex 16-bit integers
    pub const COMPLEX_INT16: i32 = 3;
    /// Complex 32-bit floats
    pub const COMPLEX_FLOAT32: i32 = 4;
    /// 16-bit unsigned integer
    pub const UINT16: i32 = 6;
    /// 16-bit float
    pub const FLOAT16: i32 = 12;
}

/// Machine stamps (first two bytes are significant)
pub mod machine_stamp {
    pub const LITTLE_ENDIAN: [u8; 2] = [0x44, 0x44];
    pub const LITTLE_ENDIAN_ALT: [u8; 2] = [0x44, 0x41];
    pub const BIG_ENDIAN: [u8; 2] = [0x11, 0x11];
}

/// Space group values
pub mod space_group {
    /// Single image or image stack
    pub const IMAGE: i32 = 0;
    /// Volume
    pub const VOLUME: i32 = 1;
}

/// Returns the size in bytes of one sample, or None for unsupported modes
pub fn bytes_per_sample(mode: i32) -> Option<usize> {
    match mode {
        modes::INT8 => Some(1),
        modes::INT16 | modes::UINT16 | modes::FLOAT16 => Some(2),
        modes::FLOAT32 => Some(4),
        _ => None,
    }
}

/// Human readable name of a sample mode
pub fn mode_name(mode: i32) -> &'static str {
    match mode {
        modes::INT8 => "int8",
        modes::INT16 => "int16",
        modes::FLOAT32 => "float32",
        modes::COMPLEX_INT16 => "complex int16",
        modes::COMPLEX_FLOAT32 => "complex float32",
        modes::UINT16 => "uint16",
        modes::FLOAT16 => "float16",
        _ => "unknown",
    }
}
