//! Seekable reader trait
//!
//! The MRC reader decodes from any source addressed through this trait,
//! usually an in-memory cursor over the decompressed file.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
