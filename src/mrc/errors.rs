//! Error types for MRC reading and writing

use std::io;
use thiserror::Error;

/// MRC-specific error types
#[derive(Debug, Error)]
pub enum MrcError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    /// File is shorter than the fixed header
    #[error("File too short for an MRC header ({0} bytes)")]
    TruncatedHeader(usize),
    /// Header values are not usable
    #[error("Invalid MRC header: {0}")]
    InvalidHeader(String),
    /// Sample mode the codec cannot decode
    #[error("Unsupported MRC mode {0} ({1})")]
    UnsupportedMode(i32, &'static str),
    /// Fewer sample bytes than the header announces
    #[error("Truncated data block: expected {expected} bytes, found {found}")]
    TruncatedData { expected: usize, found: usize },
    /// Array cannot be written as an MRC map
    #[error("Unsupported data shape {0:?}")]
    UnsupportedShape(Vec<usize>),
    /// Compression layer failure
    #[error("{0} error: {1}")]
    CompressionError(&'static str, String),
}

/// Result type for MRC operations
pub type MrcResult<T> = Result<T, MrcError>;
