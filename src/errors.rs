//! Error types for tiling runs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::mrc::MrcError;
use crate::tiling::TilingError;

/// Errors of a tiling run and of its per-file tasks
#[derive(Debug, Error)]
pub enum PatchError {
    /// Invalid or inconsistent job configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Output directory present before the run
    #[error("Folder {} already exists. Exit.", .0.display())]
    OutputExists(PathBuf),
    /// Input file could not be opened or decoded
    #[error("Failed to load {}: {}", .path.display(), .source)]
    Load {
        path: PathBuf,
        #[source]
        source: MrcError,
    },
    /// Image smaller than the tile
    #[error("Cannot tile {}: {}", .path.display(), .source)]
    InvalidDimensions {
        path: PathBuf,
        #[source]
        source: TilingError,
    },
    /// Patch file could not be written
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: MrcError,
    },
    /// I/O error outside a single file task
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Directory traversal failure
    #[error("Failed to scan input folder: {0}")]
    Scan(#[from] walkdir::Error),
    /// Some input files of a finished run failed
    #[error("{failed} of {total} file(s) failed")]
    FilesFailed { failed: usize, total: usize },
    /// Worker pool could not be created
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for tiling operations
pub type PatchResult<T> = Result<T, PatchError>;
