//! Errors raised while planning a tile grid

use thiserror::Error;

/// Tile grid errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilingError {
    /// Tile does not fit inside the image along one axis
    #[error("tile size {tile_size} exceeds image {axis} {dimension}")]
    InvalidDimensions {
        axis: &'static str,
        dimension: usize,
        tile_size: usize,
    },
    /// Tile size or stride of zero
    #[error("{0} must be greater than zero")]
    InvalidParameter(&'static str),
}
