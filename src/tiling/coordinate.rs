//! Tile coordinate and grid parameters
//!
//! Coordinates are offsets along the first two array axes, with (0,0) at
//! the first sample of the image.

/// Top-left corner of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    /// Offset along the first axis
    pub row: usize,

    /// Offset along the second axis
    pub col: usize,
}

impl TileCoordinate {
    pub fn new(row: usize, col: usize) -> Self {
        TileCoordinate { row, col }
    }

    /// First row after the tile (exclusive)
    pub fn end_row(&self, tile_size: usize) -> usize {
        self.row + tile_size
    }

    /// First column after the tile (exclusive)
    pub fn end_col(&self, tile_size: usize) -> usize {
        self.col + tile_size
    }
}

/// Sliding window parameters
///
/// Tiles are `tile_size` square, start every `stride` samples, and a strip
/// wider than `edge_threshold` left at the trailing edge gets one extra
/// boundary-aligned tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileParams {
    pub tile_size: usize,
    pub stride: usize,
    pub edge_threshold: usize,
}

impl TileParams {
    pub fn new(tile_size: usize, stride: usize, edge_threshold: usize) -> Self {
        TileParams { tile_size, stride, edge_threshold }
    }
}
