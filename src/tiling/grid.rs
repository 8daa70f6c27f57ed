//! Sliding window grid generation
//!
//! Offsets are generated per axis and combined in row-major order. Along
//! each axis the regular grid `0, stride, 2*stride, ..` is kept while a tile
//! still fits; if the strip left uncovered at the end is wider than the edge
//! threshold, one more tile aligned to the image boundary is appended.

use log::debug;

use super::coordinate::{TileCoordinate, TileParams};
use super::errors::TilingError;

/// Offsets of all tiles along one axis
///
/// # Arguments
/// * `axis` - Axis name used in errors ("height" or "width")
/// * `dimension` - Length of the axis
/// * `params` - Tile size, stride and edge threshold
///
/// # Returns
/// Strictly increasing offsets, each satisfying `offset + tile_size <= dimension`
pub fn axis_offsets(axis: &'static str, dimension: usize, params: &TileParams) -> Result<Vec<usize>, TilingError> {
    if params.tile_size == 0 {
        return Err(TilingError::InvalidParameter("tile size"));
    }
    if params.stride == 0 {
        return Err(TilingError::InvalidParameter("stride"));
    }
    if params.tile_size > dimension {
        return Err(TilingError::InvalidDimensions {
            axis,
            dimension,
            tile_size: params.tile_size,
        });
    }

    let last_start = dimension - params.tile_size;
    let mut offsets: Vec<usize> = (0..=last_start).step_by(params.stride).collect();

    // Non-empty: 0 is always a valid start once the tile fits.
    let last_regular = offsets[offsets.len() - 1];
    let remainder = dimension - (last_regular + params.tile_size);
    if remainder > params.edge_threshold {
        offsets.push(last_start);
    }

    Ok(offsets)
}

/// Tile offsets for a whole image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlan {
    /// Offsets along the first axis
    pub row_offsets: Vec<usize>,
    /// Offsets along the second axis
    pub col_offsets: Vec<usize>,
    /// Edge length of every tile
    pub tile_size: usize,
}

impl TilePlan {
    /// Plan the tiles of an image of `height` x `width`
    pub fn new(height: usize, width: usize, params: &TileParams) -> Result<Self, TilingError> {
        let row_offsets = axis_offsets("height", height, params)?;
        let col_offsets = axis_offsets("width", width, params)?;
        debug!(
            "Tile plan for {}x{}: {} rows x {} cols",
            height, width, row_offsets.len(), col_offsets.len()
        );

        Ok(TilePlan {
            row_offsets,
            col_offsets,
            tile_size: params.tile_size,
        })
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.row_offsets.len() * self.col_offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates in row-major order: every column of the first row, then the next row
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        self.row_offsets.iter().flat_map(move |&row| {
            self.col_offsets.iter().map(move |&col| TileCoordinate::new(row, col))
        })
    }
}

/// Row-major tile coordinates of an image of `height` x `width`
pub fn tile_coordinates(height: usize, width: usize, params: &TileParams) -> Result<Vec<TileCoordinate>, TilingError> {
    Ok(TilePlan::new(height, width, params)?.coordinates().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tile_size: usize, stride: usize, edge_threshold: usize) -> TileParams {
        TileParams::new(tile_size, stride, edge_threshold)
    }

    #[test]
    fn test_regular_grid_lands_on_boundary() {
        let offsets = axis_offsets("width", 1000, &params(400, 200, 0)).unwrap();
        assert_eq!(offsets, vec![0, 200, 400, 600]);
    }

    #[test]
    fn test_edge_tile_appended() {
        let offsets = axis_offsets("height", 500, &params(480, 240, 0)).unwrap();
        assert_eq!(offsets, vec![0, 20]);
    }

    #[test]
    fn test_small_remainder_dropped_below_threshold() {
        // 1000 - (480 + 480) = 40 uncovered
        assert_eq!(axis_offsets("width", 1000, &params(480, 480, 40)).unwrap(), vec![0, 480]);
        assert_eq!(axis_offsets("width", 1000, &params(480, 480, 39)).unwrap(), vec![0, 480, 520]);
    }

    #[test]
    fn test_exact_tile_size_gives_single_offset() {
        assert_eq!(axis_offsets("width", 480, &params(480, 240, 0)).unwrap(), vec![0]);
        assert_eq!(tile_coordinates(480, 480, &params(480, 240, 0)).unwrap(), vec![TileCoordinate::new(0, 0)]);
    }

    #[test]
    fn test_tile_larger_than_image_is_rejected() {
        let result = axis_offsets("height", 100, &params(120, 60, 0));
        assert_eq!(
            result,
            Err(TilingError::InvalidDimensions { axis: "height", dimension: 100, tile_size: 120 })
        );

        let result = TilePlan::new(500, 100, &params(120, 60, 0));
        assert!(matches!(result, Err(TilingError::InvalidDimensions { axis: "width", .. })));
    }

    #[test]
    fn test_zero_parameters_rejected() {
        assert_eq!(axis_offsets("width", 10, &params(0, 1, 0)), Err(TilingError::InvalidParameter("tile size")));
        assert_eq!(axis_offsets("width", 10, &params(4, 0, 0)), Err(TilingError::InvalidParameter("stride")));
    }

    #[test]
    fn test_stride_larger_than_tile_leaves_gaps() {
        assert_eq!(axis_offsets("width", 100, &params(10, 30, 0)).unwrap(), vec![0, 30, 60, 90]);
        assert_eq!(axis_offsets("width", 105, &params(10, 30, 0)).unwrap(), vec![0, 30, 60, 90, 95]);
    }

    #[test]
    fn test_offsets_are_increasing_and_in_bounds() {
        for dimension in 1..120 {
            for tile_size in 1..=dimension.min(40) {
                for stride in 1..25 {
                    for edge_threshold in [0, 3, 17] {
                        let p = params(tile_size, stride, edge_threshold);
                        let offsets = axis_offsets("width", dimension, &p).unwrap();

                        assert_eq!(offsets[0], 0);
                        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
                        assert!(offsets.iter().all(|&o| o + tile_size <= dimension));
                        if edge_threshold == 0 {
                            assert_eq!(*offsets.last().unwrap(), dimension - tile_size);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_coordinates_are_row_major() {
        let plan = TilePlan::new(500, 1000, &params(480, 240, 0)).unwrap();
        assert_eq!(plan.row_offsets, vec![0, 20]);
        assert_eq!(plan.col_offsets, vec![0, 240, 480, 520]);
        assert_eq!(plan.len(), 8);

        let coords: Vec<(usize, usize)> = plan.coordinates().map(|c| (c.row, c.col)).collect();
        assert_eq!(
            coords,
            vec![(0, 0), (0, 240), (0, 480), (0, 520), (20, 0), (20, 240), (20, 480), (20, 520)]
        );
    }

    #[test]
    fn test_planning_is_deterministic() {
        let p = params(120, 60, 0);
        assert_eq!(tile_coordinates(1000, 700, &p).unwrap(), tile_coordinates(1000, 700, &p).unwrap());
    }
}
