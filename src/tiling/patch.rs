//! Patch extraction
//!
//! Copies tile-sized sub-arrays out of an image. Axes beyond the first two
//! are taken in full.

use ndarray::{ArrayD, ArrayViewD, Slice};

use crate::mrc::MrcImage;
use super::coordinate::TileCoordinate;
use super::grid::TilePlan;

/// One extracted patch
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// 1-based position in row-major order
    pub index: usize,
    pub coordinate: TileCoordinate,
    /// Owned, standard layout copy of the samples
    pub data: ArrayD<f32>,
}

/// Copy `image[row..row+tile, col..col+tile, ..]`
pub fn extract_patch(image: &ArrayViewD<'_, f32>, coordinate: TileCoordinate, tile_size: usize) -> ArrayD<f32> {
    image
        .slice_each_axis(|ax| match ax.axis.index() {
            0 => Slice::from(coordinate.row..coordinate.end_row(tile_size)),
            1 => Slice::from(coordinate.col..coordinate.end_col(tile_size)),
            _ => Slice::from(..),
        })
        .as_standard_layout()
        .into_owned()
}

/// Lazily extract every patch of `plan`, in order, starting at index 1
pub fn extract_patches<'a>(image: &'a MrcImage, plan: &'a TilePlan) -> impl Iterator<Item = Patch> + 'a {
    plan.coordinates().enumerate().map(move |(i, coordinate)| Patch {
        index: i + 1,
        coordinate,
        data: extract_patch(&image.view(), coordinate, plan.tile_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::TileParams;
    use ndarray::IxDyn;

    fn ramp(shape: &[usize]) -> MrcImage {
        let count: usize = shape.iter().product();
        let data = ArrayD::from_shape_vec(IxDyn(shape), (0..count).map(|v| v as f32).collect()).unwrap();
        MrcImage::new(data, [1.0; 3]).unwrap()
    }

    #[test]
    fn test_extract_patch_copies_window() {
        let image = ramp(&[4, 5]);
        let patch = extract_patch(&image.view(), TileCoordinate::new(1, 2), 2);

        assert_eq!(patch.shape(), &[2, 2]);
        assert_eq!(patch.iter().copied().collect::<Vec<_>>(), vec![7.0, 8.0, 12.0, 13.0]);
        assert!(patch.is_standard_layout());
    }

    #[test]
    fn test_trailing_axes_taken_in_full() {
        let image = ramp(&[4, 4, 3]);
        let patch = extract_patch(&image.view(), TileCoordinate::new(2, 1), 2);

        assert_eq!(patch.shape(), &[2, 2, 3]);
        assert_eq!(patch[[0, 0, 0]], image.view()[[2, 1, 0]]);
        assert_eq!(patch[[1, 1, 2]], image.view()[[3, 2, 2]]);
    }

    #[test]
    fn test_every_patch_has_tile_shape_and_sequential_index() {
        let image = ramp(&[10, 7]);
        let plan = TilePlan::new(10, 7, &TileParams::new(4, 3, 0)).unwrap();
        let patches: Vec<Patch> = extract_patches(&image, &plan).collect();

        assert_eq!(patches.len(), plan.len());
        assert_eq!(patches.len(), 3 * 2);
        for (i, patch) in patches.iter().enumerate() {
            assert_eq!(patch.index, i + 1);
            assert_eq!(patch.data.shape(), &[4, 4]);
        }
        assert_eq!(patches.last().unwrap().coordinate, TileCoordinate::new(6, 3));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let image = ramp(&[9, 9]);
        let plan = TilePlan::new(9, 9, &TileParams::new(5, 2, 0)).unwrap();
        let first: Vec<Patch> = extract_patches(&image, &plan).collect();
        let second: Vec<Patch> = extract_patches(&image, &plan).collect();
        assert_eq!(first, second);
    }
}
