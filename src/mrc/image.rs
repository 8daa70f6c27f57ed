//! In-memory MRC image

use ndarray::{ArrayD, ArrayViewD, Axis};

use crate::mrc::errors::{MrcError, MrcResult};

/// Samples of one MRC file as float32
///
/// The first two axes are spatial: `(ny, nx)` for a single section and
/// `(nz, ny, nx)` for multi-section files.
#[derive(Debug, Clone, PartialEq)]
pub struct MrcImage {
    data: ArrayD<f32>,
    voxel_size: [f32; 3],
}

impl MrcImage {
    /// Wrap an array with at least two axes
    pub fn new(data: ArrayD<f32>, voxel_size: [f32; 3]) -> MrcResult<Self> {
        if data.ndim() < 2 || data.ndim() > 3 {
            return Err(MrcError::UnsupportedShape(data.shape().to_vec()));
        }
        Ok(MrcImage { data, voxel_size })
    }

    /// Length of the first axis
    pub fn height(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Length of the second axis
    pub fn width(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn voxel_size(&self) -> [f32; 3] {
        self.voxel_size
    }

    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    pub fn into_data(self) -> ArrayD<f32> {
        self.data
    }
}
