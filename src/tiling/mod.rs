//! Sliding window tiling
//!
//! Plans overlapping tile grids and copies the corresponding patches out
//! of an image.

mod coordinate;
mod errors;
mod grid;
mod patch;

pub use coordinate::{TileCoordinate, TileParams};
pub use errors::TilingError;
pub use grid::{axis_offsets, tile_coordinates, TilePlan};
pub use patch::{extract_patch, extract_patches, Patch};
