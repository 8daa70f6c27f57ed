use log::info;
use std::path::Path;

use crate::config::TilingJob;
use crate::errors::{PatchError, PatchResult};
use crate::mrc::{MrcHeader, MrcReader};
use crate::orchestrator::{self, RunSummary};
use crate::tiling::{TileParams, TilePlan};
use crate::worker::{self, WorkerReport};

/// Main interface to the PatchKit library
#[derive(Debug, Default, Clone, Copy)]
pub struct PatchKit;

impl PatchKit {
    pub fn new() -> Self {
        PatchKit
    }

    /// Tile every file of a job's input folder
    ///
    /// # Arguments
    /// * `job` - Job configuration
    ///
    /// # Returns
    /// Summary of the run, or an error if the run could not start
    pub fn run_job(&self, job: &TilingJob) -> PatchResult<RunSummary> {
        orchestrator::run_job(job)
    }

    /// Tile a single file into the job's output folder
    ///
    /// The output folder must already exist.
    pub fn tile_file(&self, input_path: &Path, job: &TilingJob) -> PatchResult<WorkerReport> {
        info!("Tiling single file {}", input_path.display());
        worker::process_file(input_path, job)
    }

    /// Read the header of an MRC file
    pub fn read_header(&self, input_path: &Path) -> PatchResult<MrcHeader> {
        MrcReader::new()
            .load_header(input_path)
            .map_err(|source| PatchError::Load { path: input_path.to_path_buf(), source })
    }

    /// Plan the tiles of a file without reading its samples
    ///
    /// # Arguments
    /// * `input_path` - MRC file
    /// * `params` - Sliding window parameters
    ///
    /// # Returns
    /// The tile plan, or an error when the file is unreadable or too small
    pub fn plan(&self, input_path: &Path, params: &TileParams) -> PatchResult<TilePlan> {
        let header = self.read_header(input_path)?;
        let shape = header.data_shape();
        TilePlan::new(shape[0], shape[1], params).map_err(|source| PatchError::InvalidDimensions {
            path: input_path.to_path_buf(),
            source,
        })
    }
}
