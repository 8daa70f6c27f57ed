//! Per-file tiling task
//!
//! Loads one MRC file, cuts it into patches and writes each patch next to
//! the others in the output folder.

use log::debug;
use std::path::{Path, PathBuf};

use crate::config::TilingJob;
use crate::errors::{PatchError, PatchResult};
use crate::mrc::{MrcReader, MrcWriter};
use crate::tiling::{extract_patches, TilePlan};

/// Outcome of one successfully tiled file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub source: PathBuf,
    pub patches_written: usize,
    /// Status line shown by the progress bar
    pub message: String,
}

/// Name of patch `index` cut from `source`: `{stem}_s{index:03}{ext}`
///
/// Only the last extension is split off, so `a.mrc.gz` yields
/// `a.mrc_s001.gz` and the compression of the output matches the input.
pub fn patch_file_name(source: &Path, index: usize) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match source.extension() {
        Some(ext) => format!("{}_s{:03}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_s{:03}", stem, index),
    }
}

/// Tile one file into `job.output_dir()`
///
/// # Arguments
/// * `path` - Input MRC file
/// * `job` - Run configuration shared by every task
///
/// # Returns
/// A report with the number of patches written, or the per-file error
pub fn process_file(path: &Path, job: &TilingJob) -> PatchResult<WorkerReport> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = MrcReader::new().load(path).map_err(|source| PatchError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let plan = TilePlan::new(image.height(), image.width(), job.params())
        .map_err(|source| PatchError::InvalidDimensions {
            path: path.to_path_buf(),
            source,
        })?;

    let writer = MrcWriter::new(job.compression_level());
    let mut patches_written = 0;
    for patch in extract_patches(&image, &plan) {
        let target = job.output_dir().join(patch_file_name(path, patch.index));
        writer
            .write(&patch.data.view(), image.voxel_size(), &target)
            .map_err(|source| PatchError::Write { path: target.clone(), source })?;
        patches_written += 1;
    }
    debug!("{}: wrote {} patches", stem, patches_written);

    Ok(WorkerReport {
        source: path.to_path_buf(),
        patches_written,
        message: format!("Processing {} ...", stem),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use tempfile::tempdir;

    fn write_input(dir: &Path) -> PathBuf {
        let data = ArrayD::from_shape_vec(IxDyn(&[4, 4]), (0..16).map(|v| v as f32).collect()).unwrap();
        let path = dir.join("a.mrc");
        MrcWriter::new(3).write(&data.view(), [1.0; 3], &path).unwrap();
        path
    }

    fn job_for(input: &Path, output: &Path) -> TilingJob {
        TilingJob::builder(input, output)
            .with_tile_size(2)
            .with_stride(2)
            .with_concurrency(1)
            .with_progress(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_process_file_writes_every_patch() {
        let temp = tempdir().unwrap();
        let source = write_input(temp.path());
        let output = temp.path().join("out");
        std::fs::create_dir(&output).unwrap();

        let report = process_file(&source, &job_for(temp.path(), &output)).unwrap();

        assert_eq!(report.patches_written, 4);
        assert_eq!(report.message, "Processing a ...");
        assert!(output.join("a_s004.mrc").is_file());
    }

    #[test]
    fn test_unwritable_output_is_a_write_error() {
        let temp = tempdir().unwrap();
        let source = write_input(temp.path());
        let output = temp.path().join("nope").join("out");

        let result = process_file(&source, &job_for(temp.path(), &output));

        match result {
            Err(PatchError::Write { path, .. }) => assert_eq!(path, output.join("a_s001.mrc")),
            other => panic!("expected a write error, got {:?}", other),
        }
    }

    #[test]
    fn test_patch_file_name() {
        assert_eq!(patch_file_name(Path::new("in/mic001.mrc"), 1), "mic001_s001.mrc");
        assert_eq!(patch_file_name(Path::new("mic001.mrc"), 12), "mic001_s012.mrc");
        assert_eq!(patch_file_name(Path::new("mic.mrc"), 1234), "mic_s1234.mrc");
    }

    #[test]
    fn test_patch_file_name_keeps_last_extension_only() {
        assert_eq!(patch_file_name(Path::new("a.mrc.gz"), 2), "a.mrc_s002.gz");
        assert_eq!(patch_file_name(Path::new("raw"), 3), "raw_s003");
    }
}
