//! Job orchestration
//!
//! Validates the folders of a [`TilingJob`], lists its input files and runs
//! one worker task per file on a dedicated rayon pool. A failing file is
//! logged and counted; it never stops the other files.

use log::{error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::TilingJob;
use crate::errors::{PatchError, PatchResult};
use crate::utils::file_scanner::FileScanner;
use crate::utils::progress::ProgressTracker;
use crate::worker::{self, patch_file_name, WorkerReport};

/// Aggregated outcome of one job
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files found in the input folder
    pub total: usize,
    pub succeeded: usize,
    pub patches_written: usize,
    /// Files that failed, with their error
    pub failures: Vec<(PathBuf, PatchError)>,
}

impl RunSummary {
    /// Whether every file was tiled
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn per-file failures into an error for the caller's exit status
    pub fn ensure_success(&self) -> PatchResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(PatchError::FilesFailed {
                failed: self.failures.len(),
                total: self.total,
            })
        }
    }

    fn record(&mut self, path: PathBuf, result: PatchResult<WorkerReport>) {
        match result {
            Ok(report) => {
                self.succeeded += 1;
                self.patches_written += report.patches_written;
            }
            Err(e) => self.failures.push((path, e)),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s): {} succeeded, {} failed, {} patch(es) written",
            self.total,
            self.succeeded,
            self.failures.len(),
            self.patches_written
        )?;
        for (path, e) in &self.failures {
            write!(f, "\n  {}: {}", path.display(), e)?;
        }
        Ok(())
    }
}

/// Run a tiling job to completion
///
/// # Arguments
/// * `job` - Validated job configuration
///
/// # Returns
/// The run summary, or an error when the job could not start at all
pub fn run_job(job: &TilingJob) -> PatchResult<RunSummary> {
    let output_dir = job.output_dir();
    if output_dir.exists() {
        return Err(PatchError::OutputExists(output_dir.to_path_buf()));
    }
    if !job.input_dir().is_dir() {
        return Err(PatchError::Configuration(format!(
            "Input folder {} does not exist or is not a directory",
            job.input_dir().display()
        )));
    }

    let files = FileScanner::new(job.recursive(), job.suffix()).scan_directory(job.input_dir())?;
    check_unique_outputs(&files)?;

    create_output_dir(output_dir)?;
    info!("mkdir {} ...", output_dir.display());
    if files.is_empty() {
        warn!("No input files found in {}", job.input_dir().display());
    }

    info!(
        "Tiling {} file(s) with crop size {}, step {}, threshold {} on {} thread(s)",
        files.len(),
        job.tile_size(),
        job.stride(),
        job.edge_threshold(),
        job.concurrency()
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(job.concurrency())
        .thread_name(|i| format!("patch-worker-{}", i))
        .build()?;

    let progress = if job.show_progress() {
        ProgressTracker::new(files.len() as u64, "Extract Sub Images")
    } else {
        ProgressTracker::hidden(files.len() as u64)
    };

    let results: Vec<(PathBuf, PatchResult<WorkerReport>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = worker::process_file(path, job);
                match &result {
                    Ok(report) => progress.set_message(&report.message),
                    Err(e) => error!("{}", e),
                }
                progress.increment(1);
                (path.clone(), result)
            })
            .collect()
    });
    progress.finish();

    let mut summary = RunSummary {
        total: files.len(),
        ..RunSummary::default()
    };
    for (path, result) in results {
        summary.record(path, result);
    }

    if summary.is_success() {
        info!("All processes done. {}", summary);
    } else {
        error!("Finished with failures. {}", summary);
    }
    Ok(summary)
}

/// Create `dir` and its missing parents; `dir` itself must not exist yet
fn create_output_dir(dir: &Path) -> PatchResult<()> {
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir(dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => PatchError::OutputExists(dir.to_path_buf()),
        _ => PatchError::Io(e),
    })
}

/// Reject inputs whose patches would overwrite each other
fn check_unique_outputs(files: &[PathBuf]) -> PatchResult<()> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::with_capacity(files.len());
    for path in files {
        if let Some(previous) = seen.insert(patch_file_name(path, 1), path) {
            return Err(PatchError::Configuration(format!(
                "{} and {} would write the same patch files",
                previous.display(),
                path.display()
            )));
        }
    }
    Ok(())
}
