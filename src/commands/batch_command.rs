//! Batch tiling command
//!
//! Runs the jobs of a TOML batch file one after the other. A job that
//! cannot start (for example because its save folder already exists)
//! stops the batch; per-file failures are collected and reported once all
//! jobs have run.

use clap::ArgMatches;
use log::{error, info};
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::config::BatchConfig;
use crate::errors::{PatchError, PatchResult};
use crate::orchestrator;

/// Command for running a batch file
pub struct BatchCommand {
    config_path: PathBuf,
    show_progress: bool,
}

impl BatchCommand {
    pub fn new(args: &ArgMatches) -> PatchResult<Self> {
        let config_path: String = required_arg(args, "config")?;
        Ok(BatchCommand {
            config_path: PathBuf::from(config_path),
            show_progress: !args.get_flag("no-progress"),
        })
    }
}

impl Command for BatchCommand {
    fn execute(&self) -> PatchResult<()> {
        let config = BatchConfig::load(&self.config_path, self.show_progress)?;
        info!("Running {} job(s) from {}", config.jobs.len(), self.config_path.display());

        let mut failed = 0;
        let mut total = 0;
        for (i, job) in config.jobs.iter().enumerate() {
            info!(
                "Job {}/{}: {} -> {}",
                i + 1,
                config.jobs.len(),
                job.input_dir().display(),
                job.output_dir().display()
            );
            let summary = orchestrator::run_job(job).map_err(|e| {
                error!("Job {} aborted, skipping the remaining jobs", i + 1);
                e
            })?;
            failed += summary.failures.len();
            total += summary.total;
        }

        if failed > 0 {
            return Err(PatchError::FilesFailed { failed, total });
        }
        Ok(())
    }
}
