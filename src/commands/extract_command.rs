//! Folder tiling command
//!
//! Builds a single [`TilingJob`] from the command line and runs it.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::config::TilingJob;
use crate::errors::PatchResult;
use crate::orchestrator;

/// Command for tiling every file of one folder
pub struct ExtractCommand {
    job: TilingJob,
}

impl ExtractCommand {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - Matches of the `extract` subcommand
    ///
    /// # Returns
    /// A new ExtractCommand, or a configuration error
    pub fn new(args: &ArgMatches) -> PatchResult<Self> {
        let input_folder: String = required_arg(args, "input-folder")?;
        let save_folder: String = required_arg(args, "save-folder")?;
        info!("Input folder: {}", input_folder);
        info!("Save folder: {}", save_folder);

        let mut builder = TilingJob::builder(input_folder, save_folder)
            .with_tile_size(required_arg(args, "crop-size")?)
            .with_stride(required_arg(args, "step")?)
            .with_edge_threshold(required_arg(args, "thresh-size")?)
            .with_recursive(args.get_flag("recursive"))
            .with_suffix(args.get_one::<String>("suffix").cloned())
            .with_progress(!args.get_flag("no-progress"));

        if let Some(&n_thread) = args.get_one::<usize>("n-thread") {
            builder = builder.with_concurrency(n_thread);
        }
        if let Some(&level) = args.get_one::<u32>("compression-level") {
            builder = builder.with_compression_level(level);
        }

        let job = builder.build()?;
        info!(
            "Crop size: {}, step: {}, threshold: {}",
            job.tile_size(),
            job.stride(),
            job.edge_threshold()
        );

        Ok(ExtractCommand { job })
    }

    pub fn job(&self) -> &TilingJob {
        &self.job
    }
}

impl Command for ExtractCommand {
    fn execute(&self) -> PatchResult<()> {
        info!("Executing extract command");
        let summary = orchestrator::run_job(&self.job)?;
        summary.ensure_success()
    }
}
