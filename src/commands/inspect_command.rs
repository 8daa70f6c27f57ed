//! MRC inspection command
//!
//! Shows the header of one file and, when window arguments are given, the
//! tiles an extract run would cut from it. Nothing is written.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::api::PatchKit;
use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::PatchResult;
use crate::tiling::TileParams;
use crate::worker::patch_file_name;

/// Command for inspecting a single MRC file
pub struct InspectCommand {
    input_file: PathBuf,
    /// Window to plan, if requested
    params: Option<TileParams>,
}

impl InspectCommand {
    pub fn new(args: &ArgMatches) -> PatchResult<Self> {
        let input_file: String = required_arg(args, "input")?;

        let params = match args.get_one::<usize>("crop-size") {
            Some(&tile_size) => {
                let stride = args.get_one::<usize>("step").copied().unwrap_or(tile_size);
                let edge_threshold = required_arg(args, "thresh-size")?;
                Some(TileParams::new(tile_size, stride, edge_threshold))
            }
            None => None,
        };

        Ok(InspectCommand {
            input_file: PathBuf::from(input_file),
            params,
        })
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> PatchResult<()> {
        let kit = PatchKit::new();
        let header = kit.read_header(&self.input_file)?;
        for line in header.to_string().lines() {
            info!("{}", line);
        }

        let Some(params) = &self.params else {
            return Ok(());
        };

        let plan = kit.plan(&self.input_file, params)?;
        info!("Tile plan ({} patches):", plan.len());
        info!("  Row offsets: {:?}", plan.row_offsets);
        info!("  Column offsets: {:?}", plan.col_offsets);
        for (i, coordinate) in plan.coordinates().enumerate() {
            info!(
                "  {} <- rows {}..{}, cols {}..{}",
                patch_file_name(&self.input_file, i + 1),
                coordinate.row,
                coordinate.end_row(plan.tile_size),
                coordinate.col,
                coordinate.end_col(plan.tile_size)
            );
        }
        Ok(())
    }
}
