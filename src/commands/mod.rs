//! CLI command implementations
//!
//! This module contains the CLI definition and the commands behind each
//! subcommand, using the Command pattern.

pub mod command_traits;
pub mod extract_command;
pub mod batch_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use batch_command::BatchCommand;
pub use inspect_command::InspectCommand;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::errors::{PatchError, PatchResult};

/// Builds the `patchkit` command line
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("patchkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cut MRC micrographs into overlapping square patches")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log records to this file")
                .value_name("FILE")
                .global(true)
                .required(false),
        )
        .subcommand(
            tile_args(
                ClapCommand::new("extract")
                    .about("Tile every MRC file of a folder")
                    .arg(
                        Arg::new("input-folder")
                            .long("input-folder")
                            .help("Folder with the input MRC files")
                            .value_name("DIR")
                            .required(true),
                    )
                    .arg(
                        Arg::new("save-folder")
                            .long("save-folder")
                            .help("Folder receiving the patches; must not exist yet")
                            .value_name("DIR")
                            .required(true),
                    ),
                true,
            )
            .arg(
                Arg::new("n-thread")
                    .long("n-thread")
                    .help("Number of files processed in parallel (default: CPU count)")
                    .value_name("N")
                    .value_parser(value_parser!(usize))
                    .required(false),
            )
            .arg(
                Arg::new("compression-level")
                    .long("compression-level")
                    .help("Level used for .gz/.zst outputs (default: 3)")
                    .value_name("LEVEL")
                    .value_parser(value_parser!(u32))
                    .required(false),
            )
            .arg(
                Arg::new("recursive")
                    .long("recursive")
                    .help("Also scan subfolders of the input folder")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("suffix")
                    .long("suffix")
                    .help("Only process files whose name ends with this suffix")
                    .value_name("SUFFIX")
                    .required(false),
            )
            .arg(no_progress_arg()),
        )
        .subcommand(
            ClapCommand::new("batch")
                .about("Run the jobs listed in a TOML file, in order")
                .arg(
                    Arg::new("config")
                        .help("Batch configuration file")
                        .value_name("CONFIG")
                        .required(true)
                        .index(1),
                )
                .arg(no_progress_arg()),
        )
        .subcommand(tile_args(
            ClapCommand::new("inspect")
                .about("Print the header of an MRC file and, optionally, its tile plan")
                .arg(
                    Arg::new("input")
                        .help("Input MRC file")
                        .value_name("FILE")
                        .required(true)
                        .index(1),
                ),
            false,
        ))
}

/// Adds the sliding window arguments to a subcommand
fn tile_args(command: ClapCommand, required: bool) -> ClapCommand {
    command
        .arg(
            Arg::new("crop-size")
                .long("crop-size")
                .help("Edge length of each square patch")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize))
                .required(required),
        )
        .arg(
            Arg::new("step")
                .long("step")
                .help("Distance between neighbouring patch origins")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize))
                .required(required)
                .requires("crop-size"),
        )
        .arg(
            Arg::new("thresh-size")
                .long("thresh-size")
                .help("Trailing strips wider than this get one extra edge-aligned patch")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
}

fn no_progress_arg() -> Arg {
    Arg::new("no-progress")
        .long("no-progress")
        .help("Do not draw a progress bar")
        .action(ArgAction::SetTrue)
}

/// Fetch a required argument clap has already validated
fn required_arg<T: Clone + Send + Sync + 'static>(args: &ArgMatches, name: &str) -> PatchResult<T> {
    args.get_one::<T>(name)
        .cloned()
        .ok_or_else(|| PatchError::Configuration(format!("Missing argument --{}", name)))
}

/// Factory for creating command instances based on CLI arguments
pub struct PatchkitCommandFactory;

impl PatchkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        PatchkitCommandFactory
    }
}

impl Default for PatchkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for PatchkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> PatchResult<Box<dyn Command>> {
        match args.subcommand() {
            Some(("extract", sub)) => Ok(Box::new(ExtractCommand::new(sub)?)),
            Some(("batch", sub)) => Ok(Box::new(BatchCommand::new(sub)?)),
            Some(("inspect", sub)) => Ok(Box::new(InspectCommand::new(sub)?)),
            Some((other, _)) => Err(PatchError::Configuration(format!("Unknown command: {}", other))),
            None => Err(PatchError::Configuration("No command given".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_factory_builds_each_subcommand() {
        let factory = PatchkitCommandFactory::new();
        for argv in [
            vec!["patchkit", "extract", "--input-folder", "in", "--save-folder", "out", "--crop-size", "480", "--step", "240"],
            vec!["patchkit", "batch", "jobs.toml"],
            vec!["patchkit", "inspect", "mic.mrc"],
        ] {
            let matches = build_cli().try_get_matches_from(argv).unwrap();
            assert!(factory.create_command(&matches).is_ok());
        }
    }

    #[test]
    fn test_extract_requires_window_arguments() {
        let result = build_cli().try_get_matches_from([
            "patchkit", "extract", "--input-folder", "in", "--save-folder", "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_step_is_a_configuration_error() {
        let matches = build_cli()
            .try_get_matches_from([
                "patchkit", "extract", "--input-folder", "in", "--save-folder", "out",
                "--crop-size", "480", "--step", "0",
            ])
            .unwrap();
        let result = PatchkitCommandFactory::new().create_command(&matches);
        assert!(matches!(result, Err(PatchError::Configuration(_))));
    }
}
