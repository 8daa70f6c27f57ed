use std::path::Path;
use std::process;
use log::error;

use patchkit::commands::{build_cli, CommandFactory, PatchkitCommandFactory};
use patchkit::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let verbose = matches.get_flag("verbose");
    let log_file = matches.get_one::<String>("log-file").map(Path::new);
    if let Err(e) = Logger::init_global_logger(verbose, log_file) {
        eprintln!("Error initializing logger: {}", e);
        process::exit(1);
    }

    let factory = PatchkitCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
