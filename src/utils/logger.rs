//! Logger utility for application-wide logging
//!
//! Sets up `env_logger` as the backend of the `log` facade. Records go to
//! stderr and, when a log file is given, to that file as well.

use env_logger::{Builder, Env, Target};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Global logger setup
pub struct Logger;

impl Logger {
    /// Initialize the global logger
    ///
    /// # Arguments
    ///
    /// * `verbose` - Default to `debug` instead of `info` when `RUST_LOG` is unset
    /// * `log_file` - Optional file receiving a copy of every record
    ///
    /// # Returns
    ///
    /// An error if the log file cannot be created
    pub fn init_global_logger(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
        let default_level = if verbose { "debug" } else { "info" };
        let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

        if let Some(path) = log_file {
            let file = File::create(path)?;
            builder.target(Target::Pipe(Box::new(TeeWriter { file })));
        }

        if builder.try_init().is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
        Ok(())
    }
}

/// Writes every record to stderr and a file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}
