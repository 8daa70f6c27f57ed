//! Job configuration
//!
//! A [`TilingJob`] fully describes one run: where to read, where to write,
//! and how to tile. Jobs are built through [`TilingJobBuilder`], which
//! validates every value, and never change afterwards. Several jobs can be
//! listed in a TOML batch file:
//!
//! ```toml
//! n_thread = 64
//! compression_level = 3
//!
//! [[job]]
//! input_folder = "datasets/empiar10028/train/empiar10028_train_HR"
//! save_folder = "datasets/empiar10028/train/empiar10028_train_HR_sub"
//! crop_size = 480
//! step = 240
//! thresh_size = 0
//! ```
//!
//! Top-level keys are defaults that each `[[job]]` table may override.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::errors::{PatchError, PatchResult};
use crate::tiling::TileParams;

/// Compression level used when none is configured
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 3;

/// Highest level any supported encoder accepts
const MAX_COMPRESSION_LEVEL: u32 = 22;

/// Worker count used when none is configured
pub fn default_concurrency() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Immutable configuration of one tiling run
#[derive(Debug, Clone, PartialEq)]
pub struct TilingJob {
    input_dir: PathBuf,
    output_dir: PathBuf,
    params: TileParams,
    concurrency: usize,
    compression_level: u32,
    recursive: bool,
    suffix: Option<String>,
    show_progress: bool,
}

impl TilingJob {
    /// Start building a job reading `input_dir` and writing `output_dir`
    pub fn builder(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> TilingJobBuilder {
        TilingJobBuilder::new(input_dir, output_dir)
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn params(&self) -> &TileParams {
        &self.params
    }

    pub fn tile_size(&self) -> usize {
        self.params.tile_size
    }

    pub fn stride(&self) -> usize {
        self.params.stride
    }

    pub fn edge_threshold(&self) -> usize {
        self.params.edge_threshold
    }

    /// Number of files processed at the same time
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Level handed to the output encoder when patches are written compressed
    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }

    /// Whether subdirectories of the input folder are scanned
    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// Only files ending with this suffix are processed
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn show_progress(&self) -> bool {
        self.show_progress
    }
}

/// Builder for [`TilingJob`]
#[derive(Debug, Clone)]
pub struct TilingJobBuilder {
    input_dir: PathBuf,
    output_dir: PathBuf,
    tile_size: Option<usize>,
    stride: Option<usize>,
    edge_threshold: usize,
    concurrency: Option<usize>,
    compression_level: u32,
    recursive: bool,
    suffix: Option<String>,
    show_progress: bool,
}

impl TilingJobBuilder {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        TilingJobBuilder {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            tile_size: None,
            stride: None,
            edge_threshold: 0,
            concurrency: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            recursive: false,
            suffix: None,
            show_progress: true,
        }
    }

    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn with_edge_threshold(mut self, edge_threshold: usize) -> Self {
        self.edge_threshold = edge_threshold;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn with_compression_level(mut self, compression_level: u32) -> Self {
        self.compression_level = compression_level;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix.filter(|s| !s.is_empty());
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> PatchResult<TilingJob> {
        let tile_size = self.tile_size
            .ok_or_else(|| PatchError::Configuration("crop_size is required".to_string()))?;
        let stride = self.stride
            .ok_or_else(|| PatchError::Configuration("step is required".to_string()))?;
        let concurrency = self.concurrency.unwrap_or_else(default_concurrency);

        if tile_size == 0 {
            return Err(PatchError::Configuration("crop_size must be greater than zero".to_string()));
        }
        if stride == 0 {
            return Err(PatchError::Configuration("step must be greater than zero".to_string()));
        }
        if concurrency == 0 {
            return Err(PatchError::Configuration("n_thread must be greater than zero".to_string()));
        }
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(PatchError::Configuration(format!(
                "compression_level {} is above the maximum of {}",
                self.compression_level, MAX_COMPRESSION_LEVEL
            )));
        }
        if self.input_dir == self.output_dir {
            return Err(PatchError::Configuration(
                "input_folder and save_folder must differ".to_string(),
            ));
        }

        Ok(TilingJob {
            input_dir: self.input_dir,
            output_dir: self.output_dir,
            params: TileParams::new(tile_size, stride, self.edge_threshold),
            concurrency,
            compression_level: self.compression_level,
            recursive: self.recursive,
            suffix: self.suffix,
            show_progress: self.show_progress,
        })
    }
}

/// Jobs loaded from a TOML batch file, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub jobs: Vec<TilingJob>,
}

impl BatchConfig {
    /// Load a batch file from disk
    pub fn load(path: &Path, show_progress: bool) -> PatchResult<Self> {
        info!("Loading batch configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content, show_progress)
    }

    /// Parse batch configuration text
    pub fn from_toml_str(content: &str, show_progress: bool) -> PatchResult<Self> {
        let root: toml::Value = content
            .parse()
            .map_err(|e: toml::de::Error| PatchError::Configuration(format!("Invalid TOML: {}", e)))?;
        let root = root
            .as_table()
            .ok_or_else(|| PatchError::Configuration("Batch file must be a table".to_string()))?;

        let job_tables = match root.get("job") {
            Some(toml::Value::Array(items)) => items,
            Some(_) => return Err(PatchError::Configuration("'job' must be an array of tables".to_string())),
            None => return Err(PatchError::Configuration("Batch file contains no [[job]] entries".to_string())),
        };

        let mut jobs = Vec::with_capacity(job_tables.len());
        for (i, item) in job_tables.iter().enumerate() {
            let table = item
                .as_table()
                .ok_or_else(|| PatchError::Configuration(format!("job #{} is not a table", i + 1)))?;
            let job = Self::parse_job(table, root, show_progress)
                .map_err(|e| match e {
                    PatchError::Configuration(msg) => PatchError::Configuration(format!("job #{}: {}", i + 1, msg)),
                    other => other,
                })?;
            debug!("Parsed job #{}: {:?}", i + 1, job);
            jobs.push(job);
        }

        Ok(BatchConfig { jobs })
    }

    fn parse_job(job: &toml::value::Table, defaults: &toml::value::Table, show_progress: bool) -> PatchResult<TilingJob> {
        let input_dir = get_string(job, defaults, "input_folder")?
            .ok_or_else(|| PatchError::Configuration("input_folder is required".to_string()))?;
        let output_dir = get_string(job, defaults, "save_folder")?
            .ok_or_else(|| PatchError::Configuration("save_folder is required".to_string()))?;

        let mut builder = TilingJob::builder(input_dir, output_dir)
            .with_suffix(get_string(job, defaults, "suffix")?)
            .with_progress(show_progress);

        if let Some(tile_size) = get_unsigned(job, defaults, "crop_size")? {
            builder = builder.with_tile_size(tile_size as usize);
        }
        if let Some(stride) = get_unsigned(job, defaults, "step")? {
            builder = builder.with_stride(stride as usize);
        }
        if let Some(edge_threshold) = get_unsigned(job, defaults, "thresh_size")? {
            builder = builder.with_edge_threshold(edge_threshold as usize);
        }
        if let Some(concurrency) = get_unsigned(job, defaults, "n_thread")? {
            builder = builder.with_concurrency(concurrency as usize);
        }
        if let Some(level) = get_unsigned(job, defaults, "compression_level")? {
            let level = u32::try_from(level)
                .map_err(|_| PatchError::Configuration(format!("compression_level {} out of range", level)))?;
            builder = builder.with_compression_level(level);
        }
        if let Some(recursive) = lookup(job, defaults, "recursive") {
            let recursive = recursive
                .as_bool()
                .ok_or_else(|| PatchError::Configuration("recursive must be a boolean".to_string()))?;
            builder = builder.with_recursive(recursive);
        }

        builder.build()
    }
}

fn lookup<'a>(job: &'a toml::value::Table, defaults: &'a toml::value::Table, key: &str) -> Option<&'a toml::Value> {
    job.get(key).or_else(|| defaults.get(key))
}

fn get_string(job: &toml::value::Table, defaults: &toml::value::Table, key: &str) -> PatchResult<Option<String>> {
    match lookup(job, defaults, key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PatchError::Configuration(format!("{} must be a string", key))),
    }
}

fn get_unsigned(job: &toml::value::Table, defaults: &toml::value::Table, key: &str) -> PatchResult<Option<u64>> {
    match lookup(job, defaults, key) {
        None => Ok(None),
        Some(toml::Value::Integer(i)) if *i >= 0 => Ok(Some(*i as u64)),
        Some(_) => Err(PatchError::Configuration(format!("{} must be a non-negative integer", key))),
    }
}
