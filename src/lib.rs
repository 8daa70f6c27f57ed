pub mod io;
pub mod mrc;
pub mod compression;
pub mod tiling;
pub mod utils;
pub mod config;
pub mod errors;
pub mod worker;
pub mod orchestrator;
pub mod commands;
pub mod api;

pub use crate::api::PatchKit;

pub use config::{BatchConfig, TilingJob, TilingJobBuilder};
pub use errors::{PatchError, PatchResult};
pub use mrc::{MrcHeader, MrcImage, MrcReader, MrcWriter};
pub use orchestrator::{run_job, RunSummary};
pub use tiling::{TileCoordinate, TileParams, TilePlan};
pub use worker::{patch_file_name, process_file, WorkerReport};
