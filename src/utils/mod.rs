//! Utility modules for common functionality

pub mod logger;
pub mod progress;
pub mod file_scanner;
pub(crate) mod string_utils;
