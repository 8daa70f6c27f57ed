//! Input folder enumeration

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::errors::PatchResult;

/// Lists the regular files a job should process
pub struct FileScanner {
    recursive: bool,
    suffix: Option<String>,
}

impl FileScanner {
    pub fn new(recursive: bool, suffix: Option<&str>) -> Self {
        FileScanner {
            recursive,
            suffix: suffix.map(str::to_string),
        }
    }

    /// Collect matching files below `directory`, sorted by path
    ///
    /// Hidden entries (leading `.`) are skipped, and so is everything
    /// beneath a hidden directory.
    pub fn scan_directory(&self, directory: &Path) -> PatchResult<Vec<PathBuf>> {
        let mut walker = WalkDir::new(directory).min_depth(1).follow_links(true);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut file_paths = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = entry?;
            if entry.file_type().is_file() && self.matches_suffix(entry.path()) {
                file_paths.push(entry.into_path());
            }
        }

        file_paths.sort();
        debug!("Found {} file(s) in {}", file_paths.len(), directory.display());
        Ok(file_paths)
    }

    fn matches_suffix(&self, path: &Path) -> bool {
        match &self.suffix {
            None => true,
            Some(suffix) => path
                .file_name()
                .map(|name| name.to_string_lossy().ends_with(suffix.as_str()))
                .unwrap_or(false),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}
