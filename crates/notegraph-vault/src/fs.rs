//! Filesystem-backed [`ContentSource`].

use notegraph_core::config::DEFAULT_MAX_FILE_SIZE;
use notegraph_core::{ContentSource, Error, Result};
use std::path::Path;

/// Reads documents straight from disk, refusing files above a size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct FsContentSource {
    max_file_size: u64,
}

impl FsContentSource {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Default for FsContentSource {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl ContentSource for FsContentSource {
    fn read_content(&self, path: &Path) -> Result<String> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::file_not_found(path),
            _ => Error::io(e),
        })?;

        if metadata.len() > self.max_file_size {
            return Err(Error::file_too_large(
                path,
                metadata.len(),
                self.max_file_size,
            ));
        }

        std::fs::read_to_string(path).map_err(Error::io)
    }
}
