//! Site bundle extraction
//!
//! Unpacks the uploaded ZIP and locates the site root: the first directory,
//! in breadth-first order with entries sorted by name, that directly
//! contains `index.html`.

use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

/// File that marks the site root
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract ZIP archive: {0}")]
    Archive(#[from] ZipError),

    #[error("Failed to extract ZIP archive: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP file must contain an index.html file")]
    NoIndexFound,
}

impl ExtractError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::NoIndexFound)
    }
}

/// Extract `archive` into `dest` and return the site root inside `dest`
pub fn extract_site(archive: &Path, dest: &Path) -> Result<PathBuf, ExtractError> {
    std::fs::create_dir_all(dest)?;

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    zip.extract(dest)?;

    tracing::debug!(entries = zip.len(), dest = %dest.display(), "Archive extracted");

    find_site_root(dest)?.ok_or(ExtractError::NoIndexFound)
}

/// Breadth-first search for the shallowest directory holding `index.html`
pub fn find_site_root(root: &Path) -> io::Result<Option<PathBuf>> {
    let mut queue = VecDeque::from([root.to_path_buf()]);

    while let Some(dir) = queue.pop_front() {
        let mut entries = std::fs::read_dir(&dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.file_name());

        let mut subdirs = Vec::new();
        for entry in entries {
            let file_type = entry.file_type()?;
            if file_type.is_file() && entry.file_name() == INDEX_FILE {
                return Ok(Some(dir));
            }
            if file_type.is_dir() {
                subdirs.push(entry.path());
            }
        }
        queue.extend(subdirs);
    }

    Ok(None)
}
