//! Per-request temporary workspace
//!
//! Holds the uploaded archive and its extracted tree. The directory is removed
//! when the workspace is closed or dropped, whichever comes first.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ARCHIVE_FILE: &str = "site.zip";
const EXTRACT_DIR: &str = "unzipped";

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under `parent`, creating `parent` if needed
    pub fn create(parent: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(parent)?;
        let dir = tempfile::Builder::new().prefix("deploy-").tempdir_in(parent)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn archive_path(&self) -> PathBuf {
        self.dir.path().join(ARCHIVE_FILE)
    }

    pub fn extract_dir(&self) -> PathBuf {
        self.dir.path().join(EXTRACT_DIR)
    }

    /// Remove the workspace. Failures are logged, never returned.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Workspace removed"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to cleanup temp files"),
        }
    }
}
