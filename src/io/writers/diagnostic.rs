use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::core::processing::budget::ValidatedBitmap;
use crate::error::Result;

pub const DIAGNOSTIC_FILE_NAME: &str = "latest_frame.png";

/// Keeps the most recent accepted bitmap on disk for inspection.
///
/// The directory lives as long as the persister and is removed on drop.
#[derive(Debug)]
pub struct DiagnosticPersister {
    dir: TempDir,
    path: PathBuf,
}

impl DiagnosticPersister {
    /// Create a scoped directory under the system temp location.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("monocast-").tempdir()?;
        Ok(Self::with_dir(dir))
    }

    /// Create the scoped directory inside `parent`.
    pub fn new_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("monocast-")
            .tempdir_in(parent)?;
        Ok(Self::with_dir(dir))
    }

    fn with_dir(dir: TempDir) -> Self {
        let path = dir.path().join(DIAGNOSTIC_FILE_NAME);
        Self { dir, path }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the diagnostic file with `bitmap`.
    pub async fn persist(&self, bitmap: &ValidatedBitmap) -> Result<()> {
        tokio::fs::write(&self.path, bitmap.bytes()).await?;
        debug!("Wrote {} bytes to {:?}", bitmap.len(), self.path);
        Ok(())
    }
}
