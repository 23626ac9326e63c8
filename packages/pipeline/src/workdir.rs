//! Per-job scratch directories.

use std::io;
use std::path::{Path, PathBuf};

use pipeline_core::JobId;

use crate::PipelineError;

/// A freshly created, job-named directory under the work root.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create `<root>/<job_id>`.
    ///
    /// Fails if `root` is not an existing directory or the target is already there.
    pub async fn acquire(root: &Path, job_id: JobId) -> Result<Self, PipelineError> {
        match tokio::fs::metadata(root).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(PipelineError::WorkRootMissing(root.to_path_buf())),
        }

        let path = root.join(job_id.to_string());
        match tokio::fs::create_dir(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(PipelineError::WorkDirExists(path));
            }
            Err(e) => return Err(PipelineError::io(path, e)),
        }

        tracing::debug!("Created working directory {:?}", path);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Recursively delete the directory.
    pub async fn remove(self) -> io::Result<()> {
        tokio::fs::remove_dir_all(&self.path).await
    }
}
