//! Relocation of results into per-project final storage.

use std::io;
use std::path::{Path, PathBuf};

use pipeline_core::ProjectId;
use pipeline_core::layout::RELOCATED_FILES;

use crate::PipelineError;

/// Validate a project id for use as a single directory name.
pub fn project_dir_name(project_id: &ProjectId) -> Result<&str, PipelineError> {
    let name = project_id.as_str().trim();
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(PipelineError::InvalidProjectId(project_id.to_string()));
    }
    Ok(name)
}

/// Move the result files of `workdir` into `<final_root>/<project_id>/`.
///
/// Returns the project directory.
pub(crate) async fn relocate(
    workdir: &Path,
    final_root: &Path,
    project_id: &ProjectId,
) -> Result<PathBuf, PipelineError> {
    let name = project_dir_name(project_id)?;
    match tokio::fs::metadata(final_root).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(PipelineError::FinalRootMissing(final_root.to_path_buf())),
    }

    // Nothing is moved unless every result is present.
    for file_name in RELOCATED_FILES {
        let source = workdir.join(file_name);
        if !tokio::fs::try_exists(&source).await.unwrap_or(false) {
            return Err(PipelineError::MissingSource(source));
        }
    }

    let project_dir = final_root.join(name);
    tokio::fs::create_dir_all(&project_dir)
        .await
        .map_err(|e| PipelineError::io(&project_dir, e))?;

    for file_name in RELOCATED_FILES {
        let source = workdir.join(file_name);
        let destination = project_dir.join(file_name);
        move_file(&source, &destination)
            .await
            .map_err(|e| PipelineError::io(&destination, e))?;

        if !tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            return Err(PipelineError::RelocationUnverified(destination));
        }
        tracing::debug!("Moved {:?} to {:?}", source, destination);
    }

    Ok(project_dir)
}

async fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match tokio::fs::rename(source, destination).await {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tokio::fs::copy(source, destination).await?;
            tokio::fs::remove_file(source).await
        }
        other => other,
    }
}
