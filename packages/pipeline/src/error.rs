use std::io;
use std::path::PathBuf;

use scan_files::WriteError;
use spectr_client::ExportError;
use thiserror::Error;

/// Failure of one pipeline stage.
///
/// The `Display` text is what callers see as the job's error message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Working directory root {0} is missing or not a directory")]
    WorkRootMissing(PathBuf),

    #[error("Working directory {0} already exists")]
    WorkDirExists(PathBuf),

    #[error("No spectr file id given")]
    EmptyFileId,

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to write scan file: {0}")]
    Write(#[from] WriteError),

    #[error("Hardklor configuration is empty")]
    EmptyHardklorConfig,

    #[error("Bullseye configuration is empty")]
    EmptyBullseyeConfig,

    #[error("Invalid Bullseye option {key:?}: {reason}")]
    InvalidBullseyeOption { key: String, reason: &'static str },

    #[error("{tool} executable path is not configured")]
    ToolNotConfigured { tool: &'static str },

    #[error("{tool} executable not found at {path}")]
    ToolMissing { tool: &'static str, path: PathBuf },

    #[error("{tool} failed with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} finished but {path} was not produced")]
    MissingOutput { tool: &'static str, path: PathBuf },

    #[error("Final storage root {0} is missing or not a directory")]
    FinalRootMissing(PathBuf),

    #[error("Invalid project id {0:?}")]
    InvalidProjectId(String),

    #[error("Cannot relocate {0}: file does not exist")]
    MissingSource(PathBuf),

    #[error("{0} is missing after relocation")]
    RelocationUnverified(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Scan file writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
