//! Job domain types for feature detection runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

/// Unique identifier for a job, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Ulid);

impl JobId {
    /// Create a new unique job ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a job ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied project identifier.
///
/// Callers send it either as a JSON string or a JSON number; both are kept
/// in their textual form so that `42` and `"42"` name the same project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawProjectId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawProjectId::deserialize(deserializer)? {
            RawProjectId::Text(s) => Self(s),
            RawProjectId::Number(n) => Self(n.to_string()),
        })
    }
}

/// Input parameters of a feature detection run, as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParams {
    /// Spectral file reference understood by the scan export service.
    pub spectr_file_id: String,
    /// Hardklor configuration text.
    pub hardklor_conf: String,
    /// Bullseye `key=value` configuration text.
    pub bullseye_conf: String,
}

/// A job represents one end-to-end pipeline run for a spectral file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for this job.
    pub id: JobId,
    /// Project that owns the job.
    pub project_id: ProjectId,
    /// Input parameters.
    pub params: JobParams,
    /// When the job was submitted.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job with a fresh ID.
    pub fn new(project_id: ProjectId, params: JobParams) -> Self {
        Self {
            id: JobId::new(),
            project_id,
            params,
            created_at: Utc::now(),
        }
    }
}

/// Stored status of a job.
///
/// Transitions only move forward: `Queued -> Processing -> {Success, Error}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting in the pending queue.
    #[default]
    Queued,
    /// Job is being run by the worker.
    Processing {
        /// Latest stage-progress message, if any stage has started.
        stage: Option<String>,
    },
    /// Pipeline finished successfully.
    Success { message: String },
    /// Pipeline failed.
    Error { message: String },
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success { .. } | JobStatus::Error { .. })
    }

    fn rank(&self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Processing { .. } => 1,
            JobStatus::Success { .. } | JobStatus::Error { .. } => 2,
        }
    }

    /// Whether moving from `self` to `next` respects the forward-only lifecycle.
    ///
    /// Stage updates (`Processing -> Processing`) are allowed; terminal
    /// states accept nothing further, and `Queued` cannot jump straight to a
    /// terminal state.
    pub fn can_transition_to(&self, next: &JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Processing { .. }, JobStatus::Processing { .. }) => true,
            _ if self.is_terminal() => false,
            _ => next.rank() == self.rank() + 1,
        }
    }

    /// Get a simple status string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing { .. } => "processing",
            JobStatus::Success { .. } => "success",
            JobStatus::Error { .. } => "error",
        }
    }
}

/// Message reported for a processing job that has not entered a stage yet.
pub const DEFAULT_PROCESSING_MESSAGE: &str = "Processing request";

/// Message recorded when every stage succeeded.
pub const PIPELINE_COMPLETE_MESSAGE: &str = "Pipeline complete";

/// Message reported when the caller's project id differs from the job's.
pub const PROJECT_MISMATCH_MESSAGE: &str = "project id mismatch";

/// Caller-facing view of a job's status at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// No job with this id is known.
    NotFound,
    /// Waiting; `position` is the 1-based rank in the pending queue.
    Queued { position: usize },
    /// Running; `message` is the current stage.
    Processing { message: String },
    Success { message: String },
    Error { message: String },
}

impl StatusReport {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusReport::NotFound => "not_found",
            StatusReport::Queued { .. } => "queued",
            StatusReport::Processing { .. } => "processing",
            StatusReport::Success { .. } => "success",
            StatusReport::Error { .. } => "error",
        }
    }
}

/// Result of a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The job was pending and has been removed.
    Removed,
    /// Unknown job, or the job already left the pending queue.
    NotFound,
    /// The caller's project id does not own the job.
    ProjectMismatch,
}

impl CancelOutcome {
    /// Message returned to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            CancelOutcome::Removed => "removed",
            CancelOutcome::NotFound => "not found",
            CancelOutcome::ProjectMismatch => "project id does not match",
        }
    }
}
