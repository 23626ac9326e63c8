//! Event types for job status changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Job, JobId};

/// Events emitted by the job registry whenever a job changes state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    /// A new job was submitted.
    JobEnqueued { job: Job, timestamp: DateTime<Utc> },
    /// The worker took the job off the queue.
    JobStarted {
        job_id: JobId,
        timestamp: DateTime<Utc>,
    },
    /// The job entered a new pipeline stage.
    StageChanged {
        job_id: JobId,
        stage: String,
        timestamp: DateTime<Utc>,
    },
    /// The pipeline completed successfully.
    JobCompleted {
        job_id: JobId,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    /// The pipeline failed.
    JobFailed {
        job_id: JobId,
        error: String,
        timestamp: DateTime<Utc>,
    },
    /// A pending job was cancelled by its owner.
    JobCancelled {
        job_id: JobId,
        timestamp: DateTime<Utc>,
    },
}

impl JobEvent {
    /// Get the job ID associated with this event.
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::JobEnqueued { job, .. } => job.id,
            JobEvent::JobStarted { job_id, .. } => *job_id,
            JobEvent::StageChanged { job_id, .. } => *job_id,
            JobEvent::JobCompleted { job_id, .. } => *job_id,
            JobEvent::JobFailed { job_id, .. } => *job_id,
            JobEvent::JobCancelled { job_id, .. } => *job_id,
        }
    }

    /// Whether the event reports a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobEvent::JobCompleted { .. } | JobEvent::JobFailed { .. }
        )
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            JobEvent::JobEnqueued { job, .. } => {
                format!("Job {} enqueued for project {}", job.id, job.project_id)
            }
            JobEvent::JobStarted { job_id, .. } => format!("Job {} started", job_id),
            JobEvent::StageChanged { job_id, stage, .. } => {
                format!("Job {}: {}", job_id, stage)
            }
            JobEvent::JobCompleted {
                job_id,
                duration_ms,
                ..
            } => format!("Job {} completed in {}ms", job_id, duration_ms),
            JobEvent::JobFailed { job_id, error, .. } => {
                format!("Job {} failed: {}", job_id, error)
            }
            JobEvent::JobCancelled { job_id, .. } => format!("Job {} cancelled", job_id),
        }
    }
}
