//! Pending queue and status map for feature detection jobs.
//!
//! The registry is plain data. It is owned by the queue actor, whose mailbox
//! serializes every operation, so each method here is atomic with respect to
//! HTTP handlers and the worker.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use pipeline_core::{
    CancelOutcome, DEFAULT_PROCESSING_MESSAGE, Job, JobId, JobStatus, PROJECT_MISMATCH_MESSAGE,
    ProjectId, StatusReport,
};

use crate::messages::ActorError;

#[derive(Debug)]
struct Entry {
    job: Job,
    status: JobStatus,
    started_at: Option<DateTime<Utc>>,
}

/// In-memory job registry.
#[derive(Debug, Default)]
pub struct JobRegistry {
    pending: VecDeque<JobId>,
    entries: HashMap<JobId, Entry>,
    in_flight: Option<JobId>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job to the pending queue with status `queued`.
    pub fn submit(&mut self, job: Job) -> JobId {
        let job_id = job.id;
        self.pending.push_back(job_id);
        self.entries.insert(
            job_id,
            Entry {
                job,
                status: JobStatus::Queued,
                started_at: None,
            },
        );
        job_id
    }

    /// Remove the head of the queue and mark it `processing` in one step.
    pub fn dequeue(&mut self) -> Option<Job> {
        while let Some(job_id) = self.pending.pop_front() {
            let Some(entry) = self.entries.get_mut(&job_id) else {
                tracing::warn!("Pending job {} had no status entry", job_id);
                continue;
            };
            entry.status = JobStatus::Processing { stage: None };
            entry.started_at = Some(Utc::now());
            self.in_flight = Some(job_id);
            return Some(entry.job.clone());
        }
        None
    }

    /// Replace a job's status, enforcing forward-only transitions.
    pub fn set_status(&mut self, job_id: JobId, status: JobStatus) -> Result<(), ActorError> {
        let entry = self
            .entries
            .get_mut(&job_id)
            .ok_or(ActorError::JobNotFound(job_id))?;

        if !entry.status.can_transition_to(&status) {
            return Err(ActorError::InvalidTransition {
                job_id,
                from: entry.status.as_str(),
                to: status.as_str(),
            });
        }

        if status.is_terminal() && self.in_flight == Some(job_id) {
            self.in_flight = None;
        }
        entry.status = status;
        Ok(())
    }

    /// Record the current stage of a processing job.
    pub fn set_stage(&mut self, job_id: JobId, stage: &str) -> Result<(), ActorError> {
        self.set_status(
            job_id,
            JobStatus::Processing {
                stage: Some(stage.to_string()),
            },
        )
    }

    /// Caller-facing status, as seen by `project_id`.
    pub fn query_status(&self, job_id: JobId, project_id: &ProjectId) -> StatusReport {
        let Some(entry) = self.entries.get(&job_id) else {
            return StatusReport::NotFound;
        };
        if &entry.job.project_id != project_id {
            return StatusReport::Error {
                message: PROJECT_MISMATCH_MESSAGE.to_string(),
            };
        }

        match &entry.status {
            JobStatus::Queued => match self.queue_position(job_id) {
                Some(position) => StatusReport::Queued { position },
                None => {
                    tracing::warn!("Queued job {} is missing from the pending queue", job_id);
                    StatusReport::NotFound
                }
            },
            JobStatus::Processing { stage } => StatusReport::Processing {
                message: stage
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROCESSING_MESSAGE.to_string()),
            },
            JobStatus::Success { message } => StatusReport::Success {
                message: message.clone(),
            },
            JobStatus::Error { message } => StatusReport::Error {
                message: message.clone(),
            },
        }
    }

    /// Remove a job that is still waiting in the queue.
    pub fn cancel(&mut self, job_id: JobId, project_id: &ProjectId) -> CancelOutcome {
        let Some(entry) = self.entries.get(&job_id) else {
            return CancelOutcome::NotFound;
        };
        if &entry.job.project_id != project_id {
            return CancelOutcome::ProjectMismatch;
        }
        let Some(index) = self.pending.iter().position(|id| *id == job_id) else {
            return CancelOutcome::NotFound;
        };

        self.pending.remove(index);
        self.entries.remove(&job_id);
        CancelOutcome::Removed
    }

    /// 1-based rank of a pending job.
    pub fn queue_position(&self, job_id: JobId) -> Option<usize> {
        self.pending
            .iter()
            .position(|id| *id == job_id)
            .map(|index| index + 1)
    }

    /// The job the worker is currently running, if any.
    pub fn in_flight(&self) -> Option<JobId> {
        self.in_flight
    }

    /// When the given job left the queue.
    pub fn started_at(&self, job_id: JobId) -> Option<DateTime<Utc>> {
        self.entries.get(&job_id).and_then(|e| e.started_at)
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
