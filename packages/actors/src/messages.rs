//! Message types for actor communication.

use pipeline_core::{CancelOutcome, Job, JobId, ProjectId, StatusReport};
use ractor::{ActorRef, RpcReplyPort};

/// Messages for the QueueActor.
#[derive(Debug)]
pub enum QueueMessage {
    /// Add a new job to the end of the pending queue.
    Submit {
        job: Box<Job>,
        reply: RpcReplyPort<JobId>,
    },

    /// Query a job's status on behalf of a project.
    Status {
        job_id: JobId,
        project_id: ProjectId,
        reply: RpcReplyPort<StatusReport>,
    },

    /// Remove a pending job.
    Cancel {
        job_id: JobId,
        project_id: ProjectId,
        reply: RpcReplyPort<CancelOutcome>,
    },

    /// Take the next job for the worker, marking it processing.
    RequestJob { reply: RpcReplyPort<Option<Job>> },

    /// The running job entered a new stage.
    StageChanged { job_id: JobId, stage: String },

    /// The running job finished successfully.
    JobCompleted { job_id: JobId, message: String },

    /// The running job failed.
    JobFailed { job_id: JobId, error: String },

    /// The worker died; fail whatever it was running.
    AbortInFlight { reason: String },
}

/// Messages for the WorkerActor.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Ask the queue for work.
    Poll,

    /// Stop after the current job.
    Shutdown,
}

/// Messages for the Supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Get the queue actor.
    GetQueue {
        reply: RpcReplyPort<ActorRef<QueueMessage>>,
    },

    /// Stop the worker and the queue.
    Shutdown,
}

/// Error type for actor operations.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Job {job_id} cannot move from {from} to {to}")]
    InvalidTransition {
        job_id: JobId,
        from: &'static str,
        to: &'static str,
    },

    #[error("Failed to spawn actor: {0}")]
    Spawn(#[from] ractor::SpawnErr),

    #[error("Actor error: {0}")]
    Actor(String),
}
