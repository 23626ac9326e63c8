//! Cloneable handle used by the HTTP layer to reach the job queue.

use pipeline_core::{CancelOutcome, Job, JobEvent, JobId, JobParams, ProjectId, StatusReport};
use ractor::concurrency::oneshot;
use ractor::{ActorRef, RpcReplyPort};
use tokio::sync::broadcast;

use crate::messages::{ActorError, QueueMessage};

#[derive(Clone)]
pub struct QueueHandle {
    queue: ActorRef<QueueMessage>,
    events: broadcast::Sender<JobEvent>,
}

impl QueueHandle {
    pub fn new(queue: ActorRef<QueueMessage>, events: broadcast::Sender<JobEvent>) -> Self {
        Self { queue, events }
    }

    /// Create a job and append it to the pending queue.
    pub async fn submit(
        &self,
        project_id: ProjectId,
        params: JobParams,
    ) -> Result<JobId, ActorError> {
        let job = Job::new(project_id, params);
        tracing::info!("Submitting job {} for project {}", job.id, job.project_id);
        self.request(|reply| QueueMessage::Submit {
            job: Box::new(job),
            reply,
        })
        .await
    }

    pub async fn status(
        &self,
        job_id: JobId,
        project_id: ProjectId,
    ) -> Result<StatusReport, ActorError> {
        self.request(|reply| QueueMessage::Status {
            job_id,
            project_id,
            reply,
        })
        .await
    }

    pub async fn cancel(
        &self,
        job_id: JobId,
        project_id: ProjectId,
    ) -> Result<CancelOutcome, ActorError> {
        self.request(|reply| QueueMessage::Cancel {
            job_id,
            project_id,
            reply,
        })
        .await
    }

    /// Receive every job event from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    async fn request<T, F>(&self, build: F) -> Result<T, ActorError>
    where
        T: Send + 'static,
        F: FnOnce(RpcReplyPort<T>) -> QueueMessage,
    {
        let (tx, rx) = oneshot();
        self.queue
            .send_message(build(tx.into()))
            .map_err(|e| ActorError::Actor(format!("Failed to send message: {}", e)))?;
        rx.await
            .map_err(|_| ActorError::Actor("Failed to receive response".into()))
    }
}
