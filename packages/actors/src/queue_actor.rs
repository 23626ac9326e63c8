//! Queue actor owning the job registry.

use chrono::Utc;
use pipeline_core::{CancelOutcome, JobEvent, JobId, JobStatus};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;

use crate::messages::QueueMessage;
use crate::registry::JobRegistry;

/// State for the queue actor.
pub struct QueueActorState {
    registry: JobRegistry,
    event_tx: broadcast::Sender<JobEvent>,
}

impl QueueActorState {
    pub fn new(event_tx: broadcast::Sender<JobEvent>) -> Self {
        Self {
            registry: JobRegistry::new(),
            event_tx,
        }
    }

    fn broadcast(&self, event: JobEvent) {
        tracing::debug!("{}", event.description());
        let _ = self.event_tx.send(event);
    }

    /// Apply a worker-reported status change; rejected transitions are logged and dropped.
    fn update(&mut self, job_id: JobId, status: JobStatus) -> bool {
        match self.registry.set_status(job_id, status) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Ignoring status update: {}", e);
                false
            }
        }
    }

    fn finish(&mut self, job_id: JobId, status: JobStatus) {
        let failed = match &status {
            JobStatus::Error { message } => Some(message.clone()),
            _ => None,
        };
        if !self.update(job_id, status) {
            return;
        }

        let now = Utc::now();
        let event = match failed {
            Some(error) => JobEvent::JobFailed {
                job_id,
                error,
                timestamp: now,
            },
            None => {
                let duration_ms = self
                    .registry
                    .started_at(job_id)
                    .map(|started| (now - started).num_milliseconds().max(0) as u64)
                    .unwrap_or_default();
                JobEvent::JobCompleted {
                    job_id,
                    duration_ms,
                    timestamp: now,
                }
            }
        };
        self.broadcast(event);
    }
}

/// Queue actor; its mailbox serializes every registry operation.
pub struct QueueActor;

impl Actor for QueueActor {
    type Msg = QueueMessage;
    type State = QueueActorState;
    type Arguments = QueueActorState;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting job queue");
        Ok(args)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            QueueMessage::Submit { job, reply } => {
                let job = *job;
                let job_id = state.registry.submit(job.clone());
                state.broadcast(JobEvent::JobEnqueued {
                    job,
                    timestamp: Utc::now(),
                });
                let _ = reply.send(job_id);
            }

            QueueMessage::Status {
                job_id,
                project_id,
                reply,
            } => {
                let _ = reply.send(state.registry.query_status(job_id, &project_id));
            }

            QueueMessage::Cancel {
                job_id,
                project_id,
                reply,
            } => {
                let outcome = state.registry.cancel(job_id, &project_id);
                if outcome == CancelOutcome::Removed {
                    state.broadcast(JobEvent::JobCancelled {
                        job_id,
                        timestamp: Utc::now(),
                    });
                }
                let _ = reply.send(outcome);
            }

            QueueMessage::RequestJob { reply } => {
                let job = state.registry.dequeue();
                let job_id = job.as_ref().map(|j| j.id);
                if let Some(job) = &job {
                    let now = Utc::now();
                    tracing::info!(
                        "Dispatching job {} after {} ms in queue",
                        job.id,
                        (now - job.created_at).num_milliseconds().max(0)
                    );
                    state.broadcast(JobEvent::JobStarted {
                        job_id: job.id,
                        timestamp: now,
                    });
                }
                if reply.send(job).is_err()
                    && let Some(job_id) = job_id
                {
                    state.finish(
                        job_id,
                        JobStatus::Error {
                            message: "worker did not accept the job".into(),
                        },
                    );
                }
            }

            QueueMessage::StageChanged { job_id, stage } => {
                let status = JobStatus::Processing {
                    stage: Some(stage.clone()),
                };
                if state.update(job_id, status) {
                    state.broadcast(JobEvent::StageChanged {
                        job_id,
                        stage,
                        timestamp: Utc::now(),
                    });
                }
            }

            QueueMessage::JobCompleted { job_id, message } => {
                state.finish(job_id, JobStatus::Success { message });
            }

            QueueMessage::JobFailed { job_id, error } => {
                state.finish(job_id, JobStatus::Error { message: error });
            }

            QueueMessage::AbortInFlight { reason } => {
                if let Some(job_id) = state.registry.in_flight() {
                    tracing::warn!("Failing job {}: {}", job_id, reason);
                    state.finish(job_id, JobStatus::Error { message: reason });
                }
            }
        }

        Ok(())
    }
}
