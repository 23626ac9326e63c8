//! Worker actor running one pipeline at a time.

use std::sync::Arc;
use std::time::Duration;

use pipeline::{JobReporter, Pipeline};
use pipeline_core::JobId;
use ractor::rpc::CallResult;
use ractor::{Actor, ActorProcessingErr, ActorRef};

use crate::messages::{QueueMessage, WorkerMessage};

/// Forwards pipeline progress to the queue actor.
struct QueueReporter {
    queue: ActorRef<QueueMessage>,
}

impl QueueReporter {
    fn send(&self, message: QueueMessage) {
        if let Err(e) = self.queue.send_message(message) {
            tracing::warn!("Failed to report job progress: {}", e);
        }
    }
}

impl JobReporter for QueueReporter {
    fn stage(&self, job_id: JobId, message: &str) {
        self.send(QueueMessage::StageChanged {
            job_id,
            stage: message.to_string(),
        });
    }

    fn succeeded(&self, job_id: JobId, message: &str) {
        self.send(QueueMessage::JobCompleted {
            job_id,
            message: message.to_string(),
        });
    }

    fn failed(&self, job_id: JobId, error: &str) {
        self.send(QueueMessage::JobFailed {
            job_id,
            error: error.to_string(),
        });
    }
}

/// State for the worker actor.
pub struct WorkerActorState {
    queue: ActorRef<QueueMessage>,
    pipeline: Arc<Pipeline>,
    poll_interval: Duration,
    running: bool,
}

/// Worker actor arguments.
pub struct WorkerArgs {
    pub queue: ActorRef<QueueMessage>,
    pub pipeline: Arc<Pipeline>,
    pub poll_interval: Duration,
}

/// The single sequential worker.
///
/// Each `Poll` takes at most one job and runs it to completion inside the
/// handler, so no second job can start until the first has finished.
pub struct WorkerActor;

impl WorkerActor {
    fn schedule_poll(myself: &ActorRef<WorkerMessage>, delay: Duration) {
        let myself = myself.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = myself.send_message(WorkerMessage::Poll);
        });
    }
}

impl Actor for WorkerActor {
    type Msg = WorkerMessage;
    type State = WorkerActorState;
    type Arguments = WorkerArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting pipeline worker (poll interval {:?})", args.poll_interval);
        myself.send_message(WorkerMessage::Poll)?;

        Ok(WorkerActorState {
            queue: args.queue,
            pipeline: args.pipeline,
            poll_interval: args.poll_interval,
            running: true,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WorkerMessage::Poll => {
                if !state.running {
                    return Ok(());
                }

                let result = ractor::rpc::call(
                    &state.queue,
                    |reply| QueueMessage::RequestJob { reply },
                    None,
                )
                .await;

                match result {
                    Ok(CallResult::Success(Some(job))) => {
                        tracing::info!("Picked up job {} for project {}", job.id, job.project_id);
                        let reporter = QueueReporter {
                            queue: state.queue.clone(),
                        };
                        // Failures are already reported to the queue.
                        let _ = state.pipeline.execute(&job, &reporter).await;
                        myself.send_message(WorkerMessage::Poll)?;
                    }
                    Ok(CallResult::Success(None)) => {
                        Self::schedule_poll(&myself, state.poll_interval);
                    }
                    Ok(_) => {
                        tracing::warn!("Job queue did not answer the worker");
                        Self::schedule_poll(&myself, state.poll_interval);
                    }
                    Err(e) => {
                        tracing::error!("Job queue unreachable: {}", e);
                        myself.stop(Some("job queue unreachable".to_string()));
                    }
                }
            }

            WorkerMessage::Shutdown => {
                tracing::info!("Shutting down pipeline worker");
                state.running = false;
                myself.stop(None);
            }
        }

        Ok(())
    }
}
