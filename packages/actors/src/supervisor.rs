//! Supervisor actor owning the job queue and the pipeline worker.

use std::sync::Arc;
use std::time::Duration;

use pipeline::Pipeline;
use pipeline_core::JobEvent;
use ractor::{Actor, ActorCell, ActorProcessingErr, ActorRef, SupervisionEvent};
use tokio::sync::broadcast;

use crate::handle::QueueHandle;
use crate::messages::{ActorError, QueueMessage, SupervisorMessage, WorkerMessage};
use crate::queue_actor::{QueueActor, QueueActorState};
use crate::worker_actor::{WorkerActor, WorkerArgs};

/// Message recorded for a job whose worker died mid-run.
pub const WORKER_TERMINATED_MESSAGE: &str = "worker terminated unexpectedly";

/// Supervisor arguments.
pub struct SupervisorArgs {
    pub pipeline: Arc<Pipeline>,
    pub poll_interval: Duration,
    pub event_tx: broadcast::Sender<JobEvent>,
}

/// State for the supervisor actor.
pub struct SupervisorState {
    queue: ActorRef<QueueMessage>,
    worker: ActorRef<WorkerMessage>,
    pipeline: Arc<Pipeline>,
    poll_interval: Duration,
    shutting_down: bool,
    worker_restarts: u64,
}

async fn spawn_worker(
    supervisor: ActorCell,
    queue: ActorRef<QueueMessage>,
    pipeline: Arc<Pipeline>,
    poll_interval: Duration,
) -> Result<ActorRef<WorkerMessage>, ActorProcessingErr> {
    let args = WorkerArgs {
        queue,
        pipeline,
        poll_interval,
    };
    let (worker, _handle) = Actor::spawn_linked(None, WorkerActor, args, supervisor)
        .await
        .map_err(|e| ActorProcessingErr::from(format!("Failed to spawn worker: {}", e)))?;
    Ok(worker)
}

/// Supervisor actor.
///
/// Both children are spawned, linked, when the supervisor starts, so the
/// worker exists before the first job can be submitted.
pub struct Supervisor;

impl Actor for Supervisor {
    type Msg = SupervisorMessage;
    type State = SupervisorState;
    type Arguments = SupervisorArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting feature detection supervisor");

        let (queue, _handle) = Actor::spawn_linked(
            None,
            QueueActor,
            QueueActorState::new(args.event_tx),
            myself.get_cell(),
        )
        .await
        .map_err(|e| ActorProcessingErr::from(format!("Failed to spawn queue: {}", e)))?;

        let worker = spawn_worker(
            myself.get_cell(),
            queue.clone(),
            args.pipeline.clone(),
            args.poll_interval,
        )
        .await?;

        Ok(SupervisorState {
            queue,
            worker,
            pipeline: args.pipeline,
            poll_interval: args.poll_interval,
            shutting_down: false,
            worker_restarts: 0,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisorMessage::GetQueue { reply } => {
                let _ = reply.send(state.queue.clone());
            }

            SupervisorMessage::Shutdown => {
                tracing::info!("Shutting down supervisor");
                state.shutting_down = true;
                let _ = state.worker.send_message(WorkerMessage::Shutdown);
                state.queue.stop(None);
                myself.stop(None);
            }
        }

        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        myself: ActorRef<Self::Msg>,
        message: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let (cell, reason) = match message {
            SupervisionEvent::ActorTerminated(cell, _, reason) => {
                (cell, reason.unwrap_or_else(|| "stopped".to_string()))
            }
            SupervisionEvent::ActorFailed(cell, err) => (cell, err.to_string()),
            _ => return Ok(()),
        };
        if state.shutting_down {
            return Ok(());
        }

        if cell.get_id() == state.queue.get_id() {
            tracing::error!("Job queue terminated ({}); stopping service", reason);
            let _ = state.worker.send_message(WorkerMessage::Shutdown);
            myself.stop(Some("job queue terminated".to_string()));
            return Ok(());
        }

        if cell.get_id() == state.worker.get_id() {
            tracing::warn!("Pipeline worker terminated: {}", reason);
            state.queue.send_message(QueueMessage::AbortInFlight {
                reason: WORKER_TERMINATED_MESSAGE.to_string(),
            })?;

            state.worker = spawn_worker(
                myself.get_cell(),
                state.queue.clone(),
                state.pipeline.clone(),
                state.poll_interval,
            )
            .await?;
            state.worker_restarts += 1;
            tracing::info!("Restarted pipeline worker ({} restarts)", state.worker_restarts);
        }
        Ok(())
    }
}

/// Start the supervisor, its queue and its worker.
pub async fn start_supervisor(
    pipeline: Pipeline,
    poll_interval: Duration,
) -> Result<(ActorRef<SupervisorMessage>, QueueHandle), ActorError> {
    let (event_tx, _) = broadcast::channel(1024);
    let args = SupervisorArgs {
        pipeline: Arc::new(pipeline),
        poll_interval,
        event_tx: event_tx.clone(),
    };
    let (supervisor, _handle) = Actor::spawn(None, Supervisor, args).await?;

    let (tx, rx) = ractor::concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::GetQueue { reply: tx.into() })
        .map_err(|e| ActorError::Actor(format!("Failed to send message: {}", e)))?;
    let queue = rx
        .await
        .map_err(|_| ActorError::Actor("Failed to receive response".into()))?;

    Ok((supervisor, QueueHandle::new(queue, event_tx)))
}
