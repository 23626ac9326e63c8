//! Actor system for feature detection jobs.
//!
//! # Architecture
//!
//! - `Supervisor` - Top-level actor; spawns the queue and the worker at startup
//!   and restarts the worker if it dies
//! - `QueueActor` - Owns the [`JobRegistry`]; every submit, status, cancel and
//!   dequeue is one message, so all of them are mutually exclusive
//! - `WorkerActor` - Takes one job at a time and runs the pipeline on it
//!
//! # Usage
//!
//! ```ignore
//! use actors::start_supervisor;
//!
//! let (supervisor, queue) = start_supervisor(pipeline, poll_interval).await?;
//! let job_id = queue.submit(project_id, params).await?;
//! let status = queue.status(job_id, project_id).await?;
//! ```

mod handle;
mod messages;
mod queue_actor;
pub mod registry;
mod supervisor;
mod worker_actor;

pub use handle::QueueHandle;
pub use messages::{ActorError, QueueMessage, SupervisorMessage, WorkerMessage};
pub use queue_actor::{QueueActor, QueueActorState};
pub use registry::JobRegistry;
pub use supervisor::{Supervisor, WORKER_TERMINATED_MESSAGE, start_supervisor};
pub use worker_actor::WorkerActor;

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef};
