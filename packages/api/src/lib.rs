//! HTTP endpoints of the feature detection service.
//!
//! - `POST /requestFeatureDetectionRun` - submit a job
//! - `POST /requestFeatureDetectionRunStatus` - query a job's status
//! - `POST /cancelFeatureDetectionRunRequest` - remove a pending job

mod error;
mod handlers;
pub mod interfaces;

use actors::QueueHandle;
use axum::Router;
use axum::routing::post;

pub use error::{ApiError, MISSING_DATA_MESSAGE};

/// Shared state of every handler.
#[derive(Clone)]
pub struct ApiState {
    pub queue: QueueHandle,
}

pub fn router(queue: QueueHandle) -> Router {
    Router::new()
        .route("/requestFeatureDetectionRun", post(handlers::submit_handler))
        .route(
            "/requestFeatureDetectionRunStatus",
            post(handlers::status_handler),
        )
        .route(
            "/cancelFeatureDetectionRunRequest",
            post(handlers::cancel_handler),
        )
        .with_state(ApiState { queue })
}
