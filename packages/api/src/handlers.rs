use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use pipeline_core::{CancelOutcome, JobId, StatusReport};

use crate::ApiState;
use crate::error::ApiError;
use crate::interfaces::{
    CancelResponse, JobRequest, StatusResponse, SubmitRequest, SubmitResponse,
};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection);
            Err(ApiError::MissingData)
        }
    }
}

pub async fn submit_handler(
    State(state): State<ApiState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (project_id, params) = body(payload)?.into_parts()?;
    let job_id = state.queue.submit(project_id, params).await?;
    Ok(Json(SubmitResponse {
        request_id: job_id.to_string(),
    }))
}

pub async fn status_handler(
    State(state): State<ApiState>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (request_id, project_id) = body(payload)?.into_parts()?;
    let report = match JobId::parse(&request_id) {
        Ok(job_id) => state.queue.status(job_id, project_id).await?,
        Err(_) => StatusReport::NotFound,
    };
    Ok(Json(StatusResponse::new(request_id, &report)))
}

pub async fn cancel_handler(
    State(state): State<ApiState>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<Json<CancelResponse>, ApiError> {
    let (request_id, project_id) = body(payload)?.into_parts()?;
    let outcome = match JobId::parse(&request_id) {
        Ok(job_id) => state.queue.cancel(job_id, project_id).await?,
        Err(_) => CancelOutcome::NotFound,
    };
    tracing::info!("Cancel request for {}: {}", request_id, outcome.message());
    Ok(Json(CancelResponse {
        cancel_message: outcome.message().to_string(),
    }))
}
