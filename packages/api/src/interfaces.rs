//! Request and response bodies.
//!
//! Request fields are optional so a missing field becomes a 400 with a fixed
//! message instead of a deserialization rejection.

use pipeline_core::{JobParams, ProjectId, StatusReport};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub project_id: Option<ProjectId>,
    pub spectr_file_id: Option<String>,
    pub hardklor_conf: Option<String>,
    pub bullseye_conf: Option<String>,
}

impl SubmitRequest {
    pub fn into_parts(self) -> Result<(ProjectId, JobParams), ApiError> {
        let project_id = required_project(self.project_id)?;
        let params = JobParams {
            spectr_file_id: self.spectr_file_id.ok_or(ApiError::MissingData)?,
            hardklor_conf: self.hardklor_conf.ok_or(ApiError::MissingData)?,
            bullseye_conf: self.bullseye_conf.ok_or(ApiError::MissingData)?,
        };
        Ok((project_id, params))
    }
}

/// Body of the status and cancel endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct JobRequest {
    pub request_id: Option<String>,
    pub project_id: Option<ProjectId>,
}

impl JobRequest {
    pub fn into_parts(self) -> Result<(String, ProjectId), ApiError> {
        let project_id = required_project(self.project_id)?;
        let request_id = self
            .request_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingData)?;
        Ok((request_id, project_id))
    }
}

fn required_project(project_id: Option<ProjectId>) -> Result<ProjectId, ApiError> {
    project_id
        .filter(|p| !p.is_empty())
        .ok_or(ApiError::MissingData)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub request_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub request_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_user_message: Option<String>,
}

impl StatusResponse {
    pub fn new(request_id: String, report: &StatusReport) -> Self {
        let mut response = Self {
            request_id,
            status: report.as_str().to_string(),
            error_message: None,
            queue_position: None,
            end_user_message: None,
        };
        match report {
            StatusReport::Queued { position } => {
                response.queue_position = Some(position.to_string())
            }
            StatusReport::Processing { message } => {
                response.end_user_message = Some(message.clone())
            }
            StatusReport::Error { message } => response.error_message = Some(message.clone()),
            StatusReport::NotFound | StatusReport::Success { .. } => {}
        }
        response
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub cancel_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_rejected() {
        let body = r#"{"project_id": 5, "spectr_file_id": "abc", "hardklor_conf": "x"}"#;
        let request: SubmitRequest = serde_json::from_str(body).unwrap_or_default();
        assert!(matches!(request.into_parts(), Err(ApiError::MissingData)));

        let request: JobRequest =
            serde_json::from_str(r#"{"request_id": "abc"}"#).unwrap_or_default();
        assert!(matches!(request.into_parts(), Err(ApiError::MissingData)));
    }

    #[test]
    fn numeric_project_ids_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
        let body = r#"{"project_id": 5, "spectr_file_id": "abc",
            "hardklor_conf": "x", "bullseye_conf": "y"}"#;
        let request: SubmitRequest = serde_json::from_str(body)?;
        let (project_id, params) = request.into_parts()?;
        assert_eq!(project_id.as_str(), "5");
        assert_eq!(params.spectr_file_id, "abc");
        Ok(())
    }

    #[test]
    fn status_fields_depend_on_status() -> Result<(), serde_json::Error> {
        let queued = serde_json::to_value(StatusResponse::new(
            "id".into(),
            &StatusReport::Queued { position: 3 },
        ))?;
        assert_eq!(
            queued,
            serde_json::json!({"request_id": "id", "status": "queued", "queue_position": "3"})
        );

        let processing = serde_json::to_value(StatusResponse::new(
            "id".into(),
            &StatusReport::Processing {
                message: "Running Hardklor".into(),
            },
        ))?;
        assert_eq!(processing["end_user_message"], "Running Hardklor");

        let missing =
            serde_json::to_value(StatusResponse::new("id".into(), &StatusReport::NotFound))?;
        assert_eq!(missing, serde_json::json!({"request_id": "id", "status": "not_found"}));
        Ok(())
    }
}
