#![allow(dead_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use actors::start_supervisor;
use api::interfaces::StatusResponse;
use pipeline::Pipeline;
use pipeline_core::{CleanupPolicy, MsLevel, PipelineSettings, Precursor, ScanRecord};
use serde_json::{Value, json};
use spectr_client::{ExportError, ScanFuture, ScanSource};
use tempfile::TempDir;

pub const GOOD_FILE: &str = "good-file";

pub const HARDKLOR_OK: &str = "#!/bin/sh\necho results > scans.hk\n";
pub const HARDKLOR_SLOW: &str = "#!/bin/sh\nsleep 2\necho results > scans.hk\n";
const BULLSEYE_OK: &str = "#!/bin/sh\necho \"$@\" > scans.be\n";

/// In-memory spectr: one scan per level for [`GOOD_FILE`], HTTP 503 otherwise.
struct FakeSource;

fn record(number: u64) -> Result<ScanRecord, ExportError> {
    let precursor = (number == 2).then_some(Precursor {
        mz: 636.34,
        charge: 2,
    });
    let level = if number == 2 { 2 } else { 1 };
    Ok(ScanRecord::new(number, level, 30.0, precursor, vec![400.25], vec![10.0])?)
}

impl ScanSource for FakeSource {
    fn scan_numbers<'a>(&'a self, file_id: &'a str, level: MsLevel) -> ScanFuture<'a, Vec<u64>> {
        Box::pin(async move {
            if file_id != GOOD_FILE {
                return Err(ExportError::Status {
                    code: 503,
                    message: "Got 503 error. Possibly invalid file id.".into(),
                });
            }
            Ok(vec![u64::from(level.as_u8())])
        })
    }

    fn scans<'a>(
        &'a self,
        _file_id: &'a str,
        scan_numbers: &'a [u64],
    ) -> ScanFuture<'a, Vec<ScanRecord>> {
        Box::pin(async move { scan_numbers.iter().map(|n| record(*n)).collect() })
    }
}

/// The HTTP service on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    _dirs: Vec<TempDir>,
}

impl TestServer {
    pub async fn start(hardklor: &str) -> Result<Self, Box<dyn Error>> {
        let work_root = tempfile::tempdir()?;
        let final_root = tempfile::tempdir()?;
        let tools = tempfile::tempdir()?;

        let settings = PipelineSettings {
            work_root: work_root.path().to_path_buf(),
            final_root: final_root.path().to_path_buf(),
            hardklor_exec: write_script(tools.path(), "hardklor", hardklor)?,
            bullseye_exec: write_script(tools.path(), "bullseye", BULLSEYE_OK)?,
            batch_size: 10,
            cleanup: CleanupPolicy::Always,
            allow_empty_ms1: false,
        };
        let pipeline = Pipeline::new(settings, Arc::new(FakeSource));
        let (_supervisor, queue) = start_supervisor(pipeline, Duration::from_millis(50)).await?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = api::router(queue);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _dirs: vec![work_root, final_root, tools],
        })
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
    }

    pub async fn submit(&self, project_id: Value, file_id: &str) -> Result<String, Box<dyn Error>> {
        let response = self
            .post(
                "/requestFeatureDetectionRun",
                json!({
                    "project_id": project_id,
                    "spectr_file_id": file_id,
                    "hardklor_conf": "depth\t3",
                    "bullseye_conf": "ppm=10",
                }),
            )
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        body["request_id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "missing request_id".into())
    }

    pub async fn status(
        &self,
        request_id: &str,
        project_id: Value,
    ) -> Result<StatusResponse, Box<dyn Error>> {
        let response = self
            .post(
                "/requestFeatureDetectionRunStatus",
                json!({ "request_id": request_id, "project_id": project_id }),
            )
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn cancel(
        &self,
        request_id: &str,
        project_id: Value,
    ) -> Result<String, Box<dyn Error>> {
        let response = self
            .post(
                "/cancelFeatureDetectionRunRequest",
                json!({ "request_id": request_id, "project_id": project_id }),
            )
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        body["cancel_message"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "missing cancel_message".into())
    }

    /// Poll the status endpoint until `done` accepts the response.
    pub async fn wait_for_status<F>(
        &self,
        request_id: &str,
        project_id: Value,
        done: F,
    ) -> Result<StatusResponse, Box<dyn Error>>
    where
        F: Fn(&StatusResponse) -> bool,
    {
        for _ in 0..400 {
            let status = self.status(request_id, project_id.clone()).await?;
            if done(&status) {
                return Ok(status);
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        Err(format!("job {request_id} never reached the expected status").into())
    }
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf, std::io::Error> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}
