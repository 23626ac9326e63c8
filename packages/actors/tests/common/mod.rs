#![allow(dead_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use actors::{QueueHandle, start_supervisor};
use pipeline::Pipeline;
use pipeline_core::{
    CleanupPolicy, JobEvent, JobId, JobParams, MsLevel, PipelineSettings, Precursor, ScanRecord,
};
use spectr_client::{ExportError, ScanFuture, ScanSource};
use tempfile::TempDir;
use tokio::sync::broadcast;

pub const GOOD_FILE: &str = "good-file";
/// File id whose export panics, taking the worker down with it.
pub const CRASH_FILE: &str = "crash-file";

pub const HARDKLOR_OK: &str = "#!/bin/sh\necho results > scans.hk\n";
pub const HARDKLOR_SLOW: &str = "#!/bin/sh\nsleep 2\necho results > scans.hk\n";
pub const BULLSEYE_OK: &str = "#!/bin/sh\necho \"$@\" > scans.be\n";

/// In-memory spectr serving one MS1 and one MS2 scan for [`GOOD_FILE`],
/// panicking for [`CRASH_FILE`] and answering HTTP 503 for every other file id.
pub struct FakeSource;

impl FakeSource {
    fn record(level: MsLevel) -> Result<ScanRecord, ExportError> {
        let (number, precursor) = match level {
            MsLevel::Ms1 => (1, None),
            MsLevel::Ms2 => (
                2,
                Some(Precursor {
                    mz: 636.34,
                    charge: 2,
                }),
            ),
        };
        Ok(ScanRecord::new(
            number,
            level.as_u8(),
            30.0,
            precursor,
            vec![400.25],
            vec![10.0],
        )?)
    }
}

impl ScanSource for FakeSource {
    fn scan_numbers<'a>(&'a self, file_id: &'a str, level: MsLevel) -> ScanFuture<'a, Vec<u64>> {
        Box::pin(async move {
            if file_id == CRASH_FILE {
                panic!("export of {file_id} crashed");
            }
            if file_id != GOOD_FILE {
                return Err(ExportError::Status {
                    code: 503,
                    message: "Got 503 error. Possibly invalid file id.".into(),
                });
            }
            Ok(vec![Self::record(level)?.scan_number()])
        })
    }

    fn scans<'a>(
        &'a self,
        _file_id: &'a str,
        scan_numbers: &'a [u64],
    ) -> ScanFuture<'a, Vec<ScanRecord>> {
        Box::pin(async move {
            scan_numbers
                .iter()
                .map(|n| Self::record(if *n == 1 { MsLevel::Ms1 } else { MsLevel::Ms2 }))
                .collect()
        })
    }
}

/// A running service with scratch directories.
pub struct TestService {
    pub queue: QueueHandle,
    pub work_root: TempDir,
    pub final_root: TempDir,
    _tools: TempDir,
}

impl TestService {
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

        Ok(Self {
            queue,
            work_root,
            final_root,
            _tools: tools,
        })
    }

    pub fn workdir(&self, job_id: JobId) -> PathBuf {
        self.work_root.path().join(job_id.to_string())
    }
}

#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf, std::io::Error> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

pub fn params(file_id: &str) -> JobParams {
    JobParams {
        spectr_file_id: file_id.to_string(),
        hardklor_conf: "depth\t3".to_string(),
        bullseye_conf: "ppm=10".to_string(),
    }
}

/// Wait for the first event matching `predicate`.
pub async fn wait_for<F>(
    events: &mut broadcast::Receiver<JobEvent>,
    predicate: F,
) -> Result<JobEvent, Box<dyn Error>>
where
    F: Fn(&JobEvent) -> bool,
{
    let found = tokio::time::timeout(Duration::from_secs(20), async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return Ok(event),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    })
    .await??;
    Ok(found)
}

/// Wait until `job_id` reaches a terminal event.
pub async fn wait_for_terminal(
    events: &mut broadcast::Receiver<JobEvent>,
    job_id: JobId,
) -> Result<JobEvent, Box<dyn Error>> {
    wait_for(events, |e| e.job_id() == job_id && e.is_terminal()).await
}

/// Wait until `path` no longer exists. Cleanup runs after the terminal status
/// is reported, so callers cannot check for it at the terminal event.
pub async fn wait_until_removed(path: &Path) -> Result<(), Box<dyn Error>> {
    tokio::time::timeout(Duration::from_secs(20), async {
        while tokio::fs::try_exists(path).await.unwrap_or(true) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .map_err(|_| format!("{} was never removed", path.display()))?;
    Ok(())
}
