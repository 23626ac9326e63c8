#![allow(dead_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pipeline_core::{
    CleanupPolicy, Job, JobId, JobParams, MsLevel, PipelineSettings, Precursor, ProjectId,
    ScanRecord,
};
use pipeline::{JobReporter, Pipeline};
use spectr_client::{ExportError, ScanFuture, ScanSource};
use tempfile::TempDir;

pub const GOOD_FILE: &str = "good-file";
pub const NO_MS1_FILE: &str = "no-ms1-file";

pub const HARDKLOR_OK: &str = r#"#!/bin/sh
[ "$1" = "Hardklor.conf" ] || exit 3
grep -q "scans.ms1" "$1" || exit 4
echo "hardklor results" > scans.hk
"#;

/// Records its argument list into `scans.be` so tests can inspect the invocation.
pub const BULLSEYE_OK: &str = r#"#!/bin/sh
echo "$@" > scans.be
"#;

pub const TOOL_FAILS: &str = r#"#!/bin/sh
echo "segfault in feature finder" >&2
exit 2
"#;

pub const TOOL_NO_OUTPUT: &str = "#!/bin/sh\nexit 0\n";

/// In-memory spectr: two MS1 scans and one MS2 scan for [`GOOD_FILE`],
/// only MS2 for [`NO_MS1_FILE`], HTTP 503 for anything else.
#[derive(Default)]
pub struct FakeSource {
    pub batches: Mutex<Vec<Vec<u64>>>,
}

impl FakeSource {
    fn records(file_id: &str, level: MsLevel) -> Vec<ScanRecord> {
        let build = |n: u64, level: u8, precursor: Option<Precursor>| {
            let rt = n as f64 * 60.0;
            ScanRecord::new(n, level, rt, precursor, vec![400.25, 401.5], vec![10.0, 5.0])
        };
        let records = match (file_id, level) {
            (GOOD_FILE, MsLevel::Ms1) => vec![build(1, 1, None), build(3, 1, None)],
            (GOOD_FILE | NO_MS1_FILE, MsLevel::Ms2) => vec![build(
                2,
                2,
                Some(Precursor {
                    mz: 636.34,
                    charge: 2,
                }),
            )],
            _ => Vec::new(),
        };
        records.into_iter().filter_map(Result::ok).collect()
    }

    fn unavailable() -> ExportError {
        ExportError::Status {
            code: 503,
            message: "Got 503 error. Possibly invalid file id.".into(),
        }
    }
}

impl ScanSource for FakeSource {
    fn scan_numbers<'a>(&'a self, file_id: &'a str, level: MsLevel) -> ScanFuture<'a, Vec<u64>> {
        Box::pin(async move {
            if file_id != GOOD_FILE && file_id != NO_MS1_FILE {
                return Err(Self::unavailable());
            }
            let numbers: Vec<u64> = Self::records(file_id, level)
                .iter()
                .map(ScanRecord::scan_number)
                .collect();
            if numbers.is_empty() {
                return Err(ExportError::NoScanNumbers);
            }
            Ok(numbers)
        })
    }

    fn scans<'a>(
        &'a self,
        file_id: &'a str,
        scan_numbers: &'a [u64],
    ) -> ScanFuture<'a, Vec<ScanRecord>> {
        Box::pin(async move {
            if let Ok(mut batches) = self.batches.lock() {
                batches.push(scan_numbers.to_vec());
            }
            let mut all = Self::records(file_id, MsLevel::Ms1);
            all.extend(Self::records(file_id, MsLevel::Ms2));
            let scans: Vec<ScanRecord> = scan_numbers
                .iter()
                .filter_map(|n| all.iter().find(|s| s.scan_number() == *n).cloned())
                .collect();
            if scans.is_empty() {
                return Err(ExportError::NoScans);
            }
            Ok(scans)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported {
    Stage(String),
    Succeeded(String),
    Failed(String),
}

/// Reporter that remembers every call, and whether the working directory
/// still existed when the terminal status arrived.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<Reported>>,
    pub work_root: Option<PathBuf>,
    pub workdir_present_at_terminal: Mutex<Option<bool>>,
}

impl RecordingReporter {
    pub fn watching(work_root: &Path) -> Self {
        Self {
            work_root: Some(work_root.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Reported> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Reported::Stage(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Reported) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn note_terminal(&self, job_id: JobId) {
        let seen = self.workdir_present_at_terminal.lock();
        if let (Some(root), Ok(mut seen)) = (&self.work_root, seen) {
            *seen = Some(root.join(job_id.to_string()).exists());
        }
    }
}

impl JobReporter for RecordingReporter {
    fn stage(&self, _job_id: JobId, message: &str) {
        self.push(Reported::Stage(message.to_string()));
    }

    fn succeeded(&self, job_id: JobId, message: &str) {
        self.note_terminal(job_id);
        self.push(Reported::Succeeded(message.to_string()));
    }

    fn failed(&self, job_id: JobId, error: &str) {
        self.note_terminal(job_id);
        self.push(Reported::Failed(error.to_string()));
    }
}

/// Scratch roots plus fake tool executables.
pub struct Sandbox {
    pub work_root: TempDir,
    pub final_root: TempDir,
    pub tools: TempDir,
}

impl Sandbox {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            work_root: tempfile::tempdir()?,
            final_root: tempfile::tempdir()?,
            tools: tempfile::tempdir()?,
        })
    }

    pub fn settings(
        &self,
        hardklor: &str,
        bullseye: &str,
    ) -> Result<PipelineSettings, Box<dyn Error>> {
        Ok(PipelineSettings {
            work_root: self.work_root.path().to_path_buf(),
            final_root: self.final_root.path().to_path_buf(),
            hardklor_exec: write_script(self.tools.path(), "hardklor", hardklor)?,
            bullseye_exec: write_script(self.tools.path(), "bullseye", bullseye)?,
            batch_size: 1,
            cleanup: CleanupPolicy::Always,
            allow_empty_ms1: false,
        })
    }

    pub fn pipeline(&self, settings: PipelineSettings) -> (Pipeline, Arc<FakeSource>) {
        let source = Arc::new(FakeSource::default());
        (Pipeline::new(settings, source.clone()), source)
    }

    pub fn work_entries(&self) -> Result<usize, std::io::Error> {
        Ok(std::fs::read_dir(self.work_root.path())?.count())
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

pub fn job(project_id: &str, file_id: &str) -> Job {
    Job::new(
        ProjectId::new(project_id),
        JobParams {
            spectr_file_id: file_id.to_string(),
            hardklor_conf: "depth\t3\r\nresolution\t60000".to_string(),
            bullseye_conf: "# bullseye\nppm=10\nrt=2\n".to_string(),
        },
    )
}
