//! Runs the ordered stages of one job and reports progress.

use std::sync::Arc;
use std::time::Instant;

use pipeline_core::layout::{
    BULLSEYE_RESULTS_FILE, HARDKLOR_CONFIG_FILE, HARDKLOR_RESULTS_FILE, MS1_FILE, MS2_FILE,
};
use pipeline_core::{Job, JobId, MsLevel, PIPELINE_COMPLETE_MESSAGE, PipelineSettings};
use spectr_client::ScanSource;

use crate::bullseye::BullseyeOptions;
use crate::workdir::WorkDir;
use crate::{PipelineError, export, hardklor, relocate, stage, tool};

/// Receives status updates while a job runs.
///
/// The executor calls `stage` before each stage and exactly one of
/// `succeeded` or `failed` before cleanup starts.
pub trait JobReporter: Send + Sync {
    fn stage(&self, job_id: JobId, message: &str);
    fn succeeded(&self, job_id: JobId, message: &str);
    fn failed(&self, job_id: JobId, error: &str);
}

/// The feature detection pipeline.
#[derive(Clone)]
pub struct Pipeline {
    settings: PipelineSettings,
    source: Arc<dyn ScanSource>,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings, source: Arc<dyn ScanSource>) -> Self {
        Self { settings, source }
    }

    /// Run every stage for `job`, record the outcome through `reporter`, then clean up.
    ///
    /// Errors are reported, not propagated as panics; the returned result is
    /// the same outcome the reporter saw.
    pub async fn execute(
        &self,
        job: &Job,
        reporter: &dyn JobReporter,
    ) -> Result<(), PipelineError> {
        let started = Instant::now();
        reporter.stage(job.id, stage::INITIATING);

        let mut workdir = None;
        let result = self.run_stages(job, reporter, &mut workdir).await;

        match &result {
            Ok(()) => {
                tracing::info!("Job {} finished in {:?}", job.id, started.elapsed());
                reporter.succeeded(job.id, PIPELINE_COMPLETE_MESSAGE);
            }
            Err(e) => {
                tracing::error!("Job {} failed: {}", job.id, e);
                reporter.failed(job.id, &e.to_string());
            }
        }

        self.cleanup(job.id, workdir, result.is_ok()).await;
        result
    }

    async fn run_stages(
        &self,
        job: &Job,
        reporter: &dyn JobReporter,
        workdir: &mut Option<WorkDir>,
    ) -> Result<(), PipelineError> {
        let dir = workdir.insert(WorkDir::acquire(&self.settings.work_root, job.id).await?);
        let file_id = job.params.spectr_file_id.trim();
        if file_id.is_empty() {
            return Err(PipelineError::EmptyFileId);
        }
        let source = self.source.as_ref();

        self.report(reporter, job.id, stage::GATHERING_SCAN_NUMBERS);
        let ms1_numbers =
            export::scan_numbers(source, file_id, MsLevel::Ms1, self.settings.allow_empty_ms1)
                .await?;
        let ms2_numbers = export::scan_numbers(source, file_id, MsLevel::Ms2, false).await?;

        self.report(reporter, job.id, stage::CREATING_MS1);
        export::write_scan_file(
            source,
            file_id,
            MsLevel::Ms1,
            &ms1_numbers,
            self.settings.batch_size,
            &dir.join(MS1_FILE),
        )
        .await?;

        self.report(reporter, job.id, stage::CREATING_MS2);
        export::write_scan_file(
            source,
            file_id,
            MsLevel::Ms2,
            &ms2_numbers,
            self.settings.batch_size,
            &dir.join(MS2_FILE),
        )
        .await?;

        self.report(reporter, job.id, stage::WRITING_HARDKLOR_CONFIG);
        hardklor::write_config(dir.path(), &job.params.hardklor_conf).await?;

        self.report(reporter, job.id, stage::RUNNING_HARDKLOR);
        tool::run_tool(
            "Hardklor",
            &self.settings.hardklor_exec,
            &[HARDKLOR_CONFIG_FILE.to_string()],
            dir.path(),
            &dir.join(HARDKLOR_RESULTS_FILE),
        )
        .await?;

        self.report(reporter, job.id, stage::RUNNING_BULLSEYE);
        let options = BullseyeOptions::parse(&job.params.bullseye_conf)?;
        tool::run_tool(
            "Bullseye",
            &self.settings.bullseye_exec,
            &options.to_args(),
            dir.path(),
            &dir.join(BULLSEYE_RESULTS_FILE),
        )
        .await?;

        self.report(reporter, job.id, stage::RELOCATING);
        let project_dir =
            relocate::relocate(dir.path(), &self.settings.final_root, &job.project_id).await?;
        tracing::info!("Job {} results stored in {:?}", job.id, project_dir);

        Ok(())
    }

    fn report(&self, reporter: &dyn JobReporter, job_id: JobId, message: &str) {
        tracing::info!("Job {}: {}", job_id, message);
        reporter.stage(job_id, message);
    }

    async fn cleanup(&self, job_id: JobId, workdir: Option<WorkDir>, succeeded: bool) {
        let Some(dir) = workdir else {
            return;
        };
        if !self.settings.cleanup.should_clean(succeeded) {
            tracing::info!("Keeping working directory {:?} for job {}", dir.path(), job_id);
            return;
        }

        let path = dir.path().to_path_buf();
        match dir.remove().await {
            Ok(()) => tracing::debug!("Removed working directory {:?}", path),
            Err(e) => tracing::warn!("Failed to remove working directory {:?}: {}", path, e),
        }
    }
}
