//! Core domain types for the feature detection service.
//!
//! This crate contains shared types used across all packages:
//! - Job, JobStatus and StatusReport for pipeline runs
//! - ScanRecord for exported scan data
//! - Settings for the environment-driven configuration
//! - Events for status change notifications

mod events;
mod job;
pub mod layout;
mod scan;
pub mod settings;

pub use events::JobEvent;
pub use job::{
    CancelOutcome, DEFAULT_PROCESSING_MESSAGE, Job, JobId, JobParams, JobStatus,
    PIPELINE_COMPLETE_MESSAGE, PROJECT_MISMATCH_MESSAGE, ProjectId, StatusReport,
};
pub use scan::{MsLevel, PROTON_MASS, PeakLengthMismatch, Precursor, ScanRecord, neutral_mass};
pub use settings::{CleanupPolicy, ConfigError, PipelineSettings, Settings, SpectrSettings};
