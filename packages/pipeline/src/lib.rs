//! Feature detection pipeline.
//!
//! One [`Pipeline::execute`] call runs a job end to end:
//!
//! 1. create a fresh working directory named after the job
//! 2. export MS1 and MS2 scans from spectr into `scans.ms1` / `scans.ms2`
//! 3. write `Hardklor.conf`
//! 4. run Hardklor, producing `scans.hk`
//! 5. run Bullseye, producing `scans.be`
//! 6. move the results to `<final_root>/<project_id>/`
//!
//! The terminal status is reported before the working directory is cleaned up.

pub mod bullseye;
mod error;
mod executor;
mod export;
pub mod hardklor;
pub mod relocate;
mod tool;
mod workdir;

pub use error::PipelineError;
pub use executor::{JobReporter, Pipeline};
pub use workdir::WorkDir;

/// Caller-facing stage messages, reported in this order.
pub mod stage {
    pub const INITIATING: &str = "Initiating feature detection pipeline run...";
    pub const GATHERING_SCAN_NUMBERS: &str = "Gathering scan numbers from spectr";
    pub const CREATING_MS1: &str = "Creating MS1 file";
    pub const CREATING_MS2: &str = "Creating MS2 file";
    pub const WRITING_HARDKLOR_CONFIG: &str = "Writing Hardklor config file";
    pub const RUNNING_HARDKLOR: &str = "Running Hardklor";
    pub const RUNNING_BULLSEYE: &str = "Running Bullseye";
    pub const RELOCATING: &str = "Copying data to final location";
}
