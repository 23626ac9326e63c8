//! Fixed file names inside a job's working directory.

/// Level-1 scan list written by the export stage.
pub const MS1_FILE: &str = "scans.ms1";
/// Level-2 scan list written by the export stage.
pub const MS2_FILE: &str = "scans.ms2";
pub const HARDKLOR_CONFIG_FILE: &str = "Hardklor.conf";
pub const HARDKLOR_RESULTS_FILE: &str = "scans.hk";
pub const BULLSEYE_RESULTS_FILE: &str = "scans.be";
/// Bullseye auxiliary outputs, left in the working directory.
pub const BULLSEYE_MATCHES_FILE: &str = "matches.ms2";
pub const BULLSEYE_NO_MATCHES_FILE: &str = "nomatches.ms2";

/// Files moved to `<final_root>/<project_id>/` after a successful run.
pub const RELOCATED_FILES: [&str; 3] = [
    HARDKLOR_RESULTS_FILE,
    HARDKLOR_CONFIG_FILE,
    BULLSEYE_RESULTS_FILE,
];
