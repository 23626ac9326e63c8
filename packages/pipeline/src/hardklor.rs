//! Hardklor configuration file.

use std::path::{Path, PathBuf};

use pipeline_core::layout::{HARDKLOR_CONFIG_FILE, HARDKLOR_RESULTS_FILE, MS1_FILE};

use crate::PipelineError;

/// Normalize the caller's Hardklor configuration and append the input/output line.
pub fn build_config(conf: &str) -> Result<String, PipelineError> {
    if conf.trim().is_empty() {
        return Err(PipelineError::EmptyHardklorConfig);
    }

    let mut text = conf.replace("\r\n", "\n").replace('\r', "\n");
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&format!("{MS1_FILE}\t{HARDKLOR_RESULTS_FILE}\n"));
    Ok(text)
}

/// Write the built configuration into `dir`.
pub(crate) async fn write_config(dir: &Path, conf: &str) -> Result<PathBuf, PipelineError> {
    let text = build_config(conf)?;
    let path = dir.join(HARDKLOR_CONFIG_FILE);
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| PipelineError::io(&path, e))?;
    Ok(path)
}
