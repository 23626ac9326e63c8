//! Export stage: scan numbers and scan records from spectr into MS1/MS2 files.

use std::path::Path;

use pipeline_core::MsLevel;
use scan_files::{ScanFileFormat, ScanFileWriter};
use spectr_client::{ExportError, ScanSource};

use crate::PipelineError;

/// Fetch the scan numbers of one MS level.
///
/// An empty listing is an error unless `allow_empty` is set.
pub(crate) async fn scan_numbers(
    source: &dyn ScanSource,
    file_id: &str,
    level: MsLevel,
    allow_empty: bool,
) -> Result<Vec<u64>, PipelineError> {
    let numbers = match source.scan_numbers(file_id, level).await {
        Ok(numbers) => numbers,
        Err(ExportError::NoScanNumbers) if allow_empty => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if numbers.is_empty() {
        if !allow_empty {
            return Err(ExportError::NoScanNumbers.into());
        }
        tracing::warn!("Spectr file {} has no {} scans", file_id, level);
    }
    Ok(numbers)
}

/// Stream the given scans into a new scan file at `path`, `batch_size` scans
/// per request. Returns the number of scans written.
pub(crate) async fn write_scan_file(
    source: &dyn ScanSource,
    file_id: &str,
    level: MsLevel,
    scan_numbers: &[u64],
    batch_size: usize,
    path: &Path,
) -> Result<usize, PipelineError> {
    let format = ScanFileFormat::for_level(level);
    let owned_path = path.to_path_buf();
    let mut writer =
        tokio::task::spawn_blocking(move || ScanFileWriter::create(&owned_path, format)).await??;

    for batch in scan_numbers.chunks(batch_size.max(1)) {
        let scans = source.scans(file_id, batch).await?;
        tracing::debug!("Fetched {} {} scans for {}", scans.len(), level, file_id);

        writer = tokio::task::spawn_blocking(move || {
            writer.write_scans(&scans)?;
            Ok::<_, scan_files::WriteError>(writer)
        })
        .await??;
    }

    let written = writer.scans_written();
    tokio::task::spawn_blocking(move || writer.finish()).await??;
    tracing::info!("Wrote {} {} scans to {:?}", written, level, path);
    Ok(written)
}
