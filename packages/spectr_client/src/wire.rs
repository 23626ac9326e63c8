//! JSON bodies exchanged with spectr.

use pipeline_core::{MsLevel, Precursor, ScanRecord};
use serde::{Deserialize, Serialize};

use crate::ExportError;

#[derive(Debug, Serialize)]
pub(crate) struct ScanNumbersRequest<'a> {
    #[serde(rename = "scanFileAPIKey")]
    pub scan_file_api_key: &'a str,
    #[serde(rename = "scanLevelsToInclude")]
    pub scan_levels_to_include: [u8; 1],
}

impl<'a> ScanNumbersRequest<'a> {
    pub fn new(file_id: &'a str, level: MsLevel) -> Self {
        Self {
            scan_file_api_key: file_id,
            scan_levels_to_include: [level.as_u8()],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScanDataRequest<'a> {
    #[serde(rename = "scanFileAPIKey")]
    pub scan_file_api_key: &'a str,
    #[serde(rename = "includeParentScans")]
    pub include_parent_scans: &'static str,
    #[serde(rename = "scanNumbers")]
    pub scan_numbers: &'a [u64],
}

impl<'a> ScanDataRequest<'a> {
    pub fn new(file_id: &'a str, scan_numbers: &'a [u64]) -> Self {
        Self {
            scan_file_api_key: file_id,
            include_parent_scans: "NO",
            scan_numbers,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScanNumbersResponse {
    #[serde(rename = "scanNumbers")]
    scan_numbers: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
struct ScanDataResponse {
    scans: Option<Vec<WireScan>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScan {
    level: u8,
    scan_number: u64,
    retention_time: f64,
    precursor_charge: Option<i32>,
    #[serde(rename = "precursor_M_Over_Z")]
    precursor_mz: Option<f64>,
    peaks: Option<Vec<WirePeak>>,
}

#[derive(Debug, Deserialize)]
struct WirePeak {
    mz: f64,
    intensity: f64,
}

/// Parse a successful scan-number listing.
pub(crate) fn parse_scan_numbers(body: &[u8]) -> Result<Vec<u64>, ExportError> {
    let response: ScanNumbersResponse = serde_json::from_slice(body)?;
    let numbers = response
        .scan_numbers
        .ok_or(ExportError::MissingKey("scanNumbers"))?;
    if numbers.is_empty() {
        return Err(ExportError::NoScanNumbers);
    }
    Ok(numbers)
}

/// Parse a successful scan-data response into records, in response order.
pub(crate) fn parse_scans(body: &[u8], file_id: &str) -> Result<Vec<ScanRecord>, ExportError> {
    let response: ScanDataResponse = serde_json::from_slice(body)?;
    let scans = response.scans.ok_or(ExportError::MissingKey("scans"))?;
    if scans.is_empty() {
        return Err(ExportError::NoScans);
    }

    scans
        .into_iter()
        .map(|scan| {
            let peaks = match scan.peaks {
                Some(peaks) if !peaks.is_empty() => peaks,
                _ => {
                    return Err(ExportError::NoPeaks {
                        scan_number: scan.scan_number,
                        file_id: file_id.to_string(),
                    });
                }
            };

            let precursor = match (scan.precursor_mz, scan.precursor_charge) {
                (Some(mz), Some(charge)) => Some(Precursor { mz, charge }),
                _ => None,
            };

            let (mz, intensity): (Vec<f64>, Vec<f64>) =
                peaks.into_iter().map(|p| (p.mz, p.intensity)).unzip();
            Ok(ScanRecord::new(
                scan.scan_number,
                scan.level,
                scan.retention_time,
                precursor,
                mz,
                intensity,
            )?)
        })
        .collect()
}
