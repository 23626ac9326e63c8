use pipeline_core::PeakLengthMismatch;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP request to spectr failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message}")]
    Status { code: u16, message: String },

    #[error("Got spectr success, but found no {0} in response")]
    MissingKey(&'static str),

    #[error("Got spectr success, but found no scan numbers in response")]
    NoScanNumbers,

    #[error("Got spectr success, but found no scans in response")]
    NoScans,

    #[error("Found no peaks in scan {scan_number} for spectr file {file_id}")]
    NoPeaks { scan_number: u64, file_id: String },

    #[error("Malformed spectr response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed scan in spectr response: {0}")]
    InvalidScan(#[from] PeakLengthMismatch),
}

impl ExportError {
    /// Map a non-success HTTP status to a caller-facing error.
    pub fn from_status(status: StatusCode) -> Self {
        let code = status.as_u16();
        let message = match code / 100 {
            5 => format!("Got {code} error. Possibly invalid file id."),
            4 => format!("Got {code} error. Check URL."),
            3 => format!("Got {code} error. Redirect misconfiguration, use the final URL."),
            _ => format!(
                "Spectr: Got error code: {code}: {}",
                status.canonical_reason().unwrap_or("unknown reason")
            ),
        };
        ExportError::Status { code, message }
    }
}
