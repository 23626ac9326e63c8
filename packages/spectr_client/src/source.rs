//! Scan source abstraction.

use futures_util::future::BoxFuture;
use pipeline_core::{MsLevel, ScanRecord};

use crate::ExportError;

/// Future type returned by [`ScanSource`] methods.
pub type ScanFuture<'a, T> = BoxFuture<'a, Result<T, ExportError>>;

/// Anything that can list and fetch scans of a spectral file.
pub trait ScanSource: Send + Sync + 'static {
    /// All scan numbers of `file_id` at `level`, in service order.
    ///
    /// An empty listing is reported as [`ExportError::NoScanNumbers`].
    fn scan_numbers<'a>(&'a self, file_id: &'a str, level: MsLevel) -> ScanFuture<'a, Vec<u64>>;

    /// Full records for the given scan numbers. Every record has at least one peak.
    fn scans<'a>(
        &'a self,
        file_id: &'a str,
        scan_numbers: &'a [u64],
    ) -> ScanFuture<'a, Vec<ScanRecord>>;
}
