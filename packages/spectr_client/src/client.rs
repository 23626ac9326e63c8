use pipeline_core::{MsLevel, ScanRecord, SpectrSettings};
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::ExportError;
use crate::source::{ScanFuture, ScanSource};
use crate::wire::{ScanDataRequest, ScanNumbersRequest, parse_scan_numbers, parse_scans};

/// HTTP client for the two spectr export endpoints.
#[derive(Clone)]
pub struct SpectrClient {
    http_client: Client,
    scan_numbers_url: Url,
    scan_data_url: Url,
}

impl SpectrClient {
    pub fn new(http_client: Client, scan_numbers_url: Url, scan_data_url: Url) -> Self {
        Self {
            http_client,
            scan_numbers_url,
            scan_data_url,
        }
    }

    pub fn from_settings(http_client: Client, settings: &SpectrSettings) -> Self {
        Self::new(
            http_client,
            settings.scan_numbers_url.clone(),
            settings.scan_data_url.clone(),
        )
    }

    /// Fetches every scan number of `file_id` at the given MS level.
    pub async fn get_scan_numbers(
        &self,
        file_id: &str,
        level: MsLevel,
    ) -> Result<Vec<u64>, ExportError> {
        let body = self
            .post(&self.scan_numbers_url, &ScanNumbersRequest::new(file_id, level))
            .await?;
        let numbers = parse_scan_numbers(&body)?;
        tracing::debug!("spectr listed {} {} scans for {}", numbers.len(), level, file_id);
        Ok(numbers)
    }

    /// Fetches full scan records for the given scan numbers.
    pub async fn get_scans(
        &self,
        file_id: &str,
        scan_numbers: &[u64],
    ) -> Result<Vec<ScanRecord>, ExportError> {
        let body = self
            .post(&self.scan_data_url, &ScanDataRequest::new(file_id, scan_numbers))
            .await?;
        parse_scans(&body, file_id)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<Vec<u8>, ExportError> {
        let response = self
            .http_client
            .post(url.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("spectr request to {} returned {}", url, status);
            return Err(ExportError::from_status(status));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl ScanSource for SpectrClient {
    fn scan_numbers<'a>(&'a self, file_id: &'a str, level: MsLevel) -> ScanFuture<'a, Vec<u64>> {
        Box::pin(self.get_scan_numbers(file_id, level))
    }

    fn scans<'a>(
        &'a self,
        file_id: &'a str,
        scan_numbers: &'a [u64],
    ) -> ScanFuture<'a, Vec<ScanRecord>> {
        Box::pin(self.get_scans(file_id, scan_numbers))
    }
}
