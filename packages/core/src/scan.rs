//! Mass-spectrometry scan records.

use serde::{Deserialize, Serialize};

/// Mass of a proton in daltons.
pub const PROTON_MASS: f64 = 1.007276466621;

/// Neutral mass of a precursor ion given its m/z and charge.
pub fn neutral_mass(mz: f64, charge: i32) -> f64 {
    let charge = f64::from(charge);
    mz * charge - charge * PROTON_MASS
}

/// MS level of a scan. Only the two levels the pipeline exports are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MsLevel {
    Ms1,
    Ms2,
}

impl MsLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            MsLevel::Ms1 => 1,
            MsLevel::Ms2 => 2,
        }
    }
}

impl From<MsLevel> for u8 {
    fn from(level: MsLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for MsLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MsLevel::Ms1),
            2 => Ok(MsLevel::Ms2),
            other => Err(format!("unsupported MS level: {other}")),
        }
    }
}

impl std::fmt::Display for MsLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MS{}", self.as_u8())
    }
}

/// Precursor ion of a level-2 scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precursor {
    pub mz: f64,
    pub charge: i32,
}

impl Precursor {
    pub fn neutral_mass(&self) -> f64 {
        neutral_mass(self.mz, self.charge)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("scan {scan_number} has {mz} m/z values but {intensity} intensities")]
pub struct PeakLengthMismatch {
    pub scan_number: u64,
    pub mz: usize,
    pub intensity: usize,
}

/// One acquired scan. Peak order is acquisition order and is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    scan_number: u64,
    level: u8,
    retention_time_secs: f64,
    precursor: Option<Precursor>,
    mz: Vec<f64>,
    intensity: Vec<f64>,
}

impl ScanRecord {
    /// Build a record from index-aligned m/z and intensity sequences.
    pub fn new(
        scan_number: u64,
        level: u8,
        retention_time_secs: f64,
        precursor: Option<Precursor>,
        mz: Vec<f64>,
        intensity: Vec<f64>,
    ) -> Result<Self, PeakLengthMismatch> {
        if mz.len() != intensity.len() {
            return Err(PeakLengthMismatch {
                scan_number,
                mz: mz.len(),
                intensity: intensity.len(),
            });
        }

        Ok(Self {
            scan_number,
            level,
            retention_time_secs,
            precursor,
            mz,
            intensity,
        })
    }

    pub fn scan_number(&self) -> u64 {
        self.scan_number
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn retention_time_mins(&self) -> f64 {
        self.retention_time_secs / 60.0
    }

    pub fn precursor(&self) -> Option<Precursor> {
        self.precursor
    }

    pub fn mz(&self) -> &[f64] {
        &self.mz
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// `(mz, intensity)` pairs in acquisition order.
    pub fn peaks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mz.iter().copied().zip(self.intensity.iter().copied())
    }
}
