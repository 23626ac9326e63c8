//! Writers for the MS1 and MS2 scan list formats.
//!
//! Both formats are line oriented: a block of `H` header lines followed by
//! one block per scan. A scan block starts with an `S` line, carries the
//! retention time on an `I` line (in minutes), and for MS2 a `Z` line with
//! the precursor charge and neutral mass. Peaks follow as `"<mz> <intensity>"`
//! lines in exactly the order they were acquired.
//!
//! Scans are written one at a time so callers can stream batches straight to
//! disk without holding a whole acquisition in memory.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use pipeline_core::{MsLevel, ScanRecord};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("scan {scan_number} has no precursor m/z or charge")]
    MissingPrecursor { scan_number: u64 },

    #[error("scan {scan_number} is an MS{found} scan, expected MS{expected}")]
    LevelMismatch {
        scan_number: u64,
        found: u8,
        expected: u8,
    },
}

/// Which scan list format a writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFileFormat {
    Ms1,
    Ms2,
}

impl ScanFileFormat {
    pub fn for_level(level: MsLevel) -> Self {
        match level {
            MsLevel::Ms1 => ScanFileFormat::Ms1,
            MsLevel::Ms2 => ScanFileFormat::Ms2,
        }
    }

    fn level(self) -> u8 {
        match self {
            ScanFileFormat::Ms1 => 1,
            ScanFileFormat::Ms2 => 2,
        }
    }

    fn extractor(self) -> &'static str {
        match self {
            ScanFileFormat::Ms1 => "Spectr to MS1",
            ScanFileFormat::Ms2 => "Spectr to MS2",
        }
    }
}

/// Streaming writer for one scan list file.
pub struct ScanFileWriter<W: Write> {
    out: W,
    format: ScanFileFormat,
    scans_written: usize,
}

impl ScanFileWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header, dated today.
    pub fn create(path: &Path, format: ScanFileFormat) -> Result<Self, WriteError> {
        let file = File::create(path)?;
        tracing::debug!("Writing {:?} scan file to {:?}", format, path);
        Self::new(BufWriter::new(file), format, Local::now().date_naive())
    }
}

impl<W: Write> ScanFileWriter<W> {
    /// Wrap `out` and write the header block.
    pub fn new(
        out: W,
        format: ScanFileFormat,
        creation_date: NaiveDate,
    ) -> Result<Self, WriteError> {
        let mut writer = Self {
            out,
            format,
            scans_written: 0,
        };
        writer.write_header("CreationDate", &creation_date.format("%Y%m%d").to_string())?;
        writer.write_header("Extractor", format.extractor())?;
        writer.write_header(
            "Comments",
            concat!("Written by feature-detection-service ", env!("CARGO_PKG_VERSION")),
        )?;
        Ok(writer)
    }

    fn write_header(&mut self, key: &str, value: &str) -> io::Result<()> {
        writeln!(self.out, "H\t{key}\t{value}")
    }

    /// Append one scan block.
    pub fn write_scan(&mut self, scan: &ScanRecord) -> Result<(), WriteError> {
        let n = scan.scan_number();
        if scan.level() != self.format.level() {
            return Err(WriteError::LevelMismatch {
                scan_number: n,
                found: scan.level(),
                expected: self.format.level(),
            });
        }

        match self.format {
            ScanFileFormat::Ms1 => {
                writeln!(self.out, "S\t{n}\t{n}")?;
                writeln!(self.out, "I\tRTime\t{}", scan.retention_time_mins())?;
            }
            ScanFileFormat::Ms2 => {
                let precursor = scan
                    .precursor()
                    .ok_or(WriteError::MissingPrecursor { scan_number: n })?;
                writeln!(self.out, "S\t{n}\t{n}\t{}", precursor.mz)?;
                writeln!(self.out, "I\tRTime\t{}", scan.retention_time_mins())?;
                writeln!(self.out, "Z\t{}\t{}", precursor.charge, precursor.neutral_mass())?;
            }
        }

        for (mz, intensity) in scan.peaks() {
            writeln!(self.out, "{mz} {intensity}")?;
        }

        self.scans_written += 1;
        Ok(())
    }

    /// Append every scan from `scans`, in order.
    pub fn write_scans<'a>(
        &mut self,
        scans: impl IntoIterator<Item = &'a ScanRecord>,
    ) -> Result<(), WriteError> {
        for scan in scans {
            self.write_scan(scan)?;
        }
        Ok(())
    }

    pub fn scans_written(&self) -> usize {
        self.scans_written
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W, WriteError> {
        self.out.flush()?;
        Ok(self.out)
    }
}
