//! Rotating telemetry data file.
//!
//! Appends one CSV line per tick and rotates on size, keeping a fixed
//! number of numbered backups (`fridge-….data.1`, `.data.2`, …) — the
//! same scheme the original deployment used. Rotation happens when the
//! next line would push the file past the byte limit.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;

use crate::app::ports::TelemetrySink;
use crate::app::sample::Sample;

/// Telemetry data file name stamped with the regulator start time.
pub fn timestamped_data_file(start: DateTime<Local>) -> String {
    format!("fridge-{}.data", start.format("%Y-%m-%d_%H-%M-%S"))
}

/// Size-rotated, append-only CSV telemetry writer.
pub struct RotatingCsvWriter {
    path: PathBuf,
    max_bytes: u64,
    backups: u32,
}

impl RotatingCsvWriter {
    /// Create (truncating) the data file and bind the writer to it.
    pub fn create(path: &Path, max_bytes: u64, backups: u32) -> std::io::Result<Self> {
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backups,
        })
    }

    fn backup_path(&self, index: u32) -> PathBuf {
        PathBuf::from(format!("{}.{index}", self.path.display()))
    }

    /// Shift backups up by one and start a fresh file. With zero backups
    /// the file is simply truncated.
    fn rotate(&self) -> std::io::Result<()> {
        debug!("rotating {}", self.path.display());
        if self.backups == 0 {
            File::create(&self.path)?;
            return Ok(());
        }
        let _ = std::fs::remove_file(self.backup_path(self.backups));
        for i in (1..self.backups).rev() {
            let _ = std::fs::rename(self.backup_path(i), self.backup_path(i + 1));
        }
        std::fs::rename(&self.path, self.backup_path(1))?;
        File::create(&self.path)?;
        Ok(())
    }

    fn current_len(&self) -> u64 {
        std::fs::metadata(&self.path).map_or(0, |m| m.len())
    }
}

impl TelemetrySink for RotatingCsvWriter {
    fn record(&mut self, sample: &Sample) -> std::io::Result<()> {
        let line = sample.csv_line();
        let len = self.current_len();
        if len > 0 && len + line.len() as u64 + 1 > self.max_bytes {
            self.rotate()?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}
