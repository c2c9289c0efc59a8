//! Fixed-width results table writer.
//!
//! Rewrites the whole table on every publish: header first, then rows
//! newest-to-oldest. The row history itself is bounded upstream by the
//! [`ResultsAggregator`](crate::report::ResultsAggregator), so the file
//! never grows past `max_report_rows` lines.

use std::fmt::Write as _;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::app::ports::ReportSink;
use crate::report::{table_header, ReportRow};

/// Writes the aggregated results table to a text file.
pub struct ResultsFileWriter {
    path: PathBuf,
}

impl ResultsFileWriter {
    /// Create (truncating) the results file and bind the writer to it.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl ReportSink for ResultsFileWriter {
    fn publish(&mut self, rows: &[ReportRow]) -> std::io::Result<()> {
        let mut out = String::with_capacity((rows.len() + 1) * 64);
        out.push_str(&table_header());
        out.push('\n');
        for row in rows {
            let _ = writeln!(out, "{}", row.format_fixed());
        }
        std::fs::write(&self.path, out)
    }
}
