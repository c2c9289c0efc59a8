//! Periodic results summarisation.
//!
//! Every report period the aggregator condenses the samples seen since the
//! last report into one [`ReportRow`] (mean temperature, max/min/mean
//! control error, mean absolute error) and republishes the bounded row
//! history through a [`ReportSink`](crate::app::ports::ReportSink), newest
//! row first.
//!
//! Statistics accumulate incrementally as samples arrive; nothing is read
//! back from the telemetry file.

use chrono::{DateTime, Local, TimeDelta};

use crate::app::ports::ReportSink;
use crate::app::sample::Sample;

/// One summarised reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow {
    /// End of the reporting window.
    pub time: DateTime<Local>,
    /// Setpoint at the end of the window.
    pub setpoint: f32,
    /// Mean measured temperature over the window.
    pub mean: f32,
    /// Largest control error (measured − setpoint).
    pub max_err: f32,
    /// Smallest control error.
    pub min_err: f32,
    /// Mean control error.
    pub mean_err: f32,
    /// Mean absolute control error.
    pub mean_abs_err: f32,
}

impl ReportRow {
    /// Fixed-width table line matching the header from
    /// [`table_header`].
    pub fn format_fixed(&self) -> String {
        format!(
            "{} {:>4.1} {:>4.1} {:>4.1} {:>4.1} {:>5.1} {:>8.1}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.setpoint,
            self.mean,
            self.max_err,
            self.min_err,
            self.mean_err,
            self.mean_abs_err,
        )
    }
}

/// Fixed-width column header for the results table.
pub fn table_header() -> String {
    format!(
        "{:<11}{:<9}{:<5}{:<5}{:<5}{:<5}{:<6}{:<9}",
        "Date", "Time", "set", "mean", "maxE", "minE", "meanE", "meanAbsE"
    )
}

/// Running statistics for the current reporting window.
#[derive(Debug, Clone, Copy, Default)]
struct WindowStats {
    count: u32,
    sum_temp: f64,
    sum_err: f64,
    sum_abs_err: f64,
    max_err: f32,
    min_err: f32,
    last_setpoint: f32,
}

impl WindowStats {
    fn record(&mut self, sample: &Sample) {
        let err = sample.error();
        if self.count == 0 {
            self.max_err = err;
            self.min_err = err;
        } else {
            self.max_err = self.max_err.max(err);
            self.min_err = self.min_err.min(err);
        }
        self.count += 1;
        self.sum_temp += f64::from(sample.temperature);
        self.sum_err += f64::from(err);
        self.sum_abs_err += f64::from(err.abs());
        self.last_setpoint = sample.setpoint;
    }

    fn finish(&self, time: DateTime<Local>) -> ReportRow {
        let n = f64::from(self.count);
        ReportRow {
            time,
            setpoint: self.last_setpoint,
            mean: (self.sum_temp / n) as f32,
            max_err: self.max_err,
            min_err: self.min_err,
            mean_err: (self.sum_err / n) as f32,
            mean_abs_err: (self.sum_abs_err / n) as f32,
        }
    }
}

/// Windowed statistics over telemetry samples with a bounded row history.
pub struct ResultsAggregator {
    period: TimeDelta,
    next_due: DateTime<Local>,
    max_rows: usize,
    rows: Vec<ReportRow>,
    window: WindowStats,
}

impl ResultsAggregator {
    /// The first report is due immediately, as in the original controller;
    /// subsequent reports follow every `period`.
    pub fn new(period: std::time::Duration, max_rows: usize, now: DateTime<Local>) -> Self {
        Self {
            period: TimeDelta::from_std(period).unwrap_or(TimeDelta::try_minutes(10).unwrap()),
            next_due: now,
            max_rows,
            rows: Vec::new(),
            window: WindowStats::default(),
        }
    }

    /// Fold one sample into the current window.
    pub fn record(&mut self, sample: &Sample) {
        self.window.record(sample);
    }

    /// Publish the table if the report period has elapsed. Returns whether
    /// a flush happened. An empty window produces no row — the period is
    /// simply re-armed.
    pub fn flush_if_due(
        &mut self,
        now: DateTime<Local>,
        sink: &mut impl ReportSink,
    ) -> std::io::Result<bool> {
        if now < self.next_due {
            return Ok(false);
        }
        self.next_due = now + self.period;
        if self.window.count == 0 {
            return Ok(false);
        }

        let row = self.window.finish(now);
        self.window = WindowStats::default();
        self.rows.insert(0, row);
        self.rows.truncate(self.max_rows);

        sink.publish(&self.rows)?;
        Ok(true)
    }

    /// Retained rows, newest first.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }
}
