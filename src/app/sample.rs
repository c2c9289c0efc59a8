//! Per-tick telemetry record.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// An immutable snapshot emitted once per control tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub setpoint: f32,
    pub temperature: f32,
    pub heater_on: bool,
    pub cooler_on: bool,
}

impl Sample {
    /// Control error (measured − setpoint) for this tick.
    pub fn error(&self) -> f32 {
        self.temperature - self.setpoint
    }

    /// Render as one telemetry line:
    /// `timestamp, setpoint, measured, heater, cooler`.
    pub fn csv_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.setpoint,
            self.temperature,
            self.heater_on,
            self.cooler_on,
        )
    }
}
