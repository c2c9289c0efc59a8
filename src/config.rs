//! System configuration parameters
//!
//! All tunable parameters for the fridge regulator. Values can be
//! overridden by passing a JSON config file path on the command line;
//! defaults match the original deployment (GPIO 6 heater, GPIO 5 cooler,
//! one DS18B20 on the 1-Wire bus).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core regulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FridgeConfig {
    // --- Hardware ---
    /// BCM GPIO line driving the heater relay
    pub heater_gpio: u32,
    /// BCM GPIO line driving the cooler relay
    pub cooler_gpio: u32,
    /// DS18B20 ROM code of the ambient sensor (directory under /sys/bus/w1/devices)
    pub sensor_rom_code: String,

    // --- Control ---
    /// Target enclosure temperature (Celsius)
    pub setpoint_c: f32,
    /// Degrees below setpoint at which the heater is asked to switch on
    pub heater_on_hyst_c: f32,
    /// Degrees below setpoint at which the heater is asked to switch off
    pub heater_off_hyst_c: f32,
    /// Degrees above setpoint at which the cooler is asked to switch on
    pub cooler_on_hyst_c: f32,
    /// Degrees above setpoint at which the cooler is asked to switch off
    pub cooler_off_hyst_c: f32,

    // --- Dwell protection ---
    /// Minimum time the heater must stay on before it may switch off (seconds)
    pub heater_min_on_secs: u64,
    /// Minimum time the heater must stay off before it may switch on (seconds)
    pub heater_min_off_secs: u64,
    /// Compressor minimum-on time (seconds)
    pub cooler_min_on_secs: u64,
    /// Compressor minimum-off time (seconds)
    pub cooler_min_off_secs: u64,

    // --- Timing ---
    /// Control loop sample period (seconds)
    pub sample_period_secs: u64,
    /// Results summarisation period (seconds)
    pub report_period_secs: u64,

    // --- Sensor fault policy ---
    /// Consecutive failed reads tolerated before the regulator halts
    pub max_sensor_failures: u32,

    // --- Files ---
    /// Telemetry data file rotation threshold (bytes)
    pub telemetry_max_bytes: u64,
    /// Rotated telemetry backups to keep
    pub telemetry_backups: u32,
    /// Results table path
    pub results_file: String,
    /// Historical result rows retained in the table
    pub max_report_rows: usize,
}

impl Default for FridgeConfig {
    fn default() -> Self {
        Self {
            // Hardware
            heater_gpio: 6,
            cooler_gpio: 5,
            sensor_rom_code: "28-0316027c72ff".to_string(),

            // Control
            setpoint_c: 21.0,
            heater_on_hyst_c: 0.2,
            heater_off_hyst_c: 0.1,
            cooler_on_hyst_c: 1.5,
            cooler_off_hyst_c: 1.0,

            // Dwell: a resistive heater tolerates fast cycling, the
            // compressor does not.
            heater_min_on_secs: 1,
            heater_min_off_secs: 1,
            cooler_min_on_secs: 60,
            cooler_min_off_secs: 180,

            // Timing
            sample_period_secs: 10,
            report_period_secs: 600,

            max_sensor_failures: 3,

            // Files
            telemetry_max_bytes: 10_000,
            telemetry_backups: 2,
            results_file: "results.txt".to_string(),
            max_report_rows: 1000,
        }
    }
}

impl FridgeConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject invalid operating parameters rather than clamping them.
    ///
    /// The on/off hysteresis ordering is what guarantees a dead band: if
    /// `on_hyst <= off_hyst` an actuator could be asked on and off at the
    /// same temperature and oscillate at the boundary.
    pub fn validate(&self) -> Result<()> {
        if self.heater_on_hyst_c <= self.heater_off_hyst_c {
            return Err(Error::Config("heater on-hysteresis must exceed off-hysteresis"));
        }
        if self.cooler_on_hyst_c <= self.cooler_off_hyst_c {
            return Err(Error::Config("cooler on-hysteresis must exceed off-hysteresis"));
        }
        if self.heater_off_hyst_c < 0.0 || self.cooler_off_hyst_c < 0.0 {
            return Err(Error::Config("off-hysteresis must be non-negative"));
        }
        if self.heater_gpio == self.cooler_gpio {
            return Err(Error::Config("heater and cooler must use distinct GPIO lines"));
        }
        if self.sample_period_secs == 0 {
            return Err(Error::Config("sample period must be non-zero"));
        }
        if self.report_period_secs == 0 {
            return Err(Error::Config("report period must be non-zero"));
        }
        if self.max_sensor_failures == 0 {
            return Err(Error::Config("max sensor failures must be non-zero"));
        }
        if self.sensor_rom_code.is_empty() {
            return Err(Error::Config("sensor ROM code must not be empty"));
        }
        Ok(())
    }

    pub fn sample_period(&self) -> Duration {
        Duration::from_secs(self.sample_period_secs)
    }

    pub fn report_period(&self) -> Duration {
        Duration::from_secs(self.report_period_secs)
    }
}
