//! DS18B20 1-Wire temperature sensor.
//!
//! The kernel's w1-therm driver exposes each probe as a two-line text
//! file:
//!
//! ```text
//! 50 05 4b 46 7f ff 0c 10 1c : crc=1c YES
//! 50 05 4b 46 7f ff 0c 10 1c t=21062
//! ```
//!
//! Line 1 carries the bus CRC verdict, line 2 the temperature in
//! millidegrees after `t=`. A reading that fails either check is an
//! error, never a value.

use std::path::PathBuf;

use log::debug;

use crate::app::ports::SensorPort;
use crate::error::SensorError;

const W1_DEVICES: &str = "/sys/bus/w1/devices";

/// One DS18B20 probe addressed by its ROM code.
pub struct Ds18b20 {
    name: &'static str,
    path: PathBuf,
}

impl Ds18b20 {
    pub fn new(name: &'static str, rom_code: &str) -> Self {
        let path = PathBuf::from(W1_DEVICES).join(rom_code).join("w1_slave");
        Self { name, path }
    }

    /// Bind to an explicit device file (tests, non-standard bus mounts).
    pub fn with_path(name: &'static str, path: PathBuf) -> Self {
        Self { name, path }
    }

    /// Parse the two-line w1_slave format into degrees Celsius.
    fn parse(text: &str) -> Result<f32, SensorError> {
        let mut lines = text.lines();
        let crc_line = lines.next().ok_or(SensorError::Malformed)?;
        if !crc_line.trim_end().ends_with("YES") {
            return Err(SensorError::CrcFailed);
        }
        let data_line = lines.next().ok_or(SensorError::Malformed)?;
        let (_, milli) = data_line.rsplit_once("t=").ok_or(SensorError::Malformed)?;
        let milli: f32 = milli.trim().parse().map_err(|_| SensorError::Malformed)?;
        Ok(milli / 1000.0)
    }
}

impl SensorPort for Ds18b20 {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            log::error!("{}: {} unreadable: {e}", self.name, self.path.display());
            SensorError::ReadFailed
        })?;
        let temp = Self::parse(&text)?;
        debug!("{} {temp}", self.name);
        Ok(temp)
    }
}
