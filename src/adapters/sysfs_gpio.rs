//! Sysfs GPIO output pin.
//!
//! Drives one `/sys/class/gpio` line as a binary output and exposes it as
//! an [`embedded_hal::digital::OutputPin`], which is the capability the
//! [`Actuator`](crate::control::actuator::Actuator) consumes. Export and
//! direction setup happen once at open; after that a write is a single
//! `value` file write.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use log::{debug, error};

use crate::error::{ActuatorError, Error, Result};

const GPIO_ROOT: &str = "/sys/class/gpio";

/// Error type for [`SysfsOutputPin`] writes.
#[derive(Debug)]
pub struct GpioWriteError;

impl embedded_hal::digital::Error for GpioWriteError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One exported, output-direction GPIO line.
pub struct SysfsOutputPin {
    pin: u32,
    value_path: PathBuf,
}

impl SysfsOutputPin {
    /// Export the line (if needed), set it to output, and bind to it.
    pub fn open(pin: u32) -> Result<Self> {
        Self::open_at(pin, Path::new(GPIO_ROOT))
    }

    /// As [`open`](Self::open) against an alternate sysfs root (tests).
    pub fn open_at(pin: u32, root: &Path) -> Result<Self> {
        let dir = root.join(format!("gpio{pin}"));
        if !dir.exists() {
            fs::write(root.join("export"), pin.to_string()).map_err(|e| {
                error!("gpio{pin}: export failed: {e}");
                Error::Actuator(ActuatorError::SetupFailed)
            })?;
            // udev needs a moment to apply group permissions to the new
            // gpioN directory.
            thread::sleep(Duration::from_millis(100));
        }
        fs::write(dir.join("direction"), "out").map_err(|e| {
            error!("gpio{pin}: direction setup failed: {e}");
            Error::Actuator(ActuatorError::SetupFailed)
        })?;
        debug!("gpio{pin}: exported as output");
        Ok(Self {
            pin,
            value_path: dir.join("value"),
        })
    }

    fn write_value(&self, value: &str) -> core::result::Result<(), GpioWriteError> {
        fs::write(&self.value_path, value).map_err(|e| {
            error!("gpio{}: value write failed: {e}", self.pin);
            GpioWriteError
        })
    }
}

impl ErrorType for SysfsOutputPin {
    type Error = GpioWriteError;
}

impl OutputPin for SysfsOutputPin {
    fn set_low(&mut self) -> core::result::Result<(), GpioWriteError> {
        self.write_value("0")
    }

    fn set_high(&mut self) -> core::result::Result<(), GpioWriteError> {
        self.write_value("1")
    }
}
