//! Unified error types for the fridge regulator.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be passed around without allocation. Dwell refusals are **not**
//! errors — they are the `Blocked` outcome of a transition (see
//! [`Transition`](crate::control::actuator::Transition)); this module only
//! covers faults that stop the regulator.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level regulator error
// ---------------------------------------------------------------------------

/// Every fatal, fallible operation in the regulator funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The ambient sensor could not be read or returned malformed data.
    Sensor(SensorError),
    /// A GPIO actuator command failed.
    Actuator(ActuatorError),
    /// Peripheral or file initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The w1_slave device file could not be opened or read.
    ReadFailed,
    /// The device file did not contain a parseable `t=` field.
    Malformed,
    /// The 1-Wire CRC line did not report `YES`.
    CrcFailed,
    /// Consecutive read failures exceeded the configured limit.
    TooManyFailures,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "device file read failed"),
            Self::Malformed => write!(f, "malformed reading"),
            Self::CrcFailed => write!(f, "CRC check failed"),
            Self::TooManyFailures => write!(f, "too many consecutive read failures"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

/// Output hardware is unreachable or unwritable. Always fatal: a thermal
/// regulator that cannot assert its outputs must not keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO value write failed.
    WriteFailed,
    /// GPIO export or direction setup failed.
    SetupFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "GPIO write failed"),
            Self::SetupFailed => write!(f, "GPIO setup failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
