//! Port traits — the boundary between the regulator and the outside world.
//!
//! ```text
//!   SensorPort ──▶ Regulator ──▶ Actuator pins (OutputPin)
//!                      │
//!                      ├──▶ TelemetrySink (one Sample per tick)
//!                      └──▶ ReportSink    (periodic results table)
//! ```
//!
//! Driven adapters (the DS18B20 file reader, the rotating CSV writer, the
//! results-table writer) implement these traits; the regulator consumes
//! them via generics and never touches files or hardware directly. The
//! actuator side needs no bespoke port — `embedded_hal::digital::OutputPin`
//! already is one.

use crate::app::sample::Sample;
use crate::error::SensorError;
use crate::report::ReportRow;

/// Read-side port: one ambient temperature reading in degrees Celsius.
///
/// A read may fail transiently; the regulator decides how many consecutive
/// failures it tolerates. Implementations must return an error for any
/// reading they cannot vouch for — never a stale or guessed value.
pub trait SensorPort {
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Append-only sink for per-tick telemetry records.
///
/// Failures are reporting problems, not control problems: the regulator
/// logs them and carries on.
pub trait TelemetrySink {
    fn record(&mut self, sample: &Sample) -> std::io::Result<()>;
}

/// Sink for the periodic results table, newest row first.
///
/// Like [`TelemetrySink`], failures never interrupt control.
pub trait ReportSink {
    fn publish(&mut self, rows: &[ReportRow]) -> std::io::Result<()>;
}
