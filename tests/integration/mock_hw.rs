//! Mock hardware and sinks for integration tests.
//!
//! Records every output-pin write so tests can assert on the full command
//! history without touching sysfs, and scripts sensor readings one read
//! at a time (the regulator reads twice per tick).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use fridgectl::app::ports::{ReportSink, SensorPort, TelemetrySink};
use fridgectl::app::sample::Sample;
use fridgectl::error::SensorError;
use fridgectl::report::ReportRow;

// ── Mock output pin ───────────────────────────────────────────

/// Shared view of one mock pin's write history.
#[derive(Clone, Default)]
pub struct PinProbe {
    levels: Arc<Mutex<Vec<bool>>>,
    fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl PinProbe {
    pub fn level(&self) -> bool {
        self.levels.lock().unwrap().last().copied().unwrap_or(false)
    }

    pub fn writes(&self) -> usize {
        self.levels.lock().unwrap().len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }
}

/// An output pin that records what is written to it.
pub struct MockPin {
    probe: PinProbe,
}

impl MockPin {
    /// Returns the pin plus a probe handle the test keeps after the pin
    /// moves into the regulator.
    pub fn new() -> (Self, PinProbe) {
        let probe = PinProbe::default();
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

#[derive(Debug)]
pub struct MockPinFault;

impl embedded_hal::digital::Error for MockPinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockPin {
    type Error = MockPinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), MockPinFault> {
        if self.probe.fail.load(Ordering::Relaxed) {
            return Err(MockPinFault);
        }
        self.probe.levels.lock().unwrap().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockPinFault> {
        if self.probe.fail.load(Ordering::Relaxed) {
            return Err(MockPinFault);
        }
        self.probe.levels.lock().unwrap().push(true);
        Ok(())
    }
}

// ── Scripted sensor ───────────────────────────────────────────

/// Pops one scripted result per read; once the script runs out, the last
/// result repeats. The regulator reads twice per tick, so
/// [`push_tick`](Self::push_tick) queues the same value twice.
pub struct ScriptedSensor {
    script: VecDeque<Result<f32, SensorError>>,
    last: Result<f32, SensorError>,
    pub reads: u32,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn steady(temp: f32) -> Self {
        Self {
            script: VecDeque::new(),
            last: Ok(temp),
            reads: 0,
        }
    }

    /// Queue one tick's worth of identical readings.
    pub fn push_tick(&mut self, temp: f32) {
        self.script.push_back(Ok(temp));
        self.script.push_back(Ok(temp));
    }

    /// Queue a single read result (for asymmetric double-read scripts).
    pub fn push_read(&mut self, result: Result<f32, SensorError>) {
        self.script.push_back(result);
    }
}

impl SensorPort for ScriptedSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        if let Some(r) = self.script.pop_front() {
            self.last = r;
        }
        self.last
    }
}

// ── Recording sinks ───────────────────────────────────────────

#[derive(Default)]
pub struct VecTelemetry {
    pub samples: Vec<Sample>,
    pub fail: bool,
}

impl TelemetrySink for VecTelemetry {
    fn record(&mut self, sample: &Sample) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::other("telemetry sink down"));
        }
        self.samples.push(sample.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct VecReport {
    pub tables: Vec<Vec<ReportRow>>,
}

impl ReportSink for VecReport {
    fn publish(&mut self, rows: &[ReportRow]) -> std::io::Result<()> {
        self.tables.push(rows.to_vec());
        Ok(())
    }
}
