//! The regulator — per-tick orchestration of the thermal control loop.
//!
//! [`Regulator`] owns the two actuators, their hysteresis bands, and the
//! results aggregator. All I/O flows through port traits injected at call
//! sites, making the whole service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ TelemetrySink
//!                 │        Regulator          │ ──▶ ReportSink
//!   OutputPin ◀── │  hysteresis · dwell gates │
//!                 └──────────────────────────┘
//! ```
//!
//! One logical thread: sensor read, decisions, actuation and logging are
//! strictly sequential within a tick. The caller paces ticks and owns the
//! shutdown flag.

use std::time::Instant;

use chrono::{DateTime, Local};
use embedded_hal::digital::OutputPin;
use log::{debug, error, warn};

use crate::config::FridgeConfig;
use crate::control::actuator::Actuator;
use crate::control::hysteresis::{HysteresisBand, Request, Side};
use crate::error::{Result, SensorError};
use crate::report::ResultsAggregator;

use super::ports::{ReportSink, SensorPort, TelemetrySink};
use super::sample::Sample;

/// What a tick did, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Sensor read, decisions applied, sample emitted.
    Regulated,
    /// Sensor read failed; no actuation, no sample, retry next period.
    SkippedSensorFailure,
}

/// The closed-loop thermal regulator.
pub struct Regulator<HP: OutputPin, CP: OutputPin> {
    heater: Actuator<HP>,
    cooler: Actuator<CP>,
    heater_band: HysteresisBand,
    cooler_band: HysteresisBand,
    setpoint: f32,
    aggregator: ResultsAggregator,
    tick_count: u64,
    sensor_failures: u32,
    max_sensor_failures: u32,
}

impl<HP: OutputPin, CP: OutputPin> Regulator<HP, CP> {
    /// Build both actuators (forcing their outputs off) and the hysteresis
    /// bands from configuration.
    pub fn new(
        config: &FridgeConfig,
        heater_pin: HP,
        cooler_pin: CP,
        now: Instant,
        wall: DateTime<Local>,
    ) -> Result<Self> {
        let heater = Actuator::new(
            "heater",
            heater_pin,
            std::time::Duration::from_secs(config.heater_min_on_secs),
            std::time::Duration::from_secs(config.heater_min_off_secs),
            now,
        )?;
        let cooler = Actuator::new(
            "cooler",
            cooler_pin,
            std::time::Duration::from_secs(config.cooler_min_on_secs),
            std::time::Duration::from_secs(config.cooler_min_off_secs),
            now,
        )?;
        Ok(Self {
            heater,
            cooler,
            heater_band: HysteresisBand::new(
                Side::Heat,
                config.setpoint_c,
                config.heater_on_hyst_c,
                config.heater_off_hyst_c,
            ),
            cooler_band: HysteresisBand::new(
                Side::Cool,
                config.setpoint_c,
                config.cooler_on_hyst_c,
                config.cooler_off_hyst_c,
            ),
            setpoint: config.setpoint_c,
            aggregator: ResultsAggregator::new(config.report_period(), config.max_report_rows, wall),
            tick_count: 0,
            sensor_failures: 0,
            max_sensor_failures: config.max_sensor_failures,
        })
    }

    /// Run one full control cycle: read → decide → actuate → telemetry →
    /// report.
    ///
    /// `now` is the monotonic tick-start timestamp (dwell arithmetic),
    /// `wall` the matching wall-clock time (telemetry and reports).
    pub fn tick(
        &mut self,
        now: Instant,
        wall: DateTime<Local>,
        sensor: &mut impl SensorPort,
        telemetry: &mut impl TelemetrySink,
        report: &mut impl ReportSink,
    ) -> Result<TickOutcome> {
        self.tick_count += 1;

        // 1. Read the sensor. The original controller read it twice per
        // tick (the first value feeds the log line, the second is the one
        // controlled on); that redundancy is deliberate and kept.
        let Some(first) = self.read_or_skip(sensor)? else {
            return Ok(TickOutcome::SkippedSensorFailure);
        };
        debug!(
            "i={} Error={:.3} Temp={:.3} Set temp={}",
            self.tick_count,
            first - self.setpoint,
            first,
            self.setpoint
        );
        let Some(temp) = self.read_or_skip(sensor)? else {
            return Ok(TickOutcome::SkippedSensorFailure);
        };
        self.sensor_failures = 0;

        debug!("{}", self.heater.status(now));
        debug!("{}", self.cooler.status(now));

        // 2. Heater decision — two independent guarded checks, re-reading
        // the actuator state between them.
        if self.heater_band.decide(temp, self.heater.is_on()) == Request::On {
            self.heater.turn_on(now)?;
        }
        if self.heater_band.decide(temp, self.heater.is_on()) == Request::Off {
            self.heater.turn_off(now)?;
        }

        // 3. Cooler decision, same shape.
        if self.cooler_band.decide(temp, self.cooler.is_on()) == Request::On {
            self.cooler.turn_on(now)?;
        }
        if self.cooler_band.decide(temp, self.cooler.is_on()) == Request::Off {
            self.cooler.turn_off(now)?;
        }

        // 4. Telemetry. Reporting failures never interrupt control.
        let sample = Sample {
            timestamp: wall,
            setpoint: self.setpoint,
            temperature: temp,
            heater_on: self.heater.is_on(),
            cooler_on: self.cooler.is_on(),
        };
        if let Err(e) = telemetry.record(&sample) {
            warn!("telemetry write failed: {e}");
        }

        // 5. Results aggregation, time-gated internally.
        self.aggregator.record(&sample);
        match self.aggregator.flush_if_due(wall, report) {
            Ok(true) => debug!("results table updated"),
            Ok(false) => {}
            Err(e) => warn!("results write failed: {e}"),
        }

        Ok(TickOutcome::Regulated)
    }

    /// Force both actuators off, bypassing dwell gates. Best-effort: a
    /// failure on one element never prevents the attempt on the other.
    pub fn shutdown(&mut self, now: Instant) -> Result<()> {
        let heater_res = self.heater.force_off(now);
        if let Err(e) = heater_res {
            error!("heater shutdown failed: {e}");
        }
        let cooler_res = self.cooler.force_off(now);
        if let Err(e) = cooler_res {
            error!("cooler shutdown failed: {e}");
        }
        heater_res.and(cooler_res)
    }

    pub fn heater_is_on(&self) -> bool {
        self.heater.is_on()
    }

    pub fn cooler_is_on(&self) -> bool {
        self.cooler.is_on()
    }

    /// Total control ticks executed since startup, including skipped ones.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Handle one failed sensor read: count it, skip the tick, and go
    /// fatal once the consecutive-failure budget is spent. A failed read
    /// is never treated as "no change in temperature" — the actuators are
    /// simply left alone for the tick.
    fn read_or_skip(&mut self, sensor: &mut impl SensorPort) -> Result<Option<f32>> {
        match sensor.read_temperature() {
            Ok(t) => Ok(Some(t)),
            Err(e) => {
                self.sensor_failures += 1;
                error!(
                    "sensor read failed ({e}), {} of {} tolerated",
                    self.sensor_failures, self.max_sensor_failures
                );
                if self.sensor_failures >= self.max_sensor_failures {
                    return Err(SensorError::TooManyFailures.into());
                }
                Ok(None)
            }
        }
    }
}
