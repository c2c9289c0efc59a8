//! End-to-end regulator scenarios against mock hardware.

use std::time::{Duration, Instant};

use chrono::Local;

use fridgectl::app::regulator::{Regulator, TickOutcome};
use fridgectl::config::FridgeConfig;
use fridgectl::error::{Error, SensorError};

use crate::mock_hw::{MockPin, PinProbe, ScriptedSensor, VecReport, VecTelemetry};

struct Rig {
    regulator: Regulator<MockPin, MockPin>,
    heater: PinProbe,
    cooler: PinProbe,
    telemetry: VecTelemetry,
    report: VecReport,
    t0: Instant,
}

impl Rig {
    fn new(config: &FridgeConfig) -> Self {
        let (heater_pin, heater) = MockPin::new();
        let (cooler_pin, cooler) = MockPin::new();
        let t0 = Instant::now();
        let regulator =
            Regulator::new(config, heater_pin, cooler_pin, t0, Local::now()).unwrap();
        Self {
            regulator,
            heater,
            cooler,
            telemetry: VecTelemetry::default(),
            report: VecReport::default(),
            t0,
        }
    }

    fn tick_at(&mut self, secs: u64, sensor: &mut ScriptedSensor) -> TickOutcome {
        self.regulator
            .tick(
                self.t0 + Duration::from_secs(secs),
                Local::now(),
                sensor,
                &mut self.telemetry,
                &mut self.report,
            )
            .unwrap()
    }
}

fn config() -> FridgeConfig {
    FridgeConfig::default()
}

#[test]
fn heater_cycle_through_the_band() {
    // setpoint 21, heater hysteresis 0.2/0.1, heater dwell 1 s.
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(20.5);

    // 20.5 < 20.8: heater asked on; first transition bypasses dwell.
    rig.tick_at(0, &mut sensor);
    assert!(rig.regulator.heater_is_on());
    assert!(rig.heater.level());

    // 20.9 sits in the dead band: 20.9 < 20.8 is false, 20.9 > 20.9 is
    // false. The heater holds.
    sensor.push_tick(20.9);
    rig.tick_at(10, &mut sensor);
    assert!(rig.regulator.heater_is_on());

    // 21.5 > 20.9: heater asked off, dwell long satisfied.
    sensor.push_tick(21.5);
    rig.tick_at(20, &mut sensor);
    assert!(!rig.regulator.heater_is_on());
    assert!(!rig.heater.level());

    // The cooler never engaged anywhere in this band.
    assert!(!rig.regulator.cooler_is_on());
}

#[test]
fn cooler_blocked_by_min_on_dwell() {
    // cooler hysteresis 1.5/1.0, min-on 60 s.
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(23.0);

    // 23.0 > 22.5: cooler on.
    rig.tick_at(0, &mut sensor);
    assert!(rig.regulator.cooler_is_on());

    // Temperature drops into the off region (21.8 < 22.0) before min-on
    // elapsed: the request is refused and the compressor keeps running.
    sensor.push_tick(21.8);
    rig.tick_at(10, &mut sensor);
    assert!(rig.regulator.cooler_is_on(), "dwell must hold the cooler on");
    assert!(rig.cooler.level());

    // Same temperature once the dwell is satisfied: accepted.
    sensor.push_tick(21.8);
    rig.tick_at(70, &mut sensor);
    assert!(!rig.regulator.cooler_is_on());
}

#[test]
fn first_commands_bypass_dwell_in_both_directions() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(23.0);

    // No time has passed since construction, yet the cooler (min-off
    // 180 s) switches on immediately: state is still Unknown.
    rig.tick_at(0, &mut sensor);
    assert!(rig.regulator.cooler_is_on());
}

#[test]
fn shutdown_forces_off_inside_dwell_window() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(23.0);

    rig.tick_at(0, &mut sensor);
    assert!(rig.regulator.cooler_is_on());

    // Well inside the cooler's 60 s min-on window.
    rig.regulator
        .shutdown(rig.t0 + Duration::from_secs(1))
        .unwrap();
    assert!(!rig.regulator.cooler_is_on());
    assert!(!rig.cooler.level());
    assert!(!rig.heater.level());
}

#[test]
fn second_read_of_the_tick_is_the_controlled_value() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(0.0);
    sensor.push_read(Ok(25.0)); // logged
    sensor.push_read(Ok(20.5)); // controlled on

    rig.tick_at(0, &mut sensor);
    assert_eq!(sensor.reads, 2, "exactly two reads per tick");
    assert!(
        rig.regulator.heater_is_on(),
        "decision must use the second reading"
    );
    assert!(
        !rig.regulator.cooler_is_on(),
        "25.0 from the first read must not drive the cooler"
    );
    assert!((rig.telemetry.samples[0].temperature - 20.5).abs() < 1e-6);
}

#[test]
fn sample_emitted_per_tick_with_post_decision_states() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(20.5);

    rig.tick_at(0, &mut sensor);
    sensor.push_tick(20.9);
    rig.tick_at(10, &mut sensor);

    assert_eq!(rig.telemetry.samples.len(), 2);
    let s = &rig.telemetry.samples[0];
    assert!((s.setpoint - 21.0).abs() < 1e-6);
    assert!(s.heater_on, "sample reflects the state after actuation");
    assert!(!s.cooler_on);
}

#[test]
fn first_report_flushes_immediately() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(21.0);

    rig.tick_at(0, &mut sensor);
    assert_eq!(rig.report.tables.len(), 1);
    assert_eq!(rig.report.tables[0].len(), 1);
    let row = rig.report.tables[0][0];
    assert!((row.mean - 21.0).abs() < 1e-6);
}

#[test]
fn sensor_failure_skips_the_tick() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(20.5);
    sensor.push_read(Err(SensorError::ReadFailed));

    let outcome = rig.tick_at(0, &mut sensor);
    assert_eq!(outcome, TickOutcome::SkippedSensorFailure);
    assert!(rig.telemetry.samples.is_empty(), "no sample on a skipped tick");
    assert_eq!(rig.heater.writes(), 1, "no actuation beyond the init write");
    assert!(!rig.regulator.heater_is_on());
}

#[test]
fn consecutive_sensor_failures_become_fatal() {
    let mut rig = Rig::new(&config()); // max_sensor_failures = 3
    let mut sensor = ScriptedSensor::steady(21.0);

    for i in 0..2 {
        sensor.push_read(Err(SensorError::ReadFailed));
        let outcome = rig
            .regulator
            .tick(
                rig.t0 + Duration::from_secs(i * 10),
                Local::now(),
                &mut sensor,
                &mut rig.telemetry,
                &mut rig.report,
            )
            .unwrap();
        assert_eq!(outcome, TickOutcome::SkippedSensorFailure);
    }

    sensor.push_read(Err(SensorError::ReadFailed));
    let err = rig
        .regulator
        .tick(
            rig.t0 + Duration::from_secs(20),
            Local::now(),
            &mut sensor,
            &mut rig.telemetry,
            &mut rig.report,
        )
        .unwrap_err();
    assert_eq!(err, Error::Sensor(SensorError::TooManyFailures));
}

#[test]
fn successful_read_resets_the_failure_budget() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(21.0);

    // Alternate one failed tick with one clean tick, more times than the
    // failure budget allows consecutively. Never goes fatal.
    for round in 0..4u64 {
        sensor.push_read(Err(SensorError::ReadFailed));
        let skipped = rig.tick_at(round * 20, &mut sensor);
        assert_eq!(skipped, TickOutcome::SkippedSensorFailure);

        sensor.push_tick(21.0);
        let ok = rig.tick_at(round * 20 + 10, &mut sensor);
        assert_eq!(ok, TickOutcome::Regulated);
    }
}

#[test]
fn telemetry_sink_failure_never_interrupts_control() {
    let mut rig = Rig::new(&config());
    rig.telemetry.fail = true;
    let mut sensor = ScriptedSensor::steady(20.5);

    let outcome = rig.tick_at(0, &mut sensor);
    assert_eq!(outcome, TickOutcome::Regulated);
    assert!(rig.regulator.heater_is_on(), "control proceeded despite the sink");
}

#[test]
fn actuator_write_failure_is_fatal() {
    let mut rig = Rig::new(&config());
    let mut sensor = ScriptedSensor::steady(20.5);
    rig.heater.fail_writes(true);

    let err = rig
        .regulator
        .tick(
            rig.t0,
            Local::now(),
            &mut sensor,
            &mut rig.telemetry,
            &mut rig.report,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Actuator(_)));
}
