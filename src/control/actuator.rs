//! Dwell-time-gated temperature element (heater or cooler relay).
//!
//! An [`Actuator`] owns one binary output and refuses transitions that
//! would violate its minimum on/off dwell times — the compressor in
//! particular must not be short-cycled. The actuator knows nothing about
//! temperatures; the regulator decides *whether* to switch, the actuator
//! decides *if it may*.
//!
//! ## State contract
//!
//! State only changes through [`turn_on`](Actuator::turn_on),
//! [`turn_off`](Actuator::turn_off) and [`force_off`](Actuator::force_off).
//! Construction drives the output low but leaves the state `Unknown`, so
//! the very first command in either direction bypasses the dwell gate —
//! at process start neither dwell timer has a meaningful baseline and the
//! plant must be able to reach a known state quickly.

use std::time::{Duration, Instant};

use embedded_hal::digital::OutputPin;
use log::{debug, error};

use crate::error::{ActuatorError, Result};

/// Switch state of one temperature element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Never transitioned since construction; dwell gates are bypassed.
    Unknown,
    On,
    Off,
}

/// Outcome of a gated transition attempt.
///
/// `Blocked` is an ordinary outcome, not an error — hardware faults travel
/// on the `Err` channel instead and are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The output was switched.
    Changed,
    /// Already in the requested state; timestamps untouched.
    NoChange,
    /// Dwell time not yet satisfied; no side effect.
    Blocked,
}

/// One controllable heating or cooling element behind a binary output.
pub struct Actuator<P: OutputPin> {
    name: &'static str,
    pin: P,
    state: SwitchState,
    last_on: Option<Instant>,
    last_off: Option<Instant>,
    min_on: Duration,
    min_off: Duration,
}

impl<P: OutputPin> Actuator<P> {
    /// Bind an actuator to its output and force it off.
    ///
    /// A failed initial write is fatal: the element's real state would be
    /// unknown and unprovable.
    pub fn new(
        name: &'static str,
        mut pin: P,
        min_on: Duration,
        min_off: Duration,
        now: Instant,
    ) -> Result<Self> {
        if pin.set_low().is_err() {
            error!("{name}: failed to switch off during init");
            return Err(ActuatorError::SetupFailed.into());
        }
        Ok(Self {
            name,
            pin,
            state: SwitchState::Unknown,
            last_on: None,
            last_off: Some(now),
            min_on,
            min_off,
        })
    }

    /// Attempt to switch the element on, subject to the min-off dwell.
    pub fn turn_on(&mut self, now: Instant) -> Result<Transition> {
        match self.state {
            SwitchState::On => {
                debug!("{}: already on, no change", self.name);
                return Ok(Transition::NoChange);
            }
            SwitchState::Unknown => {}
            SwitchState::Off => {
                let rested = self
                    .last_off
                    .is_none_or(|t| now.duration_since(t) >= self.min_off);
                if !rested {
                    debug!("{}: unable to switch on, min off time not met", self.name);
                    return Ok(Transition::Blocked);
                }
            }
        }

        self.set_output(true, now)?;
        self.last_on = Some(now);
        self.state = SwitchState::On;
        debug!("{}: switched on", self.name);
        Ok(Transition::Changed)
    }

    /// Attempt to switch the element off, subject to the min-on dwell.
    pub fn turn_off(&mut self, now: Instant) -> Result<Transition> {
        match self.state {
            SwitchState::Off => {
                debug!("{}: already off, no change", self.name);
                return Ok(Transition::NoChange);
            }
            SwitchState::Unknown => {}
            SwitchState::On => {
                let ran = self
                    .last_on
                    .is_none_or(|t| now.duration_since(t) >= self.min_on);
                if !ran {
                    debug!("{}: unable to switch off, min on time not met", self.name);
                    return Ok(Transition::Blocked);
                }
            }
        }

        self.set_output(false, now)?;
        self.last_off = Some(now);
        self.state = SwitchState::Off;
        debug!("{}: switched off", self.name);
        Ok(Transition::Changed)
    }

    /// Shutdown path: switch off regardless of dwell state.
    ///
    /// Shutdown safety outranks dwell protection.
    pub fn force_off(&mut self, now: Instant) -> Result<()> {
        self.set_output(false, now)?;
        self.last_off = Some(now);
        self.state = SwitchState::Off;
        debug!("{}: forced off", self.name);
        Ok(())
    }

    /// Whether the element is currently on. Side-effect free.
    pub fn is_on(&self) -> bool {
        self.state == SwitchState::On
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable `"<name> ON for HH:MM:SS"` summary for the debug log.
    pub fn status(&self, now: Instant) -> String {
        if self.is_on() {
            match self.last_on {
                Some(t) => format!("{} ON for {}", self.name, fmt_hms(now.duration_since(t))),
                None => format!("{} ON for unknown time", self.name),
            }
        } else {
            match self.last_off {
                Some(t) => format!("{} OFF for {}", self.name, fmt_hms(now.duration_since(t))),
                None => format!("{} OFF for unknown time", self.name),
            }
        }
    }

    fn set_output(&mut self, high: bool, _now: Instant) -> Result<()> {
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if res.is_err() {
            error!("{}: output write failed", self.name);
            return Err(ActuatorError::WriteFailed.into());
        }
        Ok(())
    }
}

fn fmt_hms(d: Duration) -> String {
    let s = d.as_secs();
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}
