//! Core control logic: dwell-gated actuators and hysteresis decisions.

pub mod actuator;
pub mod hysteresis;
