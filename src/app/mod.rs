//! Application core: port traits, the telemetry record, and the regulator
//! that orchestrates one control tick.

pub mod ports;
pub mod regulator;
pub mod sample;
