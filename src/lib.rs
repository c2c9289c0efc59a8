//! Fridge thermal regulator library.
//!
//! Exposes the control core and the Linux adapters for integration
//! testing. The domain logic (dwell-gated actuators, hysteresis bands,
//! the per-tick regulator) never touches hardware or files directly — it
//! consumes port traits and `embedded_hal::digital::OutputPin`, so the
//! whole loop runs against mocks on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pacing;
pub mod report;
