//! Linux adapters behind the port traits: the 1-Wire sensor file, sysfs
//! GPIO outputs, the rotating telemetry log and the results table.

pub mod csv_log;
pub mod ds18b20;
pub mod results_file;
pub mod sysfs_gpio;
