//! fridgectl — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                 │
//! │                                                          │
//! │  Ds18b20        SysfsOutputPin ×2    RotatingCsvWriter   │
//! │  (SensorPort)   (OutputPin)          (TelemetrySink)     │
//! │                                      ResultsFileWriter   │
//! │                                      (ReportSink)        │
//! │                                                          │
//! │  ─────────────── Port trait boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            Regulator (pure logic)                  │  │
//! │  │  hysteresis bands · dwell-gated actuators          │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  TickPacer (interruptible period wait) · ctrl-c flag     │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use log::{error, info, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode, WriteLogger,
};

use fridgectl::adapters::csv_log::{timestamped_data_file, RotatingCsvWriter};
use fridgectl::adapters::ds18b20::Ds18b20;
use fridgectl::adapters::results_file::ResultsFileWriter;
use fridgectl::adapters::sysfs_gpio::SysfsOutputPin;
use fridgectl::app::ports::{ReportSink, SensorPort, TelemetrySink};
use fridgectl::app::regulator::Regulator;
use fridgectl::config::FridgeConfig;
use fridgectl::pacing::TickPacer;

const LOG_FILE: &str = "fridge.log";

fn init_logging() -> Result<()> {
    let log_config = ConfigBuilder::new()
        .set_time_format_custom(simplelog::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .build();
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Debug,
            log_config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            log_config,
            File::create(LOG_FILE).context("cannot create log file")?,
        ),
    ])?;
    Ok(())
}

/// Run ticks until shutdown is raised or a fatal error surfaces.
fn run_loop(
    regulator: &mut Regulator<SysfsOutputPin, SysfsOutputPin>,
    sensor: &mut impl SensorPort,
    telemetry: &mut impl TelemetrySink,
    report: &mut impl ReportSink,
    pacer: &TickPacer,
    shutdown: &AtomicBool,
) -> fridgectl::error::Result<()> {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(());
        }
        let tick_start = Instant::now();
        regulator.tick(tick_start, Local::now(), sensor, telemetry, report)?;
        if !pacer.pace(tick_start, shutdown) {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;
    info!("fridgectl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading config from {path}");
            FridgeConfig::load(Path::new(&path)).context("config load failed")?
        }
        None => {
            info!("no config file given, using defaults");
            FridgeConfig::default()
        }
    };
    config.validate().context("invalid configuration")?;

    // ── 3. Shutdown flag ──────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .context("cannot install ctrl-c handler")?;
    }

    // ── 4. Adapters ───────────────────────────────────────────
    let mut sensor = Ds18b20::new("TempSens", &config.sensor_rom_code);
    let probe = sensor
        .read_temperature()
        .map_err(fridgectl::error::Error::from)
        .context("initial sensor probe failed")?;
    info!("ambient probe: {probe:.3} C");

    let start = Local::now();
    let data_path = timestamped_data_file(start);
    let mut telemetry = RotatingCsvWriter::create(
        Path::new(&data_path),
        config.telemetry_max_bytes,
        config.telemetry_backups,
    )
    .context("cannot create telemetry data file")?;
    let mut results =
        ResultsFileWriter::create(Path::new(&config.results_file)).context("cannot create results file")?;

    let heater_pin = SysfsOutputPin::open(config.heater_gpio).context("heater GPIO setup failed")?;
    let cooler_pin = SysfsOutputPin::open(config.cooler_gpio).context("cooler GPIO setup failed")?;

    // ── 5. Regulator ──────────────────────────────────────────
    let mut regulator = Regulator::new(&config, heater_pin, cooler_pin, Instant::now(), start)
        .context("regulator init failed")?;
    let pacer = TickPacer::new(config.sample_period());

    info!(
        "regulating to {} C every {} s (telemetry: {data_path})",
        config.setpoint_c, config.sample_period_secs
    );

    // ── 6. Control loop ───────────────────────────────────────
    let outcome = run_loop(
        &mut regulator,
        &mut sensor,
        &mut telemetry,
        &mut results,
        &pacer,
        &shutdown,
    );

    // ── 7. Safe shutdown ──────────────────────────────────────
    // Both actuators are forced off whether we are exiting cleanly or
    // crashing; dwell protection does not apply on the way out.
    if let Err(e) = regulator.shutdown(Instant::now()) {
        error!("forced actuator shutdown failed: {e}");
    }

    match outcome {
        Ok(()) => {
            info!("ctrl-c exit");
            Ok(())
        }
        Err(e) => {
            error!("fatal: {e}");
            Err(e.into())
        }
    }
}
