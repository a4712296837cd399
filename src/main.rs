//! Firewatch host simulator entry point.
//!
//! Runs the monitor against simulated peripherals with the operator
//! console on stdin/stdout.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  PinHardware<SimAdc, SimPin>   ConsoleChannel   LogEventSink │
//! │  (Sensor + Actuator)           (Commands)       (EventSink)  │
//! │  HostClock (Clock)                                           │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                   │  │
//! │  │  Sensors · FSM · Indicators · Suppression · Commands   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `firewatch [config.json]`.  The monitor keeps running after stdin
//! closes; stop it with a signal.
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use firewatch::adapters::console::ConsoleChannel;
use firewatch::adapters::hardware::{OutputPins, PinHardware};
use firewatch::adapters::log_sink::LogEventSink;
use firewatch::adapters::sim::{SimAdc, SimPin};
use firewatch::adapters::time::HostClock;
use firewatch::app::ports::Clock;
use firewatch::app::service::AppService;
use firewatch::config::MonitorConfig;

/// Simulated room: 22 °C up to 75 °C and back, 1.5 °C per reading.
const SIM_LOW_C: f32 = 22.0;
const SIM_HIGH_C: f32 = 75.0;
const SIM_STEP_C: f32 = 1.5;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing logger: {e}"))?;

    info!("Firewatch v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config = MonitorConfig::from_json(&json)
                .with_context(|| format!("loading config {path}"))?;
            info!("Config loaded from {path}");
            config
        }
        None => {
            let config = MonitorConfig::default();
            config.validate().context("default config")?;
            config
        }
    };
    let loop_interval = Duration::from_millis(u64::from(config.loop_interval_ms));

    // ── 3. Adapters ───────────────────────────────────────────
    let mut hw = PinHardware::new(
        SimAdc::ramp(SIM_LOW_C, SIM_HIGH_C, SIM_STEP_C),
        SimPin::new(false),
        OutputPins {
            green: SimPin::new(false),
            yellow: SimPin::new(false),
            red: SimPin::new(false),
            buzzer: SimPin::new(false),
            relay: SimPin::new(false),
        },
    );
    let mut console = ConsoleChannel::stdio().context("starting console")?;
    let mut sink = LogEventSink::new();
    let clock = HostClock::new();

    // ── 4. Service ────────────────────────────────────────────
    let mut app = AppService::new(config);
    app.start(clock.now_ms(), &mut sink);
    info!("System ready. Type HELP for commands.");

    // ── 5. Polling loop ───────────────────────────────────────
    // Monitoring never stops; losing the console only loses the operator.
    let mut console_open = true;
    loop {
        app.tick(clock.now_ms(), &mut hw, &mut console, &mut sink);
        if console_open && console.is_closed() {
            console_open = false;
            warn!("Console closed, monitoring continues without operator input");
        }
        std::thread::sleep(loop_interval);
    }
}
