//! Mock adapters for integration tests.
//!
//! Records every actuator call, every response line and every event so
//! tests can assert on the full history without real pins or a console.

use std::collections::VecDeque;

use firewatch::app::events::AppEvent;
use firewatch::app::ports::{ActuatorPort, CommandChannel, CommandLine, EventSink, Output, SensorPort};
use firewatch::app::service::AppService;
use firewatch::config::MonitorConfig;
use firewatch::error::SensorError;

// ── MockHardware ──────────────────────────────────────────────

/// Scripted sensors plus recorded outputs.  When the script runs dry the
/// last value repeats.
pub struct MockHardware {
    temperatures: VecDeque<Result<f32, SensorError>>,
    last_temperature: Result<f32, SensorError>,
    pub motion: bool,
    pub calls: Vec<(Output, bool)>,
    levels: [bool; 5],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            temperatures: VecDeque::new(),
            last_temperature: Ok(25.0),
            motion: false,
            calls: Vec::new(),
            levels: [false; 5],
        }
    }

    pub fn queue(&mut self, sample: Result<f32, SensorError>) {
        self.temperatures.push_back(sample);
    }

    /// Current level of an output, as last driven.
    pub fn output(&self, output: Output) -> bool {
        self.levels[output as usize]
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        if let Some(next) = self.temperatures.pop_front() {
            self.last_temperature = next;
        }
        self.last_temperature
    }

    fn read_motion(&mut self) -> bool {
        self.motion
    }
}

impl ActuatorPort for MockHardware {
    fn set_output(&mut self, output: Output, on: bool) {
        self.calls.push((output, on));
        self.levels[output as usize] = on;
    }
}

// ── MockChannel ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockChannel {
    pub inbox: VecDeque<String>,
    pub sent: Vec<String>,
}

impl CommandChannel for MockChannel {
    fn try_receive_line(&mut self) -> Option<CommandLine> {
        let line = self.inbox.pop_front()?;
        Some(CommandLine::bounded(&line))
    }

    fn send(&mut self, line: &str) {
        self.sent.push(line.to_owned());
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started service with its mocks and a virtual clock.
///
/// Sensor refreshes happen on whole intervals; commands are delivered on
/// ticks 1 ms apart in between, so they never trigger a refresh.
pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub channel: MockChannel,
    pub sink: RecordingSink,
    pub now_ms: u64,
    next_refresh_ms: u64,
    interval_ms: u64,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        let interval_ms = u64::from(config.sensor_read_interval_ms);
        let mut app = AppService::new(config);
        let mut sink = RecordingSink::default();
        app.start(0, &mut sink);
        Self {
            app,
            hw: MockHardware::new(),
            channel: MockChannel::default(),
            sink,
            now_ms: 0,
            next_refresh_ms: 0,
            interval_ms,
        }
    }

    /// Deliver one temperature on the next refresh.
    pub fn reading(&mut self, celsius: f32) {
        self.hw.queue(Ok(celsius));
        self.refresh();
    }

    pub fn readings(&mut self, temps: &[f32]) {
        for &t in temps {
            self.reading(t);
        }
    }

    /// Deliver a failed acquisition on the next refresh.
    pub fn failed_reading(&mut self) {
        self.hw.queue(Err(SensorError::ReadFailed));
        self.refresh();
    }

    /// Run the tick on which the next refresh is due.
    pub fn refresh(&mut self) {
        self.now_ms = self.next_refresh_ms;
        self.next_refresh_ms += self.interval_ms;
        self.tick();
    }

    /// Send one command and return the response lines it produced.
    pub fn command(&mut self, line: &str) -> Vec<String> {
        let before = self.channel.sent.len();
        self.channel.inbox.push_back(line.to_owned());
        self.now_ms += 1;
        self.tick();
        self.channel.sent[before..].to_vec()
    }

    pub fn tick_at(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        // A late refresh rebases the schedule on the late tick.
        if self.next_refresh_ms <= now_ms {
            self.next_refresh_ms = now_ms + self.interval_ms;
        }
        self.tick();
    }

    fn tick(&mut self) {
        self.app
            .tick(self.now_ms, &mut self.hw, &mut self.channel, &mut self.sink);
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}
