//! Application service, the hexagonal core.
//!
//! [`AppService`] owns every piece of monitor state: sensor gateway, risk
//! FSM and its context, indicator engine, suppression controller, command
//! gateway and scheduler.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService          │
//! ActuatorPort ◀──│ Sensors · FSM · Indicators   │
//!                 │ Suppression · Commands       │
//! CommandChannel ◀▶└──────────────────────────────┘
//! ```
//!
//! ## Tick pipeline
//!
//! 1. Scheduler decides which periodic tasks are due.
//! 2. Sensor refresh (when due): validate, evaluate risk, presence alert,
//!    suppression gate.
//! 3. Indicator frame rendered for the current level.
//! 4. Suppression sequence advanced and overlaid on the frame.
//! 5. Frame written to the actuators (changed outputs only).
//! 6. Pending commands drained, at most `max_commands_per_tick`.
//! 7. Telemetry emitted (when due).

use core::fmt::{self, Write as _};

use log::{info, warn};

use crate::config::MonitorConfig;
use crate::diagnostics::{ReportKind, Statistics, StatusReport};
use crate::drivers::indicators::{IndicatorEngine, OutputFrame};
use crate::fsm::context::{FsmContext, SensorSnapshot};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, RiskLevel};
use crate::safety::{ActivationInputs, SuppressionController, SuppressionEvent};
use crate::scheduler::{Schedule, Scheduler, Task};
use crate::sensors::temperature::TemperatureReading;
use crate::sensors::{OperatingMode, SensorGateway, SensorHealth, Verdict};

use super::commands::{Command, KEYWORDS, Scenario};
use super::events::AppEvent;
use super::gateway::{CommandGate, CommandGateway, CommandOutcome};
use super::ports::{ActuatorPort, CommandChannel, CommandLine, EventSink, Output, SensorPort};

/// One response line on the command channel.
type Reply = heapless::String<128>;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: MonitorConfig,
    sensors: SensorGateway,
    fsm: Fsm,
    ctx: FsmContext,
    indicators: IndicatorEngine,
    suppression: SuppressionController,
    commands: CommandGateway,
    scheduler: Scheduler,
    /// Last frame written to the actuators; `None` forces a full write.
    last_frame: Option<OutputFrame>,
    last_reading: Option<TemperatureReading>,
    started_ms: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    /// The configuration is expected to have passed
    /// [`MonitorConfig::validate`].
    pub fn new(config: MonitorConfig) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.add(Schedule {
            label: "sensor refresh",
            task: Task::SensorRefresh,
            interval_ms: config.sensor_read_interval_ms,
            fire_immediately: true,
        });
        scheduler.add(Schedule {
            label: "telemetry",
            task: Task::Telemetry,
            interval_ms: config.telemetry_interval_ms,
            fire_immediately: false,
        });

        Self {
            sensors: SensorGateway::new(&config),
            fsm: Fsm::new(build_state_table(), RiskLevel::Normal),
            ctx: FsmContext::new(&config),
            indicators: IndicatorEngine::new(&config),
            suppression: SuppressionController::new(&config),
            commands: CommandGateway::new(&config),
            scheduler,
            last_frame: None,
            last_reading: None,
            started_ms: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Normal.  `now_ms` is the uptime origin.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.started_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_level()));
        info!(
            "AppService started: warning {:.1}\u{00b0}C, danger {:.1}\u{00b0}C",
            self.config.warning_threshold_c, self.config.danger_threshold_c
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one polling cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        channel: &mut impl CommandChannel,
        sink: &mut impl EventSink,
    ) {
        let due = self.scheduler.poll(now_ms);

        // 1. Sensors → risk → suppression gate
        if due.contains(&Task::SensorRefresh) {
            self.refresh(now_ms, hw, sink);
        }

        // 2. Indicators + suppression overlay
        let mut frame = self.indicators.render(self.fsm.current_level(), now_ms);
        match self.suppression.advance(now_ms) {
            Some(SuppressionEvent::FlashComplete) => sink.emit(&AppEvent::SuppressionHolding),
            Some(SuppressionEvent::Released) => sink.emit(&AppEvent::SuppressionReleased),
            None => {}
        }
        self.suppression.overlay(&mut frame, now_ms);
        self.write_frame(hw, frame);

        // 3. Operator commands
        for _ in 0..self.config.max_commands_per_tick {
            let Some(line) = channel.try_receive_line() else {
                break;
            };
            self.handle_line(&line, now_ms, hw, channel, sink);
        }

        // 4. Telemetry
        if due.contains(&Task::Telemetry) {
            sink.emit(&AppEvent::Telemetry(self.report(ReportKind::Telemetry, now_ms)));
        }
    }

    /// Submit one command line, as if it had arrived on `channel`.
    pub fn handle_line(
        &mut self,
        line: &CommandLine,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        channel: &mut impl CommandChannel,
        sink: &mut impl EventSink,
    ) {
        let gate = CommandGate {
            total_readings: self.ctx.stats.total_readings,
            integrity_ok: self.sensors.health().integrity_ok,
        };

        match self.commands.submit_line(line, &gate) {
            CommandOutcome::Accepted(command) => {
                sink.emit(&AppEvent::CommandAccepted(command));
                self.apply(command, now_ms, hw, channel, sink);
            }
            CommandOutcome::PreconditionNotMet { command, error } => {
                reply(channel, format_args!("DENIED {}: {error}", command.keyword()));
                sink.emit(&AppEvent::PreconditionNotMet { command, error });
            }
            CommandOutcome::Rejected {
                error,
                invalid_count,
            } => {
                self.ctx.stats.record_invalid_command();
                reply(
                    channel,
                    format_args!(
                        "ERR {error} ({invalid_count}/{})",
                        self.config.invalid_alert_threshold
                    ),
                );
                sink.emit(&AppEvent::CommandRejected {
                    error,
                    invalid_count,
                });
            }
            CommandOutcome::SecurityAlert { error, attempts } => {
                self.ctx.stats.record_invalid_command();
                self.ctx.stats.record_security_alert();
                reply(channel, format_args!("ERR {error}"));
                reply(
                    channel,
                    format_args!("ALERT security: {attempts} invalid commands"),
                );
                sink.emit(&AppEvent::SecurityAlert { attempts });
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Point-in-time snapshot of the whole monitor.
    pub fn report(&self, kind: ReportKind, now_ms: u64) -> StatusReport {
        let health = self.sensors.health();
        StatusReport {
            kind,
            uptime_ms: now_ms.saturating_sub(self.started_ms),
            level: self.fsm.current_level(),
            mode: self.sensors.mode(),
            temperature_c: self.ctx.sensors.temperature_c,
            motion: self.ctx.sensors.motion,
            integrity_ok: health.integrity_ok,
            consecutive_errors: health.consecutive_errors,
            pending_invalid_commands: self.commands.invalid_count(),
            suppression_latched: self.suppression.is_latched(),
            suppression_active: self.suppression.is_active(),
            stats: self.ctx.stats,
        }
    }

    pub fn level(&self) -> RiskLevel {
        self.fsm.current_level()
    }

    pub fn mode(&self) -> OperatingMode {
        self.sensors.mode()
    }

    pub fn stats(&self) -> Statistics {
        self.ctx.stats
    }

    pub fn sensor_health(&self) -> SensorHealth {
        self.sensors.health()
    }

    /// Effective temperature of the latest refresh.
    pub fn temperature_c(&self) -> f32 {
        self.ctx.sensors.temperature_c
    }

    pub fn last_reading(&self) -> Option<TemperatureReading> {
        self.last_reading
    }

    pub fn invalid_command_count(&self) -> u32 {
        self.commands.invalid_count()
    }

    pub fn demo_temperature_c(&self) -> f32 {
        self.sensors.demo_temperature_c()
    }

    pub fn demo_motion(&self) -> bool {
        self.sensors.demo_motion()
    }

    pub fn suppression_latched(&self) -> bool {
        self.suppression.is_latched()
    }

    pub fn suppression_active(&self) -> bool {
        self.suppression.is_active()
    }

    /// Frame most recently written to the actuators.
    pub fn output_frame(&self) -> Option<OutputFrame> {
        self.last_frame
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn refresh(&mut self, now_ms: u64, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let sample = self.sensors.refresh(hw, now_ms);
        self.ctx.stats.record_reading();

        match sample.verdict {
            Verdict::Accepted { integrity_restored } => {
                if integrity_restored {
                    sink.emit(&AppEvent::IntegrityRestored);
                }
            }
            Verdict::Injected => {}
            Verdict::Rejected {
                error,
                consecutive_errors,
                integrity_lost,
            } => {
                self.ctx.stats.record_sensor_error();
                sink.emit(&AppEvent::ReadingRejected {
                    error,
                    raw_c: sample.reading.raw_c,
                    substituted_c: sample.reading.celsius,
                    consecutive_errors,
                });
                if integrity_lost {
                    self.ctx.stats.record_security_alert();
                    warn!("SECURITY: sensor integrity lost after {consecutive_errors} errors");
                    sink.emit(&AppEvent::IntegrityLost { consecutive_errors });
                }
            }
        }

        let integrity_ok = self.sensors.health().integrity_ok;
        self.ctx.sensors = SensorSnapshot {
            temperature_c: sample.reading.celsius,
            motion: sample.motion,
            integrity_ok,
        };
        self.last_reading = Some(sample.reading);

        let assessment = self.fsm.evaluate(&mut self.ctx);
        if assessment.transitioned {
            sink.emit(&AppEvent::RiskChanged {
                from: assessment.previous,
                to: assessment.level,
                temperature_c: sample.reading.celsius,
            });
        }
        if assessment.entered_normal() {
            self.suppression.clear_latch();
        }

        if assessment.level >= RiskLevel::Warning && sample.motion {
            warn!("PRESENCE: motion detected at {:?} risk", assessment.level);
            sink.emit(&AppEvent::PresenceAlert {
                level: assessment.level,
            });
        }

        let inputs = ActivationInputs {
            total_readings: self.ctx.stats.total_readings,
            integrity_ok,
        };
        if self
            .suppression
            .maybe_activate(assessment.level, &sample.reading, &inputs, now_ms)
        {
            self.ctx.stats.suppression_activations =
                self.ctx.stats.suppression_activations.saturating_add(1);
            sink.emit(&AppEvent::SuppressionActivated {
                activation: self.suppression.activations(),
                temperature_c: sample.reading.celsius,
            });
        }
    }

    fn apply(
        &mut self,
        command: Command,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        channel: &mut impl CommandChannel,
        sink: &mut impl EventSink,
    ) {
        match command {
            Command::Help => {
                channel.send("COMMANDS:");
                for (keyword, _, description) in KEYWORDS {
                    reply(channel, format_args!("  {keyword:<13} {description}"));
                }
            }
            Command::Status | Command::Stats | Command::Security => {
                let kind = match command {
                    Command::Stats => ReportKind::Stats,
                    Command::Security => ReportKind::Security,
                    _ => ReportKind::Status,
                };
                let report = self.report(kind, now_ms);
                channel.send(&report.to_json());
                sink.emit(&AppEvent::Report(report));
            }
            Command::Test(scenario) => {
                let celsius = match scenario {
                    Scenario::Normal => self.config.demo_normal_c,
                    Scenario::Warning => self.config.demo_warning_c,
                    Scenario::Danger => self.config.demo_danger_c,
                };
                let previous = self.sensors.mode();
                self.sensors.inject_temperature(celsius);
                reply(
                    channel,
                    format_args!("OK {}: demo {celsius:.1}C", command.keyword()),
                );
                if previous != OperatingMode::Demo {
                    sink.emit(&AppEvent::ModeChanged(OperatingMode::Demo));
                }
            }
            Command::Motion => {
                let on = self.sensors.toggle_demo_motion();
                reply(
                    channel,
                    format_args!("OK MOTION: {}", if on { "on" } else { "off" }),
                );
            }
            Command::Auto | Command::Demo => {
                let mode = if command == Command::Auto {
                    OperatingMode::Auto
                } else {
                    OperatingMode::Demo
                };
                let changed = self.sensors.mode() != mode;
                self.sensors.set_mode(mode);
                reply(channel, format_args!("OK {}", command.keyword()));
                if changed {
                    sink.emit(&AppEvent::ModeChanged(mode));
                }
            }
            Command::Reset => {
                self.reset(hw, sink);
                channel.send("OK RESET");
            }
        }
    }

    /// Operator RESET.  `Statistics` are deliberately left alone: they are
    /// lifetime counters, and STATS after a RESET still reports them.
    fn reset(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let previous = self.fsm.current_level();
        self.fsm.force_transition(RiskLevel::Normal, &mut self.ctx);
        if previous != RiskLevel::Normal {
            sink.emit(&AppEvent::RiskChanged {
                from: previous,
                to: RiskLevel::Normal,
                temperature_c: self.ctx.sensors.temperature_c,
            });
        }

        self.sensors.reset();
        self.ctx.sensors.integrity_ok = true;
        self.ctx.sensors.motion = false;
        self.commands.reset();
        self.suppression.abort();
        self.indicators.reset();

        self.last_frame = None;
        self.write_frame(hw, OutputFrame::idle());

        warn!("RESET: risk Normal, mode Auto, counters cleared");
        sink.emit(&AppEvent::SystemReset);
    }

    /// Drive only the outputs that changed since the last write.
    fn write_frame(&mut self, hw: &mut impl ActuatorPort, frame: OutputFrame) {
        for output in Output::ALL {
            let on = frame.get(output);
            if self.last_frame.is_none_or(|last| last.get(output) != on) {
                hw.set_output(output, on);
            }
        }
        self.last_frame = Some(frame);
    }
}

/// Format one response line into a bounded buffer and send it.
/// Lines longer than the buffer are cut short.
fn reply(channel: &mut impl CommandChannel, args: fmt::Arguments<'_>) {
    let mut line = Reply::new();
    let _ = line.write_fmt(args);
    channel.send(&line);
}
