//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  Whatever logger the binary installs decides where
//! they end up.  Alerts go out at `warn`/`error` so they survive a quiet
//! log filter.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::diagnostics::StatusReport;
use crate::fsm::RiskLevel;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(level) => {
                info!("START | level={level:?}");
            }
            AppEvent::RiskChanged {
                from,
                to,
                temperature_c,
            } => {
                if *to > *from && *to == RiskLevel::Danger {
                    error!("RISK  | {from:?} -> {to:?} at {temperature_c:.1}\u{00b0}C");
                } else {
                    warn!("RISK  | {from:?} -> {to:?} at {temperature_c:.1}\u{00b0}C");
                }
            }
            AppEvent::PresenceAlert { level } => {
                warn!("ALERT | human presence detected at {level:?} risk");
            }
            AppEvent::ReadingRejected {
                error,
                raw_c,
                substituted_c,
                consecutive_errors,
            } => {
                warn!(
                    "SENSE | rejected {error} raw={raw_c:?} using {substituted_c:.1}\u{00b0}C \
                     (consecutive={consecutive_errors})"
                );
            }
            AppEvent::IntegrityLost { consecutive_errors } => {
                error!("ALERT | sensor integrity lost after {consecutive_errors} errors");
            }
            AppEvent::IntegrityRestored => {
                info!("SENSE | integrity restored");
            }
            AppEvent::SuppressionActivated {
                activation,
                temperature_c,
            } => {
                error!(
                    "SUPPR | relay activated at {temperature_c:.1}\u{00b0}C (activation #{activation})"
                );
            }
            AppEvent::SuppressionHolding => {
                info!("SUPPR | flashes done, relay holding");
            }
            AppEvent::SuppressionReleased => {
                info!("SUPPR | relay released");
            }
            AppEvent::CommandAccepted(command) => {
                info!("CMD   | {}", command.keyword());
            }
            AppEvent::CommandRejected {
                error,
                invalid_count,
            } => {
                warn!("CMD   | rejected: {error} (invalid={invalid_count})");
            }
            AppEvent::PreconditionNotMet { command, error } => {
                warn!("CMD   | {} denied: {error}", command.keyword());
            }
            AppEvent::SecurityAlert { attempts } => {
                error!("ALERT | {attempts} invalid commands");
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {mode:?}");
            }
            AppEvent::SystemReset => {
                warn!("RESET | system reset by operator");
            }
            AppEvent::Report(report) => {
                info!("REPORT| {:?} {}", report.kind, summary(report));
            }
            AppEvent::Telemetry(report) => {
                info!("TELEM | {}", summary(report));
            }
        }
    }
}

fn summary(r: &StatusReport) -> String {
    format!(
        "level={:?} mode={:?} T={:.1}\u{00b0}C motion={} integrity={} errors={} \
         suppression={} readings={} uptime={}s",
        r.level,
        r.mode,
        r.temperature_c,
        r.motion,
        if r.integrity_ok { "OK" } else { "LOST" },
        r.consecutive_errors,
        if r.suppression_active {
            "ACTIVE"
        } else if r.suppression_latched {
            "LATCHED"
        } else {
            "ARMED"
        },
        r.stats.total_readings,
        r.uptime_ms / 1000,
    )
}
