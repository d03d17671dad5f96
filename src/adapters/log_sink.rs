//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART / USB-CDC in production).  A maintenance-console adapter
//! would implement the same trait.

use log::{info, warn};

use crate::app::events::OvenEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`OvenEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &OvenEvent) {
        match event {
            OvenEvent::Started { lid_open } => {
                info!(
                    "START | lid={}",
                    if *lid_open { "open" } else { "closed" }
                );
            }
            OvenEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            OvenEvent::RunStarted {
                kind,
                duration_ms,
                intensity,
            } => {
                info!(
                    "RUN   | {:?} started: {} ms @ {}%",
                    kind, duration_ms, intensity
                );
            }
            OvenEvent::StepStarted {
                loop_index,
                step_index,
                duration_ms,
                intensity,
            } => {
                info!(
                    "STEP  | loop {} step {}: {} ms @ {}%",
                    loop_index,
                    step_index + 1,
                    duration_ms,
                    intensity
                );
            }
            OvenEvent::RunFinished { kind } => {
                info!("RUN   | {:?} finished", kind);
            }
            OvenEvent::RunCanceled { reason } => {
                warn!("RUN   | cancelled ({:?})", reason);
            }
            OvenEvent::ProgramLoaded { name } => {
                info!("PGM   | loaded '{}'", name);
            }
            OvenEvent::ProgramSaved { name, count } => {
                info!("PGM   | saved '{}' ({} in library)", name, count);
            }
            OvenEvent::SaveFailed { error } => {
                warn!("PGM   | save failed: {}", error);
            }
        }
    }
}
