//! Shared mutable context threaded through every mode handler.
//!
//! `OvenContext` is the single struct that state handlers read from and
//! write to: this tick's operator input, the panel/actuator command outputs,
//! the program library and current-program slot, timing, and configuration.
//! Think of it as the "blackboard" in a blackboard architecture — all shared
//! state lives here, never in module globals.

use crate::app::events::OvenEvent;
use crate::config::OvenConfig;
use crate::indicator::Rgb;
use crate::input::InputFrame;
use crate::program::{Program, ProgramStore};
use crate::screen::Line;

// ---------------------------------------------------------------------------
// Panel commands (written by mode handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Buzzer gestures the modes can request.  The buzzer driver schedules the
/// actual on/off timing; nothing here blocks the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeepPattern {
    /// Accepted input (60 ms chirp).
    Confirm,
    /// Refused input, e.g. lid open (100 ms).
    Warn,
    /// Exposure starting (120 ms).
    RunStart,
    /// Lid preemption alarm (two 200 ms beeps).
    Double,
    /// Run complete (three 120 ms beeps).
    Triple,
}

/// Commands that mode handlers write to request panel/actuator actions.
/// The service applies these to the drivers once per tick.
#[derive(Debug, Clone, Default)]
pub struct PanelCommands {
    pub line1: Line,
    pub line2: Line,
    /// Indicator chain colours — overwritten by the indicator policy.
    pub pixels: [Rgb; 3],
    /// UV duty in percent; 0 means output off.
    pub uv_duty: u8,
    /// At most one beep request per tick.
    pub beep: Option<BeepPattern>,
}

// ---------------------------------------------------------------------------
// Transient notices
// ---------------------------------------------------------------------------

/// A display override with an expiry: "Program Saved!", "!! LID OPENED !!".
///
/// While a notice is live the panel shows it and menu input is muted, but
/// the tick loop — including the lid monitor — keeps running.  This replaces
/// the blocking display dwells a naive super-loop would use.
#[derive(Debug, Clone)]
pub struct Notice {
    pub line1: Line,
    pub line2: Line,
    until_ms: u64,
}

// ---------------------------------------------------------------------------
// OvenContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler.
pub struct OvenContext {
    // -- Configuration --
    pub config: OvenConfig,

    // -- This tick's inputs (written by the service before dispatch) --
    pub input: InputFrame,
    /// Latched lid state from the monitor.
    pub lid_open: bool,
    /// Monotonic time for this tick.
    pub now_ms: u64,

    // -- Program state --
    /// The library loaded at boot, mutated by saves.
    pub store: ProgramStore,
    /// Working slot: the program being authored or staged to run.  Always a
    /// value copy — mutating it never touches the store until a save.
    pub current: Option<Program>,
    /// Set when a save was committed this tick; the service persists and
    /// clears it.
    pub save_requested: bool,

    // -- Outputs --
    pub commands: PanelCommands,
    notice: Option<Notice>,

    // -- Structured events, drained by the service each tick --
    pub events: Vec<OvenEvent>,
}

impl OvenContext {
    pub fn new(config: OvenConfig, store: ProgramStore) -> Self {
        Self {
            config,
            input: InputFrame::default(),
            lid_open: false,
            now_ms: 0,
            store,
            current: None,
            save_requested: false,
            commands: PanelCommands::default(),
            notice: None,
            events: Vec::new(),
        }
    }

    // ── Screen ────────────────────────────────────────────────

    pub fn screen(&mut self, line1: Line, line2: Line) {
        self.commands.line1 = line1;
        self.commands.line2 = line2;
    }

    // ── Actuators ─────────────────────────────────────────────

    /// Command UV output at `intensity` percent.
    pub fn uv_on(&mut self, intensity: u8) {
        self.commands.uv_duty = intensity.min(100);
    }

    pub fn uv_off(&mut self) {
        self.commands.uv_duty = 0;
    }

    pub fn beep(&mut self, pattern: BeepPattern) {
        self.commands.beep = Some(pattern);
    }

    // ── Notices ───────────────────────────────────────────────

    /// Show `line1`/`line2` for `dwell_ms`, muting menu input meanwhile.
    pub fn notify(&mut self, line1: Line, line2: Line, dwell_ms: u64) {
        self.notice = Some(Notice {
            line1,
            line2,
            until_ms: self.now_ms.saturating_add(dwell_ms),
        });
    }

    /// The live notice, if any — expired notices are cleared on query.
    pub fn active_notice(&mut self) -> Option<&Notice> {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|n| self.now_ms >= n.until_ms);
        if expired {
            self.notice = None;
        }
        self.notice.as_ref()
    }

    // ── Events ────────────────────────────────────────────────

    pub fn emit(&mut self, event: OvenEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line;
    use crate::program::ProgramStore;

    fn ctx() -> OvenContext {
        OvenContext::new(OvenConfig::default(), ProgramStore::default())
    }

    #[test]
    fn uv_duty_is_capped_at_100() {
        let mut c = ctx();
        c.uv_on(250);
        assert_eq!(c.commands.uv_duty, 100);
        c.uv_off();
        assert_eq!(c.commands.uv_duty, 0);
    }

    #[test]
    fn notice_expires_by_timestamp() {
        let mut c = ctx();
        c.now_ms = 1000;
        c.notify(line!("Program Saved!"), line!(""), 1000);
        assert!(c.active_notice().is_some());
        c.now_ms = 1999;
        assert!(c.active_notice().is_some());
        c.now_ms = 2000;
        assert!(c.active_notice().is_none());
        assert!(c.active_notice().is_none(), "stays cleared");
    }
}
