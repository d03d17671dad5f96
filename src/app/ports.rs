//! Port traits — the hexagonal boundary between control logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ OvenService (domain)
//! ```
//!
//! Driven adapters (panel, controls, storage, event sinks) implement these
//! traits.  The [`OvenService`](super::service::OvenService) consumes them
//! via generics, so the domain core never touches hardware directly — the
//! whole control core runs against mocks on a workstation.

use crate::error::PersistenceError;
use crate::indicator::Rgb;
use crate::modes::context::BeepPattern;
use crate::program::Program;

// ───────────────────────────────────────────────────────────────
// Controls port (driven adapter: operator hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: rotary encoder, push-button, and the lid switch.
pub trait ControlsPort {
    /// Absolute encoder position.  Only deltas are meaningful; wraparound is
    /// the input aggregator's problem.
    fn read_rotation(&mut self) -> i32;

    /// Instantaneous button level (true = held down).
    fn is_pressed(&mut self) -> bool;

    /// Lid safety switch (true = open).
    fn lid_is_open(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Panel port (driven adapter: domain → operator hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: display, indicator pixels, UV output, buzzer.
pub trait PanelPort {
    /// Show two lines of text (each at most 21 characters; longer input is
    /// clipped by the caller).
    fn display(&mut self, line1: &str, line2: &str);

    /// Set the 3-pixel indicator chain.
    fn set_indicator(&mut self, pixels: [Rgb; 3]);

    /// Drive the UV output at `duty` (0.0 – 1.0).
    fn set_uv_duty(&mut self, duty: f32);

    /// Kill the UV output.
    fn uv_off(&mut self);

    /// Sound a beep gesture.  Must not block the caller.
    fn beep(&mut self, pattern: BeepPattern);
}

// ───────────────────────────────────────────────────────────────
// Program storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent storage for the program library.
pub trait ProgramStorePort {
    /// Load every saved program, in stored order.  Fails soft: a missing or
    /// corrupt blob yields an empty library, never an error — the operator
    /// simply has no saved programs.
    fn load_programs(&self) -> Vec<Program>;

    /// Rewrite the whole library.  Failure is reported but non-fatal; the
    /// caller keeps its in-memory copy.
    fn save_programs(&mut self, programs: &[Program]) -> Result<(), PersistenceError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`OvenEvent`](super::events::OvenEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::OvenEvent);
}
