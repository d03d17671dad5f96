//! Outbound application events.
//!
//! The [`OvenService`](super::service::OvenService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, mirror to a maintenance
//! console, etc.

use crate::error::PersistenceError;
use crate::modes::ModeKind;
use crate::program::ProgramName;

/// Which runner produced a run-lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Simple,
    Custom,
}

/// Why a run ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The lid interlock preempted the run.
    LidOpened,
    /// The operator held the button.
    Operator,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum OvenEvent {
    /// The service has started (carries the boot lid state).
    Started { lid_open: bool },

    /// The top-level mode changed.
    ModeChanged { from: ModeKind, to: ModeKind },

    /// An exposure began.  For custom runs `duration_ms` is the whole
    /// program (all loops); per-step windows arrive as `StepStarted`.
    RunStarted {
        kind: RunKind,
        duration_ms: u64,
        intensity: u8,
    },

    /// A custom-run step began.
    StepStarted {
        loop_index: u8,
        step_index: usize,
        duration_ms: u64,
        intensity: u8,
    },

    /// A run ran to completion.
    RunFinished { kind: RunKind },

    /// A run was cancelled before completion.
    RunCanceled { reason: CancelReason },

    /// A stored program was copied into the working slot.
    ProgramLoaded { name: ProgramName },

    /// The library gained or replaced a program (`count` = new length).
    ProgramSaved { name: ProgramName, count: usize },

    /// Persisting the library failed; the in-memory copy is retained.
    SaveFailed { error: PersistenceError },
}
