//! Static system configuration: time units, operator limits, loop timing.
//!
//! Everything here is compile-time data — the oven has no runtime-parsed
//! configuration.  Tunables live in [`OvenConfig::default()`] so tests can
//! construct variants with struct-update syntax.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time units
// ---------------------------------------------------------------------------

/// Selectable exposure-time unit.
///
/// Each unit carries its own native scale, adjustment range, and encoder
/// step.  Values are converted to absolute milliseconds before any timing
/// decision — the native value is only ever an operator-facing quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimeUnit {
    /// Value in seconds, displayed as `MM:SS`.
    MinSec = 0,
    /// Value in minutes, displayed as `HH:MM`.
    HrMin = 1,
    /// Value in milliseconds, displayed as `SS:MMMms`.
    SecMs = 2,
}

impl TimeUnit {
    /// All units in selector order.
    pub const ALL: [TimeUnit; 3] = [TimeUnit::MinSec, TimeUnit::HrMin, TimeUnit::SecMs];

    /// Operator-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::MinSec => "min:sec",
            Self::HrMin => "hr:min",
            Self::SecMs => "sec:ms",
        }
    }

    /// Value pre-loaded when the unit is selected.
    pub fn default_value(self) -> u32 {
        match self {
            Self::MinSec => 60,
            Self::HrMin => 30,
            Self::SecMs => 1000,
        }
    }

    /// Smallest settable value in the unit's native scale.
    pub fn min(self) -> u32 {
        match self {
            Self::MinSec | Self::HrMin => 1,
            Self::SecMs => 100,
        }
    }

    /// Largest settable value in the unit's native scale.
    pub fn max(self) -> u32 {
        match self {
            Self::MinSec => 3600,
            Self::HrMin => 1440,
            Self::SecMs => 60_000,
        }
    }

    /// Encoder step per detent.
    pub fn step(self) -> u32 {
        match self {
            Self::MinSec | Self::HrMin => 1,
            Self::SecMs => 100,
        }
    }

    /// Next unit in selector order, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::MinSec => Self::HrMin,
            Self::HrMin => Self::SecMs,
            Self::SecMs => Self::MinSec,
        }
    }

    /// Previous unit in selector order, wrapping.
    pub fn prev(self) -> Self {
        match self {
            Self::MinSec => Self::SecMs,
            Self::HrMin => Self::MinSec,
            Self::SecMs => Self::HrMin,
        }
    }

    /// Clamp a (possibly out-of-range) native value into `[min, max]`.
    pub fn clamp(self, value: i64) -> u32 {
        value.clamp(i64::from(self.min()), i64::from(self.max())) as u32
    }

    /// Exact conversion from native value to absolute milliseconds.
    pub fn to_millis(self, value: u32) -> u64 {
        match self {
            Self::MinSec => u64::from(value) * 1_000,
            Self::HrMin => u64::from(value) * 60_000,
            Self::SecMs => u64::from(value),
        }
    }

    /// Conversion to seconds — display and reporting only.
    pub fn to_secs(self, value: u32) -> f32 {
        self.to_millis(value) as f32 / 1000.0
    }

    /// Inverse of [`to_secs`](Self::to_secs): absolute seconds back to the
    /// unit's native scale.  Rounds, so the float detour through `to_secs`
    /// is lossless across each unit's whole range.
    pub fn from_secs(self, secs: f32) -> u32 {
        match self {
            Self::MinSec => secs.round() as u32,
            Self::HrMin => (secs / 60.0).round() as u32,
            Self::SecMs => (secs * 1000.0).round() as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

/// Core system configuration (all compile-time constants in production).
#[derive(Debug, Clone)]
pub struct OvenConfig {
    // --- Intensity ---
    /// Lowest settable UV intensity (%).
    pub intensity_min: u8,
    /// Highest settable UV intensity (%).
    pub intensity_max: u8,
    /// Intensity change per encoder detent (%).
    pub intensity_step: u8,
    /// Intensity pre-loaded when a set-intensity screen opens (%).
    pub intensity_default: u8,

    // --- Programs ---
    /// Minimum program loop count.
    pub loops_min: u8,
    /// Maximum program loop count.
    pub loops_max: u8,

    // --- Input ---
    /// Press shorter than this is treated as contact bounce (ms).
    pub debounce_ms: u64,
    /// Hold at least this long to classify as a long press (ms).
    pub long_press_ms: u64,

    // --- Timing ---
    /// Poll loop period (ms).
    pub tick_interval_ms: u64,
    /// Indicator blink half-period (ms).
    pub blink_interval_ms: u64,
    /// Dwell for informational notices, e.g. "Program Saved!" (ms).
    pub notice_dwell_ms: u64,
    /// Dwell for the lid-preemption "RUN CANCELED" notice (ms).
    pub cancel_dwell_ms: u64,
}

impl Default for OvenConfig {
    fn default() -> Self {
        Self {
            // Intensity
            intensity_min: 0,
            intensity_max: 100,
            intensity_step: 1,
            intensity_default: 50,

            // Programs
            loops_min: 1,
            loops_max: 99,

            // Input
            debounce_ms: 50,
            long_press_ms: 600,

            // Timing
            tick_interval_ms: 30,
            blink_interval_ms: 500,
            notice_dwell_ms: 1000,
            cancel_dwell_ms: 1500,
        }
    }
}
