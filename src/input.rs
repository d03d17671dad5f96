//! Operator input aggregation: encoder deltas and press classification.
//!
//! Each tick the aggregator is handed the raw encoder position and button
//! level and produces an [`InputFrame`].
//!
//! ## Rotation
//!
//! `delta = position - last_position`, with `last_position` updated only on
//! a non-zero delta so repeated identical reads cannot accumulate drift.
//!
//! ## Press classification
//!
//! | Gesture     | Condition                                   | Event        |
//! |-------------|---------------------------------------------|--------------|
//! | Short press | Released after ≥ debounce, before long hold | `ShortPress` |
//! | Long press  | Held ≥ 600 ms                               | `LongPress`  |
//!
//! Classification is a non-blocking phase machine: the press timestamp is
//! recorded on the leading edge and the gesture resolves either at release
//! (short) or the moment the hold threshold passes (long).  The tick loop —
//! and with it the lid monitor — keeps running for the whole hold.  A press
//! released inside the debounce window is discarded as contact bounce.

use crate::config::OvenConfig;

/// Classified button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressEvent {
    ShortPress,
    LongPress,
}

/// One tick's worth of operator input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    /// Signed encoder detents since the last tick.
    pub delta: i32,
    /// At most one classified gesture per tick.
    pub press: Option<PressEvent>,
}

impl InputFrame {
    /// Rotation direction collapsed to ±1 (0 when no rotation).
    pub fn direction(&self) -> i32 {
        self.delta.signum()
    }

    pub fn short_press(&self) -> bool {
        self.press == Some(PressEvent::ShortPress)
    }

    pub fn long_press(&self) -> bool {
        self.press == Some(PressEvent::LongPress)
    }
}

/// Internal press-classifier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressPhase {
    Released,
    Pressed { since_ms: u64 },
    /// Long press already emitted; swallow the level until release.
    WaitRelease,
}

/// Converts raw encoder position + button level into per-tick input frames.
pub struct InputAggregator {
    last_position: i32,
    phase: PressPhase,
    debounce_ms: u64,
    long_press_ms: u64,
}

impl InputAggregator {
    pub fn new(config: &OvenConfig, initial_position: i32) -> Self {
        Self {
            last_position: initial_position,
            phase: PressPhase::Released,
            debounce_ms: config.debounce_ms,
            long_press_ms: config.long_press_ms,
        }
    }

    /// Sample one tick.  `position` is the encoder's absolute count,
    /// `pressed` the instantaneous button level, `now_ms` monotonic time.
    pub fn poll(&mut self, position: i32, pressed: bool, now_ms: u64) -> InputFrame {
        let delta = position.wrapping_sub(self.last_position);
        if delta != 0 {
            self.last_position = position;
        }

        let press = self.classify(pressed, now_ms);
        InputFrame { delta, press }
    }

    fn classify(&mut self, pressed: bool, now_ms: u64) -> Option<PressEvent> {
        match self.phase {
            PressPhase::Released => {
                if pressed {
                    self.phase = PressPhase::Pressed { since_ms: now_ms };
                }
                None
            }
            PressPhase::Pressed { since_ms } => {
                let held_ms = now_ms.saturating_sub(since_ms);
                if pressed {
                    if held_ms >= self.long_press_ms {
                        self.phase = PressPhase::WaitRelease;
                        return Some(PressEvent::LongPress);
                    }
                    None
                } else {
                    self.phase = PressPhase::Released;
                    // Releases inside the debounce window are contact bounce.
                    (held_ms >= self.debounce_ms).then_some(PressEvent::ShortPress)
                }
            }
            PressPhase::WaitRelease => {
                if !pressed {
                    self.phase = PressPhase::Released;
                }
                None
            }
        }
    }
}
