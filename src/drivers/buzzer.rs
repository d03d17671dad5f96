//! Piezo buzzer driver with non-blocking pattern scheduling.
//!
//! A beep gesture is expanded into on/off windows relative to the trigger
//! time; `tick()` (called once per poll-loop iteration) compares the clock
//! against the schedule and flips the GPIO on window edges.  Nothing here
//! sleeps — the triple "run done" beep plays out across ~20 ticks.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the buzzer GPIO via hw_init.
//! On host/test: tracks the output level and last pattern in memory.

use heapless::Vec;

use crate::drivers::hw_init;
use crate::modes::context::BeepPattern;
use crate::pins;

/// One on-window relative to the trigger timestamp.
#[derive(Debug, Clone, Copy)]
struct Window {
    start_ms: u64,
    end_ms: u64,
}

/// Expand a gesture into its on-windows.
fn windows(pattern: BeepPattern) -> Vec<Window, 3> {
    let mut w: Vec<Window, 3> = Vec::new();
    let mut push = |start_ms: u64, end_ms: u64| {
        let _ = w.push(Window { start_ms, end_ms });
    };
    match pattern {
        BeepPattern::Confirm => push(0, 60),
        BeepPattern::Warn => push(0, 100),
        BeepPattern::RunStart => push(0, 120),
        BeepPattern::Double => {
            push(0, 200);
            push(300, 500);
        }
        BeepPattern::Triple => {
            push(0, 120);
            push(240, 360);
            push(480, 600);
        }
    }
    w
}

pub struct BuzzerDriver {
    schedule: Vec<Window, 3>,
    triggered_at_ms: u64,
    output_on: bool,
    #[cfg(not(target_os = "espidf"))]
    last_pattern: Option<BeepPattern>,
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self {
            schedule: Vec::new(),
            triggered_at_ms: 0,
            output_on: false,
            #[cfg(not(target_os = "espidf"))]
            last_pattern: None,
        }
    }

    /// Start playing `pattern` at `now_ms`.  A new trigger replaces any
    /// pattern still in flight.
    pub fn trigger(&mut self, pattern: BeepPattern, now_ms: u64) {
        self.schedule = windows(pattern);
        self.triggered_at_ms = now_ms;
        #[cfg(not(target_os = "espidf"))]
        {
            self.last_pattern = Some(pattern);
        }
    }

    /// Advance the schedule; call once per poll-loop iteration.
    pub fn tick(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.triggered_at_ms);
        let should_be_on = self
            .schedule
            .iter()
            .any(|w| elapsed >= w.start_ms && elapsed < w.end_ms);

        if should_be_on != self.output_on {
            self.output_on = should_be_on;
            hw_init::gpio_write(pins::BUZZER_GPIO, should_be_on);
        }

        // Drop the schedule once the last window has passed.
        if !should_be_on
            && self
                .schedule
                .last()
                .is_some_and(|w| elapsed >= w.end_ms)
        {
            self.schedule.clear();
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.output_on
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn last_pattern(&self) -> Option<BeepPattern> {
        self.last_pattern
    }
}
