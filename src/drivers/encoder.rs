//! Rotary encoder driver (quadrature + integrated push-button).
//!
//! Position comes from the PCNT hardware counter; the 16-bit counter is
//! widened to `i32` here so the input aggregator upstairs only ever sees a
//! monotonically-adjusted absolute position.  The push-button is a plain
//! active-low level read — debounce and gesture classification live in the
//! control core, not here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the PCNT unit and button GPIO via hw_init.
//! On host/test: position and level are settable simulation state.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

pub struct EncoderDriver {
    position: i32,
    #[cfg(target_os = "espidf")]
    last_raw: i16,
    #[cfg(not(target_os = "espidf"))]
    sim_pressed: bool,
}

impl EncoderDriver {
    pub fn new() -> Self {
        Self {
            position: 0,
            #[cfg(target_os = "espidf")]
            last_raw: hw_init::pcnt_read(),
            #[cfg(not(target_os = "espidf"))]
            sim_pressed: false,
        }
    }

    /// Absolute accumulated position.
    #[cfg(target_os = "espidf")]
    pub fn position(&mut self) -> i32 {
        // Widen the hardware counter: wrapping i16 arithmetic keeps the
        // accumulated position correct across counter overflow.
        let raw = hw_init::pcnt_read();
        let delta = raw.wrapping_sub(self.last_raw);
        self.last_raw = raw;
        self.position = self.position.wrapping_add(i32::from(delta));
        self.position
    }

    /// Absolute accumulated position.
    #[cfg(not(target_os = "espidf"))]
    pub fn position(&mut self) -> i32 {
        self.position
    }

    /// Instantaneous push-button level (true = held down).
    #[cfg(target_os = "espidf")]
    pub fn is_pressed(&self) -> bool {
        // Active-low with pull-up.
        !hw_init::gpio_read(pins::ENC_BTN_GPIO)
    }

    /// Instantaneous push-button level (true = held down).
    #[cfg(not(target_os = "espidf"))]
    pub fn is_pressed(&self) -> bool {
        self.sim_pressed
    }

    // ── Simulation hooks ──────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_turn(&mut self, detents: i32) {
        self.position = self.position.wrapping_add(detents);
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_pressed(&mut self, pressed: bool) {
        self.sim_pressed = pressed;
    }
}
