//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns every driver, exposing them through [`ControlsPort`] and
//! [`PanelPort`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets the underlying drivers run their
//! simulation backends, which makes this adapter double as the test rig for
//! full-system integration tests.

use crate::app::ports::{ControlsPort, PanelPort};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::display::DisplayDriver;
use crate::drivers::encoder::EncoderDriver;
use crate::drivers::lid::LidSwitchDriver;
use crate::drivers::neopixel::NeopixelDriver;
use crate::drivers::uv::{UvDriver, UvState};
use crate::indicator::Rgb;
use crate::modes::context::BeepPattern;

/// Concrete adapter that combines all peripherals behind the port traits.
pub struct HardwareAdapter {
    encoder: EncoderDriver,
    lid: LidSwitchDriver,
    display: DisplayDriver,
    pixels: NeopixelDriver,
    uv: UvDriver,
    buzzer: BuzzerDriver,
    /// Clock snapshot for the buzzer schedule, fed by [`Self::poll`].
    now_ms: u64,
}

impl HardwareAdapter {
    pub fn new(
        encoder: EncoderDriver,
        lid: LidSwitchDriver,
        display: DisplayDriver,
        pixels: NeopixelDriver,
        uv: UvDriver,
        buzzer: BuzzerDriver,
    ) -> Self {
        Self {
            encoder,
            lid,
            display,
            pixels,
            uv,
            buzzer,
            now_ms: 0,
        }
    }

    /// Advance time-dependent drivers.  Call once per poll-loop iteration,
    /// before the service tick.
    pub fn poll(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.buzzer.tick(now_ms);
    }

    /// Kill every output — used on shutdown paths.
    pub fn all_off(&mut self) {
        self.uv.off();
        self.pixels.off();
    }
}

// ── ControlsPort implementation ───────────────────────────────

impl ControlsPort for HardwareAdapter {
    fn read_rotation(&mut self) -> i32 {
        self.encoder.position()
    }

    fn is_pressed(&mut self) -> bool {
        self.encoder.is_pressed()
    }

    fn lid_is_open(&mut self) -> bool {
        self.lid.is_open()
    }
}

// ── PanelPort implementation ──────────────────────────────────

impl PanelPort for HardwareAdapter {
    fn display(&mut self, line1: &str, line2: &str) {
        self.display.show(line1, line2);
    }

    fn set_indicator(&mut self, pixels: [Rgb; 3]) {
        self.pixels.set(pixels);
    }

    fn set_uv_duty(&mut self, duty: f32) {
        self.uv.set_duty(duty);
    }

    fn uv_off(&mut self) {
        self.uv.off();
    }

    fn beep(&mut self, pattern: BeepPattern) {
        self.buzzer.trigger(pattern, self.now_ms);
    }
}

// ── Simulation hooks (host builds and integration tests) ──────

#[cfg(not(target_os = "espidf"))]
impl HardwareAdapter {
    /// A fully simulated rig with all drivers in their host backends.
    pub fn simulated() -> Self {
        Self::new(
            EncoderDriver::new(),
            LidSwitchDriver::new(),
            DisplayDriver::new(),
            NeopixelDriver::new(),
            UvDriver::new(),
            BuzzerDriver::new(),
        )
    }

    pub fn sim_turn(&mut self, detents: i32) {
        self.encoder.sim_turn(detents);
    }

    pub fn sim_set_pressed(&mut self, pressed: bool) {
        self.encoder.sim_set_pressed(pressed);
    }

    pub fn sim_set_lid_open(&mut self, open: bool) {
        self.lid.sim_set_open(open);
    }

    pub fn displayed(&self) -> (&str, &str) {
        self.display.lines()
    }

    pub fn indicator(&self) -> [Rgb; 3] {
        self.pixels.current()
    }

    pub fn uv_state(&self) -> UvState {
        self.uv.state()
    }

    pub fn last_beep(&self) -> Option<BeepPattern> {
        self.buzzer.last_pattern()
    }
}
