//! Indicator NeoPixel driver (WS2812, 3-pixel chain).
//!
//! Dirty-checked: the RMT stream only goes out when a colour actually
//! changed, so the per-tick indicator refresh is free while nothing blinks.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: serialises GRB bytes through the RMT channel via hw_init.
//! On host/test: tracks the chain state in-memory only.

use crate::drivers::hw_init;
use crate::indicator::Rgb;
use crate::pins::NEOPIXEL_COUNT;

pub struct NeopixelDriver {
    pixels: [Rgb; NEOPIXEL_COUNT],
    written: bool,
}

impl NeopixelDriver {
    pub fn new() -> Self {
        Self {
            pixels: [(0, 0, 0); NEOPIXEL_COUNT],
            written: false,
        }
    }

    /// Latch new colours onto the chain (no-op when unchanged).
    pub fn set(&mut self, pixels: [Rgb; NEOPIXEL_COUNT]) {
        if self.written && pixels == self.pixels {
            return;
        }
        self.pixels = pixels;
        self.written = true;

        // WS2812 byte order is GRB.
        let mut grb = [0u8; NEOPIXEL_COUNT * 3];
        for (i, (r, g, b)) in pixels.iter().enumerate() {
            grb[i * 3] = *g;
            grb[i * 3 + 1] = *r;
            grb[i * 3 + 2] = *b;
        }
        hw_init::neopixel_write(&grb);
    }

    pub fn off(&mut self) {
        self.set([(0, 0, 0); NEOPIXEL_COUNT]);
    }

    pub fn current(&self) -> [Rgb; NEOPIXEL_COUNT] {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_latches_colours() {
        let mut px = NeopixelDriver::new();
        let colours = [(255, 0, 0), (0, 255, 0), (0, 0, 255)];
        px.set(colours);
        assert_eq!(px.current(), colours);
        px.off();
        assert_eq!(px.current(), [(0, 0, 0); 3]);
    }
}
