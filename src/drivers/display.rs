//! ST7567 panel driver: two lines of 5×7 text over SPI.
//!
//! The control core only ever needs "print line 1 / print line 2"; this
//! driver owns the panel command protocol and the glyph table.  21 columns
//! of 6-pixel-wide glyphs fill 126 of the panel's 128 pixels — which is
//! where the 21-character line limit comes from.
//!
//! Dirty-checked: the SPI stream only goes out when the text changes, so
//! the once-per-tick redraw of a static menu costs nothing.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: pushes pages through the SPI device via hw_init.
//! On host/test: tracks the two lines in-memory only.

use crate::screen::{Line, LINE_CAPACITY};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

pub struct DisplayDriver {
    line1: Line,
    line2: Line,
    drawn: bool,
}

impl DisplayDriver {
    /// Construct and (on device) run the panel init sequence.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        init_panel();
        Self {
            line1: Line::new(),
            line2: Line::new(),
            drawn: false,
        }
    }

    /// Show two lines of text.  Input longer than the panel width is
    /// clipped; a no-change call is free.
    pub fn show(&mut self, line1: &str, line2: &str) {
        if self.drawn && self.line1.as_str() == line1 && self.line2.as_str() == line2 {
            return;
        }
        self.line1 = clip(line1);
        self.line2 = clip(line2);
        self.drawn = true;

        #[cfg(target_os = "espidf")]
        {
            draw_text_page(0, self.line1.as_str());
            draw_text_page(2, self.line2.as_str());
        }
    }

    /// The currently displayed lines.
    pub fn lines(&self) -> (&str, &str) {
        (self.line1.as_str(), self.line2.as_str())
    }
}

fn clip(s: &str) -> Line {
    let mut out = Line::new();
    for c in s.chars().take(LINE_CAPACITY) {
        let _ = out.push(c);
    }
    out
}

// ── ESP-IDF panel protocol ────────────────────────────────────

/// Reset and configure the panel: 1/9 bias, normal segment direction,
/// flipped common direction, regulation ratio 3, EV 0x2F, booster on.
#[cfg(target_os = "espidf")]
fn init_panel() {
    hw_init::gpio_write(pins::LCD_RST_GPIO, false);
    // SAFETY: busy-wait delay from the single init context.
    unsafe { esp_idf_svc::sys::esp_rom_delay_us(10_000) };
    hw_init::gpio_write(pins::LCD_RST_GPIO, true);
    unsafe { esp_idf_svc::sys::esp_rom_delay_us(10_000) };

    hw_init::lcd_write(
        &[
            0xE2, // software reset
            0xA2, // bias 1/9
            0xA0, // segment direction normal
            0xC8, // common direction flipped
            0x23, // regulation ratio 3
            0x81, 0x2F, // electronic volume
            0x2F, // booster + regulator + follower on
            0x40, // start line 0
            0xA4, // normal display (not all-on)
            0xAF, // display on
        ],
        false,
    );

    // Clear the whole frame once; text redraws only touch their own pages.
    for page in 0..8 {
        set_cursor(page, 0);
        hw_init::lcd_write(&[0u8; 128], true);
    }
}

#[cfg(target_os = "espidf")]
fn set_cursor(page: u8, column: u8) {
    hw_init::lcd_write(
        &[
            0xB0 | (page & 0x0F),
            0x10 | (column >> 4),
            column & 0x0F,
        ],
        false,
    );
}

/// Render one text line into a display page (8 pixel rows).
#[cfg(target_os = "espidf")]
fn draw_text_page(page: u8, text: &str) {
    let mut columns = [0u8; 128];
    let mut col = 0usize;
    for c in text.chars() {
        let glyph = FONT_5X7[glyph_index(c)];
        for byte in glyph {
            columns[col] = byte;
            col += 1;
        }
        col += 1; // inter-glyph spacing
    }
    set_cursor(page, 0);
    hw_init::lcd_write(&columns, true);
}

#[cfg(target_os = "espidf")]
fn glyph_index(c: char) -> usize {
    let code = c as u32;
    if (0x20..0x7F).contains(&code) {
        (code - 0x20) as usize
    } else {
        0x3F - 0x20 // '?' for anything outside printable ASCII
    }
}

/// Standard 5×7 ASCII font, column-major, LSB at the top row.
/// Covers 0x20 ' ' through 0x7E '~'.
#[cfg(target_os = "espidf")]
#[rustfmt::skip]
const FONT_5X7: [[u8; 5]; 96] = [
    [0x00,0x00,0x00,0x00,0x00], [0x00,0x00,0x5F,0x00,0x00], [0x00,0x07,0x00,0x07,0x00],
    [0x14,0x7F,0x14,0x7F,0x14], [0x24,0x2A,0x7F,0x2A,0x12], [0x23,0x13,0x08,0x64,0x62],
    [0x36,0x49,0x55,0x22,0x50], [0x00,0x05,0x03,0x00,0x00], [0x00,0x1C,0x22,0x41,0x00],
    [0x00,0x41,0x22,0x1C,0x00], [0x14,0x08,0x3E,0x08,0x14], [0x08,0x08,0x3E,0x08,0x08],
    [0x00,0x50,0x30,0x00,0x00], [0x08,0x08,0x08,0x08,0x08], [0x00,0x60,0x60,0x00,0x00],
    [0x20,0x10,0x08,0x04,0x02], [0x3E,0x51,0x49,0x45,0x3E], [0x00,0x42,0x7F,0x40,0x00],
    [0x42,0x61,0x51,0x49,0x46], [0x21,0x41,0x45,0x4B,0x31], [0x18,0x14,0x12,0x7F,0x10],
    [0x27,0x45,0x45,0x45,0x39], [0x3C,0x4A,0x49,0x49,0x30], [0x01,0x71,0x09,0x05,0x03],
    [0x36,0x49,0x49,0x49,0x36], [0x06,0x49,0x49,0x29,0x1E], [0x00,0x36,0x36,0x00,0x00],
    [0x00,0x56,0x36,0x00,0x00], [0x08,0x14,0x22,0x41,0x00], [0x14,0x14,0x14,0x14,0x14],
    [0x00,0x41,0x22,0x14,0x08], [0x02,0x01,0x51,0x09,0x06], [0x32,0x49,0x79,0x41,0x3E],
    [0x7E,0x11,0x11,0x11,0x7E], [0x7F,0x49,0x49,0x49,0x36], [0x3E,0x41,0x41,0x41,0x22],
    [0x7F,0x41,0x41,0x22,0x1C], [0x7F,0x49,0x49,0x49,0x41], [0x7F,0x09,0x09,0x09,0x01],
    [0x3E,0x41,0x49,0x49,0x7A], [0x7F,0x08,0x08,0x08,0x7F], [0x00,0x41,0x7F,0x41,0x00],
    [0x20,0x40,0x41,0x3F,0x01], [0x7F,0x08,0x14,0x22,0x41], [0x7F,0x40,0x40,0x40,0x40],
    [0x7F,0x02,0x0C,0x02,0x7F], [0x7F,0x04,0x08,0x10,0x7F], [0x3E,0x41,0x41,0x41,0x3E],
    [0x7F,0x09,0x09,0x09,0x06], [0x3E,0x41,0x51,0x21,0x5E], [0x7F,0x09,0x19,0x29,0x46],
    [0x46,0x49,0x49,0x49,0x31], [0x01,0x01,0x7F,0x01,0x01], [0x3F,0x40,0x40,0x40,0x3F],
    [0x1F,0x20,0x40,0x20,0x1F], [0x3F,0x40,0x38,0x40,0x3F], [0x63,0x14,0x08,0x14,0x63],
    [0x07,0x08,0x70,0x08,0x07], [0x61,0x51,0x49,0x45,0x43], [0x00,0x7F,0x41,0x41,0x00],
    [0x02,0x04,0x08,0x10,0x20], [0x00,0x41,0x41,0x7F,0x00], [0x04,0x02,0x01,0x02,0x04],
    [0x40,0x40,0x40,0x40,0x40], [0x00,0x01,0x02,0x04,0x00], [0x20,0x54,0x54,0x54,0x78],
    [0x7F,0x48,0x44,0x44,0x38], [0x38,0x44,0x44,0x44,0x20], [0x38,0x44,0x44,0x48,0x7F],
    [0x38,0x54,0x54,0x54,0x18], [0x08,0x7E,0x09,0x01,0x02], [0x0C,0x52,0x52,0x52,0x3E],
    [0x7F,0x08,0x04,0x04,0x78], [0x00,0x44,0x7D,0x40,0x00], [0x20,0x40,0x44,0x3D,0x00],
    [0x7F,0x10,0x28,0x44,0x00], [0x00,0x41,0x7F,0x40,0x00], [0x7C,0x04,0x18,0x04,0x78],
    [0x7C,0x08,0x04,0x04,0x78], [0x38,0x44,0x44,0x44,0x38], [0x7C,0x14,0x14,0x14,0x08],
    [0x08,0x14,0x14,0x18,0x7C], [0x7C,0x08,0x04,0x04,0x08], [0x48,0x54,0x54,0x54,0x20],
    [0x04,0x3F,0x44,0x40,0x20], [0x3C,0x40,0x40,0x20,0x7C], [0x1C,0x20,0x40,0x20,0x1C],
    [0x3C,0x40,0x30,0x40,0x3C], [0x44,0x28,0x10,0x28,0x44], [0x0C,0x50,0x50,0x50,0x3C],
    [0x44,0x64,0x54,0x4C,0x44], [0x00,0x08,0x36,0x41,0x00], [0x00,0x00,0x7F,0x00,0x00],
    [0x00,0x41,0x36,0x08,0x00], [0x10,0x08,0x08,0x10,0x08], [0x00,0x00,0x00,0x00,0x00],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_tracks_lines() {
        let mut d = DisplayDriver::new();
        d.show("Main Menu", "> Simple Mode");
        assert_eq!(d.lines(), ("Main Menu", "> Simple Mode"));
    }

    #[test]
    fn long_lines_are_clipped() {
        let mut d = DisplayDriver::new();
        d.show("a line that is much longer than the panel", "");
        assert_eq!(d.lines().0.len(), LINE_CAPACITY);
    }
}
