//! GPIO / peripheral pin assignments for the UVOven control board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Rotary encoder (quadrature + integrated push-button)
// ---------------------------------------------------------------------------

/// Encoder channel A (CLK) — PCNT pulse input.
pub const ENC_CLK_GPIO: i32 = 10;
/// Encoder channel B (DT) — PCNT control input.
pub const ENC_DT_GPIO: i32 = 11;
/// Encoder push-button, active-low with pull-up.
pub const ENC_BTN_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// LCD (ST7567, SPI)
// ---------------------------------------------------------------------------

pub const LCD_SCK_GPIO: i32 = 14;
pub const LCD_MOSI_GPIO: i32 = 15;
pub const LCD_CS_GPIO: i32 = 13;
/// A0 (register-select): HIGH = data, LOW = command.
pub const LCD_RS_GPIO: i32 = 22;
pub const LCD_RST_GPIO: i32 = 20;

/// SPI clock for the ST7567 (5 MHz, per panel datasheet maximum).
pub const LCD_SPI_HZ: u32 = 5_000_000;

// ---------------------------------------------------------------------------
// UV LED array (constant-current driver, PWM dimmed)
// ---------------------------------------------------------------------------

/// LEDC PWM output to the UV LED driver.
pub const UV_PWM_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------

/// Piezo buzzer, digital output (active HIGH).
pub const BUZZER_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// Lid safety switch
// ---------------------------------------------------------------------------

/// Digital input: HIGH = lid closed (switch pressed), LOW = lid open.
/// Pull-down so a broken wire reads "open" — fails safe.
pub const LID_SWITCH_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Indicator NeoPixels (knob ring + panel, 3 pixels)
// ---------------------------------------------------------------------------

/// WS2812 data line for the 3-pixel indicator chain.
pub const NEOPIXEL_GPIO: i32 = 21;
/// Number of pixels on the chain.
pub const NEOPIXEL_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the UV LED driver (1 kHz — driver-compatible).
pub const UV_PWM_FREQ_HZ: u32 = 1_000;
