//! Peripheral drivers.
//!
//! Every driver follows the same dual-target pattern: public state tracked
//! in memory (so host builds and tests see identical behaviour), with the
//! actual register access routed through cfg-gated `hw_init` helpers that
//! compile to no-ops off-device.

pub mod buzzer;
pub mod display;
pub mod encoder;
pub mod hw_init;
pub mod lid;
pub mod neopixel;
pub mod uv;
