//! Driven adapters: concrete implementations of the port traits.
//!
//! [`hardware::HardwareAdapter`] is the only code path that reaches real
//! peripherals; [`nvs::NvsAdapter`] persists the program library;
//! [`log_sink::LogEventSink`] writes structured events to the logger;
//! [`time::MonotonicTime`] supplies the tick clock.

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
