//! Lid safety-switch driver.
//!
//! The switch pulls the line HIGH while the lid is closed; the pin idles
//! LOW through its pull-down, so an unplugged harness reads "open" and the
//! interlock holds.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the lid GPIO via hw_init.
//! On host/test: lid state is settable simulation state.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

pub struct LidSwitchDriver {
    #[cfg(not(target_os = "espidf"))]
    sim_open: bool,
}

impl LidSwitchDriver {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sim_open: false,
        }
    }

    /// True while the lid is open.
    #[cfg(target_os = "espidf")]
    pub fn is_open(&self) -> bool {
        !hw_init::gpio_read(pins::LID_SWITCH_GPIO)
    }

    /// True while the lid is open.
    #[cfg(not(target_os = "espidf"))]
    pub fn is_open(&self) -> bool {
        self.sim_open
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_open(&mut self, open: bool) {
        self.sim_open = open;
    }
}
