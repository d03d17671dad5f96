//! UVOven Firmware — Main Entry Point
//!
//! Hexagonal architecture around a fixed-period poll loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter        LogEventSink        NvsAdapter       │
//! │  (Controls+Panel)       (EventSink)         (ProgramStore)   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │               OvenService (pure logic)               │    │
//! │  │  Modes · Lid interlock · Input · Indicator           │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop runs at ~30 ms: sample inputs, run the lid check, advance one
//! mode transition, render.  Nothing in the cycle blocks.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use uvoven::adapters::hardware::HardwareAdapter;
use uvoven::adapters::log_sink::LogEventSink;
use uvoven::adapters::nvs::NvsAdapter;
use uvoven::adapters::time::MonotonicTime;
use uvoven::app::ports::{ControlsPort, PanelPort, ProgramStorePort};
use uvoven::app::service::OvenService;
use uvoven::config::OvenConfig;
use uvoven::drivers::buzzer::BuzzerDriver;
use uvoven::drivers::display::DisplayDriver;
use uvoven::drivers::encoder::EncoderDriver;
use uvoven::drivers::lid::LidSwitchDriver;
use uvoven::drivers::neopixel::NeopixelDriver;
use uvoven::drivers::uv::UvDriver;
use uvoven::drivers::hw_init;
use uvoven::program::ProgramStore;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  UVOven v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let clock = MonotonicTime::new();
    let mut hw = HardwareAdapter::new(
        EncoderDriver::new(),
        LidSwitchDriver::new(),
        DisplayDriver::new(),
        NeopixelDriver::new(),
        UvDriver::new(),
        BuzzerDriver::new(),
    );

    // ── 3. Program library from NVS ───────────────────────────
    hw.display("Loading...", "");
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({e}) — programs will not persist this session");
            NvsAdapter::default()
        }
    };
    let store = ProgramStore::new(nvs.load_programs());

    // ── 4. Application service ────────────────────────────────
    let config = OvenConfig::default();
    let tick_interval_ms = config.tick_interval_ms;
    let mut sink = LogEventSink::new();

    let initial_position = hw.read_rotation();
    let lid_open = hw.lid_is_open();
    let mut oven = OvenService::new(config, store, initial_position, lid_open);
    oven.start(&mut sink);

    info!("System ready. Entering poll loop.");

    // ── 5. Poll loop ──────────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();
        hw.poll(now_ms);
        oven.tick(now_ms, &mut hw, &mut sink);
        oven.persist_if_requested(&mut nvs, &mut sink);

        std::thread::sleep(std::time::Duration::from_millis(tick_interval_ms));
    }
}
