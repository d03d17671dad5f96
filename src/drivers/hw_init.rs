//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the LEDC PWM channel for the UV driver, the
//! PCNT quadrature counter for the rotary encoder, the SPI device for the
//! ST7567 panel, and the RMT channel for the indicator NeoPixels — all via
//! raw ESP-IDF sys calls.  Called once from `main()` before the poll loop
//! starts.
//!
//! Every helper in this module has a host-target stub so the drivers above
//! it compile and test off-device.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed,
    PcntInitFailed(i32),
    SpiInitFailed(i32),
    RmtInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::PcntInitFailed(rc) => write!(f, "PCNT encoder config failed (rc={})", rc),
            Self::SpiInitFailed(rc) => write!(f, "SPI bus/device config failed (rc={})", rc),
            Self::RmtInitFailed(rc) => write!(f, "RMT NeoPixel config failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the poll loop; single-threaded.
    unsafe {
        init_gpio()?;
        init_ledc();
        init_pcnt()?;
        init_spi()?;
        init_rmt()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // Button: active-low, internal pull-up.
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ENC_BTN_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    // Lid switch: pull-down, switch pulls HIGH when closed.  A broken wire
    // therefore reads "open".
    let lid_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LID_SWITCH_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&lid_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    // Outputs: buzzer plus the LCD control pins (A0, RST).
    let output_pins = [pins::BUZZER_GPIO, pins::LCD_RS_GPIO, pins::LCD_RST_GPIO];
    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM (UV output) ──────────────────────────────────────

pub const LEDC_CH_UV: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() {
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::UV_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    unsafe {
        ledc_timer_config(&timer0);
    }

    unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::UV_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        });
    }

    info!("hw_init: LEDC configured (uv=CH0 @ {} Hz)", pins::UV_PWM_FREQ_HZ);
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channel was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        esp_idf_svc::sys::ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        esp_idf_svc::sys::ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

// ── PCNT (rotary encoder) ─────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_pcnt() -> Result<(), HwInitError> {
    // Quadrature x2: count CLK edges, direction from DT level.
    let cfg = pcnt_config_t {
        pulse_gpio_num: pins::ENC_CLK_GPIO,
        ctrl_gpio_num: pins::ENC_DT_GPIO,
        lctrl_mode: pcnt_ctrl_mode_t_PCNT_MODE_REVERSE,
        hctrl_mode: pcnt_ctrl_mode_t_PCNT_MODE_KEEP,
        pos_mode: pcnt_count_mode_t_PCNT_COUNT_INC,
        neg_mode: pcnt_count_mode_t_PCNT_COUNT_DEC,
        counter_h_lim: i16::MAX,
        counter_l_lim: i16::MIN,
        unit: pcnt_unit_t_PCNT_UNIT_0,
        channel: pcnt_channel_t_PCNT_CHANNEL_0,
    };
    let ret = unsafe { pcnt_unit_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::PcntInitFailed(ret));
    }

    // ~1 µs glitch filter on the mechanical contacts.
    unsafe {
        pcnt_set_filter_value(pcnt_unit_t_PCNT_UNIT_0, 80);
        pcnt_filter_enable(pcnt_unit_t_PCNT_UNIT_0);
        pcnt_counter_pause(pcnt_unit_t_PCNT_UNIT_0);
        pcnt_counter_clear(pcnt_unit_t_PCNT_UNIT_0);
        pcnt_counter_resume(pcnt_unit_t_PCNT_UNIT_0);
    }

    info!("hw_init: PCNT encoder counter running");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn pcnt_read() -> i16 {
    let mut count: i16 = 0;
    // SAFETY: counter read on a configured unit; main-loop only.
    unsafe {
        pcnt_get_counter_value(pcnt_unit_t_PCNT_UNIT_0, &mut count);
    }
    count
}

#[cfg(not(target_os = "espidf"))]
pub fn pcnt_read() -> i16 {
    0
}

// ── SPI (ST7567 panel) ────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut LCD_SPI: spi_device_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_spi() -> Result<(), HwInitError> {
    let bus_cfg = spi_bus_config_t {
        __bindgen_anon_1: spi_bus_config_t__bindgen_ty_1 {
            mosi_io_num: pins::LCD_MOSI_GPIO,
        },
        __bindgen_anon_2: spi_bus_config_t__bindgen_ty_2 { miso_io_num: -1 },
        sclk_io_num: pins::LCD_SCK_GPIO,
        __bindgen_anon_3: spi_bus_config_t__bindgen_ty_3 { quadwp_io_num: -1 },
        __bindgen_anon_4: spi_bus_config_t__bindgen_ty_4 { quadhd_io_num: -1 },
        ..Default::default()
    };
    let ret = unsafe {
        spi_bus_initialize(
            spi_host_device_t_SPI2_HOST,
            &bus_cfg,
            spi_common_dma_t_SPI_DMA_CH_AUTO,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::SpiInitFailed(ret));
    }

    let dev_cfg = spi_device_interface_config_t {
        clock_speed_hz: pins::LCD_SPI_HZ as i32,
        mode: 3, // CPOL=1, CPHA=1 per ST7567 datasheet
        spics_io_num: pins::LCD_CS_GPIO,
        queue_size: 1,
        ..Default::default()
    };
    // SAFETY: LCD_SPI is written once here, before the poll loop starts.
    let ret = unsafe {
        spi_bus_add_device(spi_host_device_t_SPI2_HOST, &dev_cfg, &raw mut LCD_SPI)
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::SpiInitFailed(ret));
    }

    info!("hw_init: SPI2 LCD device attached");
    Ok(())
}

/// Transmit bytes to the panel.  `data` selects the A0 line: true = display
/// data, false = command.
#[cfg(target_os = "espidf")]
pub fn lcd_write(bytes: &[u8], data: bool) {
    if bytes.is_empty() {
        return;
    }
    gpio_write(pins::LCD_RS_GPIO, data);

    let mut txn: spi_transaction_t = unsafe { core::mem::zeroed() };
    txn.length = bytes.len() * 8;
    txn.__bindgen_anon_1.tx_buffer = bytes.as_ptr().cast();
    // SAFETY: LCD_SPI was initialised in init_spi(); main-loop only.
    unsafe {
        spi_device_transmit(LCD_SPI, &mut txn);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn lcd_write(_bytes: &[u8], _data: bool) {}

// ── RMT (NeoPixel chain) ──────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_rmt() -> Result<(), HwInitError> {
    let mut cfg: rmt_config_t = unsafe { core::mem::zeroed() };
    cfg.rmt_mode = rmt_mode_t_RMT_MODE_TX;
    cfg.channel = rmt_channel_t_RMT_CHANNEL_0;
    cfg.gpio_num = pins::NEOPIXEL_GPIO;
    cfg.mem_block_num = 1;
    cfg.clk_div = 2; // 80 MHz / 2 → 25 ns ticks

    let ret = unsafe { rmt_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::RmtInitFailed(ret));
    }
    let ret = unsafe { rmt_driver_install(rmt_channel_t_RMT_CHANNEL_0, 0, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::RmtInitFailed(ret));
    }

    info!("hw_init: RMT NeoPixel channel ready");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn rmt_item(d0: u16, l0: bool, d1: u16, l1: bool) -> rmt_item32_t {
    let val = u32::from(d0 & 0x7FFF)
        | (u32::from(l0) << 15)
        | (u32::from(d1 & 0x7FFF) << 16)
        | (u32::from(l1) << 31);
    rmt_item32_t {
        __bindgen_anon_1: rmt_item32_t__bindgen_ty_1 { val },
    }
}

/// Push a GRB byte stream down the NeoPixel chain.
/// WS2812 timing at 25 ns ticks: 0-bit = 400/850 ns, 1-bit = 800/450 ns.
#[cfg(target_os = "espidf")]
pub fn neopixel_write(grb: &[u8]) {
    let mut items = Vec::with_capacity(grb.len() * 8);
    for byte in grb {
        for bit in (0..8).rev() {
            let one = (byte >> bit) & 1 == 1;
            items.push(if one {
                rmt_item(32, true, 18, false)
            } else {
                rmt_item(16, true, 34, false)
            });
        }
    }
    // SAFETY: channel configured in init_rmt(); blocking write from the
    // single main-loop context.
    unsafe {
        rmt_write_items(rmt_channel_t_RMT_CHANNEL_0, items.as_ptr(), items.len() as i32, true);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn neopixel_write(_grb: &[u8]) {}
