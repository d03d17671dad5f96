//! Simple mode: one timed exposure at one intensity.
//!
//! ```text
//!  Idle → SetTimeUnit → SetTime → SetIntensity → Running → Done → (menu)
//! ```
//!
//! Each setting state carries the values accumulated so far, and `Running`
//! owns its countdown timer — cancelling the run drops the variant and with
//! it every trace of the exposure.

use log::info;

use super::context::{BeepPattern, OvenContext};
use super::{Mode, render_main_menu};
use crate::app::events::{CancelReason, OvenEvent, RunKind};
use crate::config::TimeUnit;
use crate::line;
use crate::screen;
use crate::timer::ExposureTimer;

/// Nested state of the simple-cycle machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleState {
    Idle,
    SetTimeUnit {
        unit: TimeUnit,
        value: u32,
    },
    SetTime {
        unit: TimeUnit,
        value: u32,
    },
    SetIntensity {
        unit: TimeUnit,
        value: u32,
        intensity: u8,
    },
    Running {
        intensity: u8,
        timer: ExposureTimer,
    },
    Done,
}

/// Advance the simple machine by one tick.
pub fn update(state: SimpleState, ctx: &mut OvenContext) -> Mode {
    let next = match state {
        SimpleState::Idle => {
            if ctx.input.short_press() {
                if ctx.lid_open {
                    ctx.beep(BeepPattern::Warn);
                    ctx.notify(
                        line!("!! CLOSE LID !!"),
                        line!("Press to set"),
                        ctx.config.notice_dwell_ms,
                    );
                    SimpleState::Idle
                } else {
                    ctx.beep(BeepPattern::Confirm);
                    let unit = TimeUnit::MinSec;
                    SimpleState::SetTimeUnit {
                        unit,
                        value: unit.default_value(),
                    }
                }
            } else {
                SimpleState::Idle
            }
        }

        SimpleState::SetTimeUnit { mut unit, mut value } => {
            if ctx.input.delta != 0 {
                unit = if ctx.input.delta > 0 {
                    unit.next()
                } else {
                    unit.prev()
                };
                value = unit.default_value();
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                SimpleState::SetTime { unit, value }
            } else {
                SimpleState::SetTimeUnit { unit, value }
            }
        }

        SimpleState::SetTime { unit, mut value } => {
            if ctx.input.delta != 0 {
                let stepped =
                    i64::from(value) + i64::from(ctx.input.direction()) * i64::from(unit.step());
                value = unit.clamp(stepped);
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                SimpleState::SetIntensity {
                    unit,
                    value,
                    intensity: ctx.config.intensity_default,
                }
            } else {
                SimpleState::SetTime { unit, value }
            }
        }

        SimpleState::SetIntensity {
            unit,
            value,
            mut intensity,
        } => {
            if ctx.input.delta != 0 {
                intensity = adjust_intensity(intensity, ctx.input.direction(), &ctx.config);
            }
            if ctx.input.short_press() {
                if ctx.lid_open {
                    ctx.beep(BeepPattern::Warn);
                    ctx.notify(
                        line!("!! CLOSE LID !!"),
                        line!("Press to retry"),
                        ctx.config.notice_dwell_ms,
                    );
                    SimpleState::SetIntensity {
                        unit,
                        value,
                        intensity,
                    }
                } else {
                    let duration_ms = unit.to_millis(value);
                    ctx.uv_on(intensity);
                    ctx.beep(BeepPattern::RunStart);
                    ctx.emit(OvenEvent::RunStarted {
                        kind: RunKind::Simple,
                        duration_ms,
                        intensity,
                    });
                    info!(
                        "simple run: {} @ {}%",
                        screen::countdown(duration_ms.div_ceil(1000)),
                        intensity
                    );
                    SimpleState::Running {
                        intensity,
                        timer: ExposureTimer::start(ctx.now_ms, duration_ms),
                    }
                }
            } else {
                SimpleState::SetIntensity {
                    unit,
                    value,
                    intensity,
                }
            }
        }

        SimpleState::Running { intensity, timer } => {
            if ctx.input.long_press() {
                ctx.uv_off();
                ctx.beep(BeepPattern::Warn);
                ctx.emit(OvenEvent::RunCanceled {
                    reason: CancelReason::Operator,
                });
                ctx.notify(
                    line!("Canceled"),
                    line!("Main Menu"),
                    ctx.config.notice_dwell_ms,
                );
                info!("simple run cancelled by operator");
                render_main_menu(super::MainMenuItem::Simple, ctx);
                return Mode::home();
            }
            if timer.expired(ctx.now_ms) {
                ctx.uv_off();
                ctx.beep(BeepPattern::Triple);
                ctx.emit(OvenEvent::RunFinished {
                    kind: RunKind::Simple,
                });
                info!("simple run finished");
                SimpleState::Done
            } else {
                SimpleState::Running { intensity, timer }
            }
        }

        SimpleState::Done => {
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                render_main_menu(super::MainMenuItem::Simple, ctx);
                return Mode::home();
            }
            SimpleState::Done
        }
    };

    render(&next, ctx);
    Mode::Simple(next)
}

/// Clamp-adjust intensity by one step in `direction`.
pub(crate) fn adjust_intensity(intensity: u8, direction: i32, config: &crate::config::OvenConfig) -> u8 {
    let stepped = i32::from(intensity) + direction * i32::from(config.intensity_step);
    stepped.clamp(i32::from(config.intensity_min), i32::from(config.intensity_max)) as u8
}

/// Draw the screen for `state`.
pub(crate) fn render(state: &SimpleState, ctx: &mut OvenContext) {
    match state {
        SimpleState::Idle => ctx.screen(line!("Simple Mode"), line!("Press to set")),
        SimpleState::SetTimeUnit { unit, .. } => {
            ctx.screen(line!("Set Time Unit"), line!("{}", unit.label()));
        }
        SimpleState::SetTime { unit, value } => {
            ctx.screen(line!("Set Time"), screen::unit_value(*unit, *value));
        }
        SimpleState::SetIntensity { intensity, .. } => {
            ctx.screen(line!("Set Intensity"), line!("{intensity:3}%"));
        }
        SimpleState::Running { intensity, timer } => {
            let remaining = screen::countdown(timer.remaining_secs(ctx.now_ms));
            ctx.screen(line!("RUN"), line!("{remaining} @ {intensity}%"));
        }
        SimpleState::Done => ctx.screen(line!("DONE"), line!("Press->Menu")),
    }
}
