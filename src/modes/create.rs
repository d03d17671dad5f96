//! Custom-program authoring wizard.
//!
//! ```text
//!  Start → SetTimeUnit → SetTime → SetIntensity → AddStep?
//!             ▲                                      │yes
//!             └──────────────────────────────────────┘
//!                                                    │no
//!                          SetLoops → SetName → SavePrompt → (custom menu)
//! ```
//!
//! The wizard edits the draft program staked in the context's working slot.
//! A long press anywhere discards the draft and falls back to the custom
//! menu; confirming the save prompt commits the draft into the library
//! (replace-by-name-or-append) and requests persistence.

use log::info;

use super::context::{BeepPattern, OvenContext};
use super::custom::CustomState;
use super::simple::adjust_intensity;
use super::Mode;
use crate::app::events::OvenEvent;
use crate::config::TimeUnit;
use crate::line;
use crate::program::{numbered_name, Step};
use crate::screen;

/// Nested state of the authoring wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateWizard {
    Start,
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
    AddStep {
        add_another: bool,
    },
    SetLoops {
        loops: u8,
    },
    SetName {
        number: u8,
    },
    SavePrompt,
}

impl CreateWizard {
    fn fresh_step() -> Self {
        let unit = TimeUnit::MinSec;
        Self::SetTimeUnit {
            unit,
            value: unit.default_value(),
        }
    }
}

/// Advance the wizard by one tick.
pub fn update(wizard: CreateWizard, ctx: &mut OvenContext) -> Mode {
    // Long press is a global escape: the draft dies here.
    if ctx.input.long_press() {
        ctx.beep(BeepPattern::Warn);
        ctx.current = None;
        info!("program creation discarded");
        let state = CustomState::nav_home();
        super::custom::render(&state, ctx);
        return Mode::Custom(state);
    }

    let next = match wizard {
        CreateWizard::Start => {
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                CreateWizard::fresh_step()
            } else {
                CreateWizard::Start
            }
        }

        CreateWizard::SetTimeUnit { mut unit, mut value } => {
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
                CreateWizard::SetTime { unit, value }
            } else {
                CreateWizard::SetTimeUnit { unit, value }
            }
        }

        CreateWizard::SetTime { unit, mut value } => {
            if ctx.input.delta != 0 {
                let stepped =
                    i64::from(value) + i64::from(ctx.input.direction()) * i64::from(unit.step());
                value = unit.clamp(stepped);
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                CreateWizard::SetIntensity {
                    unit,
                    value,
                    intensity: ctx.config.intensity_default,
                }
            } else {
                CreateWizard::SetTime { unit, value }
            }
        }

        CreateWizard::SetIntensity {
            unit,
            value,
            mut intensity,
        } => {
            if ctx.input.delta != 0 {
                intensity = adjust_intensity(intensity, ctx.input.direction(), &ctx.config);
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                if let Some(draft) = ctx.current.as_mut() {
                    draft.steps.push(Step {
                        unit,
                        value,
                        intensity,
                    });
                    info!(
                        "step {} added: {} {} @ {}%",
                        draft.steps.len(),
                        value,
                        unit.label(),
                        intensity
                    );
                }
                CreateWizard::AddStep { add_another: true }
            } else {
                CreateWizard::SetIntensity {
                    unit,
                    value,
                    intensity,
                }
            }
        }

        CreateWizard::AddStep { mut add_another } => {
            if ctx.input.delta != 0 {
                add_another = !add_another;
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                if add_another {
                    CreateWizard::fresh_step()
                } else {
                    CreateWizard::SetLoops { loops: 1 }
                }
            } else {
                CreateWizard::AddStep { add_another }
            }
        }

        CreateWizard::SetLoops { mut loops } => {
            if ctx.input.delta != 0 {
                let stepped = i32::from(loops) + ctx.input.direction();
                loops = stepped.clamp(
                    i32::from(ctx.config.loops_min),
                    i32::from(ctx.config.loops_max),
                ) as u8;
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                if let Some(draft) = ctx.current.as_mut() {
                    draft.loops = loops;
                }
                CreateWizard::SetName {
                    number: ctx.store.next_free_number(),
                }
            } else {
                CreateWizard::SetLoops { loops }
            }
        }

        CreateWizard::SetName { mut number } => {
            if ctx.input.delta != 0 {
                // Clamped, deliberately wrap-free: P-99 does not roll to P-01.
                let stepped = i32::from(number) + ctx.input.direction();
                number = stepped.clamp(1, 99) as u8;
            }
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                if let Some(draft) = ctx.current.as_mut() {
                    draft.name = numbered_name(number);
                }
                CreateWizard::SavePrompt
            } else {
                CreateWizard::SetName { number }
            }
        }

        CreateWizard::SavePrompt => {
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                if let Some(draft) = ctx.current.clone() {
                    let name = draft.name.clone();
                    ctx.store.upsert(draft);
                    ctx.save_requested = true;
                    ctx.emit(OvenEvent::ProgramSaved {
                        name: name.clone(),
                        count: ctx.store.len(),
                    });
                    info!("program saved: {} ({} in library)", name, ctx.store.len());
                }
                ctx.notify(line!("Program Saved!"), line!(""), ctx.config.notice_dwell_ms);
                let state = CustomState::nav_home();
                super::custom::render(&state, ctx);
                return Mode::Custom(state);
            }
            CreateWizard::SavePrompt
        }
    };

    render(&next, ctx);
    Mode::Create(next)
}

/// Draw the screen for `wizard`.  Step numbering counts the step being
/// authored (one past those already appended).
pub(crate) fn render(wizard: &CreateWizard, ctx: &mut OvenContext) {
    let steps_done = ctx.current.as_ref().map_or(0, |p| p.steps.len());
    let authoring = steps_done + 1;
    match wizard {
        CreateWizard::Start => {
            ctx.screen(line!("Create Program"), line!("Add Step {authoring}?"));
        }
        CreateWizard::SetTimeUnit { unit, .. } => {
            ctx.screen(
                line!("Step {authoring}: Time Unit"),
                line!("{}", unit.label()),
            );
        }
        CreateWizard::SetTime { unit, value } => {
            ctx.screen(
                line!("Step {authoring}: Set Time"),
                screen::unit_value(*unit, *value),
            );
        }
        CreateWizard::SetIntensity { intensity, .. } => {
            ctx.screen(line!("Step {authoring}: Intensity"), line!("{intensity:3}%"));
        }
        CreateWizard::AddStep { add_another } => {
            let prompt = if *add_another { "Add Another?" } else { "Finish?" };
            ctx.screen(
                line!("Step {steps_done} Added!"),
                screen::menu_item(prompt),
            );
        }
        CreateWizard::SetLoops { loops } => {
            ctx.screen(line!("Set Total Loops"), line!("{loops}x"));
        }
        CreateWizard::SetName { number } => {
            ctx.screen(line!("Set Name"), line!("{}", numbered_name(*number)));
        }
        CreateWizard::SavePrompt => {
            let name = line!("{}", ctx.current.as_ref().map_or("?", |p| p.name.as_str()));
            ctx.screen(line!("Save Program?"), name);
        }
    }
}
