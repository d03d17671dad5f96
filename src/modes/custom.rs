//! Custom mode: program library menu, load flow, and the multi-step runner.
//!
//! One enum covers the whole mode, so the mutually-exclusive concerns the
//! operator can be in — navigating, picking a program to load, driving a
//! run, acknowledging a finished run — cannot overlap by construction:
//!
//! ```text
//!  Nav ──[Load]──▶ Load ──[confirm/back]──▶ Nav
//!   │
//!   ├──[Create]──▶ (CustomCreate wizard, separate top-level mode)
//!   │
//!   └──[Run]──▶ Running{cursor} ──[all loops done]──▶ Done ──[ack]──▶ (menu)
//! ```
//!
//! The run cursor walks `loops × steps` executions in order; each step sets
//! its own UV duty and countdown window.

use log::info;

use super::context::{BeepPattern, OvenContext};
use super::{Mode, render_main_menu};
use crate::app::events::{CancelReason, OvenEvent, RunKind};
use crate::line;
use crate::program::{Program, Step};
use crate::screen;
use crate::timer::ExposureTimer;

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

/// The three custom-menu entries, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomItem {
    Load,
    Create,
    Run,
}

impl CustomItem {
    const ALL: [CustomItem; 3] = [CustomItem::Load, CustomItem::Create, CustomItem::Run];

    pub fn label(self) -> &'static str {
        match self {
            Self::Load => "Load Program",
            Self::Create => "Create New",
            Self::Run => "Run Program",
        }
    }

    /// Cycle the selector with wraparound in either direction.
    pub fn cycled(self, direction: i32) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0) as i32;
        let n = Self::ALL.len() as i32;
        Self::ALL[((idx + direction).rem_euclid(n)) as usize]
    }
}

// ---------------------------------------------------------------------------
// Run cursor
// ---------------------------------------------------------------------------

/// Progress of an active custom run.  Lives only inside
/// [`CustomState::Running`]; destroyed with the variant on completion or
/// cancellation.  Invariants: `1 <= loop_index <= loops`,
/// `step_index < steps.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCursor {
    pub step_index: usize,
    pub loop_index: u8,
    pub timer: ExposureTimer,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Nested state of the custom-mode machine.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomState {
    Nav { selected: CustomItem },
    Load { index: usize },
    Running { cursor: RunCursor },
    Done,
}

impl CustomState {
    /// Menu entry point: navigation with the first item selected.
    pub fn nav_home() -> Self {
        Self::Nav {
            selected: CustomItem::Load,
        }
    }
}

/// Advance the custom machine by one tick.
pub fn update(state: CustomState, ctx: &mut OvenContext) -> Mode {
    let next = match state {
        CustomState::Running { cursor } => match drive_run(cursor, ctx) {
            Some(next) => next,
            None => {
                render_main_menu(super::MainMenuItem::Simple, ctx);
                return Mode::home();
            }
        },

        CustomState::Done => {
            if ctx.input.short_press() {
                ctx.beep(BeepPattern::Confirm);
                render_main_menu(super::MainMenuItem::Simple, ctx);
                return Mode::home();
            }
            CustomState::Done
        }

        CustomState::Nav { mut selected } => {
            if ctx.input.long_press() {
                ctx.beep(BeepPattern::Warn);
                render_main_menu(super::MainMenuItem::Simple, ctx);
                return Mode::home();
            }
            if ctx.input.delta != 0 {
                selected = selected.cycled(ctx.input.direction());
            }
            if ctx.input.short_press() {
                if ctx.lid_open {
                    ctx.beep(BeepPattern::Warn);
                    ctx.notify(line!("!! CLOSE LID !!"), line!(""), ctx.config.notice_dwell_ms);
                    CustomState::Nav { selected }
                } else {
                    match selected {
                        CustomItem::Load => {
                            if ctx.store.is_empty() {
                                ctx.notify(
                                    line!("Load Program"),
                                    line!("No Programs!"),
                                    ctx.config.notice_dwell_ms,
                                );
                                CustomState::Nav { selected }
                            } else {
                                ctx.beep(BeepPattern::Confirm);
                                CustomState::Load { index: 0 }
                            }
                        }
                        CustomItem::Create => {
                            ctx.beep(BeepPattern::Confirm);
                            ctx.current = Some(Program::draft());
                            let wizard = super::create::CreateWizard::Start;
                            super::create::render(&wizard, ctx);
                            return Mode::Create(wizard);
                        }
                        CustomItem::Run => match start_run(ctx) {
                            Some(running) => running,
                            None => {
                                ctx.notify(
                                    line!("Run Program"),
                                    line!("No PGM Loaded!"),
                                    ctx.config.notice_dwell_ms,
                                );
                                CustomState::Nav { selected }
                            }
                        },
                    }
                }
            } else {
                CustomState::Nav { selected }
            }
        }

        CustomState::Load { mut index } => {
            if ctx.input.long_press() {
                ctx.beep(BeepPattern::Warn);
                CustomState::nav_home()
            } else {
                if ctx.input.delta != 0 && !ctx.store.is_empty() {
                    let n = ctx.store.len() as i32;
                    index = ((index as i32 + ctx.input.direction()).rem_euclid(n)) as usize;
                }
                if ctx.input.short_press() {
                    if let Some(program) = ctx.store.get(index).cloned() {
                        ctx.beep(BeepPattern::Confirm);
                        ctx.notify(
                            line!("Loaded:"),
                            line!("{}", program.name),
                            ctx.config.notice_dwell_ms,
                        );
                        ctx.emit(OvenEvent::ProgramLoaded {
                            name: program.name.clone(),
                        });
                        info!("program loaded: {}", program.name);
                        // Value copy into the working slot — edits and
                        // re-saves never touch the stored entry directly.
                        ctx.current = Some(program);
                    }
                    CustomState::nav_home()
                } else {
                    CustomState::Load { index }
                }
            }
        }
    };

    render(&next, ctx);
    Mode::Custom(next)
}

// ---------------------------------------------------------------------------
// Run drive
// ---------------------------------------------------------------------------

/// Begin a run of the current program, if it is runnable.
fn start_run(ctx: &mut OvenContext) -> Option<CustomState> {
    let (duration_ms, intensity, total_ms) = {
        let program = ctx.current.as_ref().filter(|p| p.is_runnable())?;
        let first = program.steps[0];
        let total: u64 = program
            .steps
            .iter()
            .map(Step::duration_ms)
            .sum::<u64>()
            .saturating_mul(u64::from(program.loops));
        (first.duration_ms(), first.intensity, total)
    };

    ctx.beep(BeepPattern::RunStart);
    ctx.uv_on(intensity);
    ctx.emit(OvenEvent::RunStarted {
        kind: RunKind::Custom,
        duration_ms: total_ms,
        intensity,
    });
    ctx.emit(OvenEvent::StepStarted {
        loop_index: 1,
        step_index: 0,
        duration_ms,
        intensity,
    });
    Some(CustomState::Running {
        cursor: RunCursor {
            step_index: 0,
            loop_index: 1,
            timer: ExposureTimer::start(ctx.now_ms, duration_ms),
        },
    })
}

/// One tick of an active run.  `None` means "leave custom mode entirely"
/// (operator cancel).
fn drive_run(cursor: RunCursor, ctx: &mut OvenContext) -> Option<CustomState> {
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
        info!("custom run cancelled by operator");
        return None;
    }

    if !cursor.timer.expired(ctx.now_ms) {
        return Some(CustomState::Running { cursor });
    }

    // Current step elapsed: advance step, then loop, then finish.
    let (loops, step_count) = match ctx.current.as_ref() {
        Some(p) if p.is_runnable() => (p.loops, p.steps.len()),
        _ => return Some(CustomState::nav_home()),
    };

    let mut step_index = cursor.step_index + 1;
    let mut loop_index = cursor.loop_index;
    if step_index >= step_count {
        step_index = 0;
        loop_index += 1;
    }

    if loop_index > loops {
        ctx.uv_off();
        ctx.beep(BeepPattern::Triple);
        ctx.emit(OvenEvent::RunFinished {
            kind: RunKind::Custom,
        });
        info!("custom run finished ({loops} loops)");
        return Some(CustomState::Done);
    }

    let step = ctx
        .current
        .as_ref()
        .and_then(|p| p.steps.get(step_index).copied())?;
    ctx.uv_on(step.intensity);
    ctx.emit(OvenEvent::StepStarted {
        loop_index,
        step_index,
        duration_ms: step.duration_ms(),
        intensity: step.intensity,
    });
    Some(CustomState::Running {
        cursor: RunCursor {
            step_index,
            loop_index,
            timer: ExposureTimer::start(ctx.now_ms, step.duration_ms()),
        },
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw the screen for `state`.
pub(crate) fn render(state: &CustomState, ctx: &mut OvenContext) {
    match state {
        CustomState::Nav { selected } => {
            ctx.screen(line!("Custom Menu"), screen::menu_item(selected.label()));
        }
        CustomState::Load { index } => {
            let total = ctx.store.len();
            let item = screen::menu_item(ctx.store.get(*index).map_or("?", |p| p.name.as_str()));
            ctx.screen(line!("Load? ({}/{total})", index + 1), item);
        }
        CustomState::Running { cursor } => {
            let (loops, step_count, intensity) = match ctx.current.as_ref() {
                Some(p) if p.is_runnable() => (
                    p.loops,
                    p.steps.len(),
                    p.steps
                        .get(cursor.step_index)
                        .map_or(0, |s| s.intensity),
                ),
                _ => (0, 0, 0),
            };
            let header = line!(
                "L{}/{loops} S{}/{step_count} @{intensity}%",
                cursor.loop_index,
                cursor.step_index + 1
            );
            let remaining = screen::countdown(cursor.timer.remaining_secs(ctx.now_ms));
            ctx.screen(header, line!("Time: {remaining}"));
        }
        CustomState::Done => ctx.screen(line!("DONE"), line!("Press->Menu")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use crate::input::{InputFrame, PressEvent};
    use crate::modes::tests::{idle, press, rotate, test_ctx};
    use crate::program::ProgramName;

    fn long_press(ctx: &mut OvenContext) {
        ctx.input = InputFrame {
            delta: 0,
            press: Some(PressEvent::LongPress),
        };
    }

    fn step(state: CustomState, ctx: &mut OvenContext) -> CustomState {
        match update(state, ctx) {
            Mode::Custom(next) => next,
            other => panic!("left custom mode unexpectedly: {other:?}"),
        }
    }

    fn two_step_program() -> Program {
        // §8 scenario program: 10 s @ 30%, then 500 ms @ 90%, two loops.
        let mut p = Program::draft();
        p.name = ProgramName::try_from("P-01").unwrap();
        p.loops = 2;
        p.steps = vec![
            Step {
                unit: TimeUnit::MinSec,
                value: 10,
                intensity: 30,
            },
            Step {
                unit: TimeUnit::SecMs,
                value: 500,
                intensity: 90,
            },
        ];
        p
    }

    #[test]
    fn nav_cycles_all_three_items() {
        let mut ctx = test_ctx();
        rotate(&mut ctx, 1);
        let s = step(CustomState::nav_home(), &mut ctx);
        assert_eq!(
            s,
            CustomState::Nav {
                selected: CustomItem::Create
            }
        );
        rotate(&mut ctx, -2);
        let s = step(s, &mut ctx);
        assert_eq!(
            s,
            CustomState::Nav {
                selected: CustomItem::Run
            },
            "wraps backwards"
        );
    }

    #[test]
    fn nav_long_press_exits_to_main_menu() {
        let mut ctx = test_ctx();
        long_press(&mut ctx);
        assert_eq!(update(CustomState::nav_home(), &mut ctx), Mode::home());
    }

    #[test]
    fn load_with_empty_store_shows_notice() {
        let mut ctx = test_ctx();
        press(&mut ctx);
        let s = step(CustomState::nav_home(), &mut ctx);
        assert_eq!(
            s,
            CustomState::Nav {
                selected: CustomItem::Load
            }
        );
        assert!(ctx.active_notice().is_some());
    }

    #[test]
    fn load_flow_copies_selection_into_current() {
        let mut ctx = test_ctx();
        ctx.store.upsert(two_step_program());
        press(&mut ctx);
        let s = step(CustomState::nav_home(), &mut ctx);
        assert_eq!(s, CustomState::Load { index: 0 });
        assert_eq!(ctx.commands.line1.as_str(), "Load? (1/1)");

        press(&mut ctx);
        let s = step(s, &mut ctx);
        assert_eq!(s, CustomState::nav_home());
        let current = ctx.current.as_ref().expect("current program set");
        assert_eq!(current.name.as_str(), "P-01");

        // Mutating the working copy must not touch the stored entry.
        ctx.current.as_mut().unwrap().loops = 77;
        assert_eq!(ctx.store.get(0).unwrap().loops, 2);
    }

    #[test]
    fn load_selector_wraps_over_store() {
        let mut ctx = test_ctx();
        let mut second = two_step_program();
        second.name = ProgramName::try_from("P-02").unwrap();
        ctx.store.upsert(two_step_program());
        ctx.store.upsert(second);

        rotate(&mut ctx, -1);
        let s = step(CustomState::Load { index: 0 }, &mut ctx);
        assert_eq!(s, CustomState::Load { index: 1 }, "wraps to last entry");
        rotate(&mut ctx, 1);
        let s = step(s, &mut ctx);
        assert_eq!(s, CustomState::Load { index: 0 });
    }

    #[test]
    fn load_long_press_backs_out_without_selecting() {
        let mut ctx = test_ctx();
        ctx.store.upsert(two_step_program());
        long_press(&mut ctx);
        let s = step(CustomState::Load { index: 0 }, &mut ctx);
        assert_eq!(s, CustomState::nav_home());
        assert!(ctx.current.is_none());
    }

    #[test]
    fn run_without_program_shows_notice() {
        let mut ctx = test_ctx();
        rotate(&mut ctx, -1); // Load -> Run
        let s = step(CustomState::nav_home(), &mut ctx);
        press(&mut ctx);
        let s = step(s, &mut ctx);
        assert_eq!(
            s,
            CustomState::Nav {
                selected: CustomItem::Run
            }
        );
        assert!(ctx.active_notice().is_some());
        assert_eq!(ctx.commands.uv_duty, 0);
    }

    #[test]
    fn run_walks_loops_times_steps_in_order() {
        // §8: durations [10 s, 0.5 s, 10 s, 0.5 s], intensities [30,90,30,90].
        let mut ctx = test_ctx();
        ctx.current = Some(two_step_program());
        rotate(&mut ctx, -1);
        let s = step(CustomState::nav_home(), &mut ctx);
        press(&mut ctx);
        ctx.now_ms = 0;
        let s = step(s, &mut ctx);
        let expect_cursor = |s: &CustomState| match s {
            CustomState::Running { cursor } => *cursor,
            other => panic!("expected Running, got {other:?}"),
        };

        let c = expect_cursor(&s);
        assert_eq!((c.loop_index, c.step_index), (1, 0));
        assert_eq!(c.timer.duration_ms(), 10_000);
        assert_eq!(ctx.commands.uv_duty, 30);
        assert_eq!(ctx.commands.line1.as_str(), "L1/2 S1/2 @30%");

        // Step 1 of loop 1 expires → step 2 (500 ms @ 90%).
        idle(&mut ctx);
        ctx.now_ms = 10_000;
        let s = step(s, &mut ctx);
        let c = expect_cursor(&s);
        assert_eq!((c.loop_index, c.step_index), (1, 1));
        assert_eq!(c.timer.duration_ms(), 500);
        assert_eq!(ctx.commands.uv_duty, 90);

        // Loop 1 ends → loop 2 step 1.
        ctx.now_ms = 10_500;
        let s = step(s, &mut ctx);
        let c = expect_cursor(&s);
        assert_eq!((c.loop_index, c.step_index), (2, 0));
        assert_eq!(ctx.commands.uv_duty, 30);

        ctx.now_ms = 20_500;
        let s = step(s, &mut ctx);
        let c = expect_cursor(&s);
        assert_eq!((c.loop_index, c.step_index), (2, 1));
        assert_eq!(ctx.commands.uv_duty, 90);

        // Fourth expiry finishes the program.
        ctx.now_ms = 21_000;
        let s = step(s, &mut ctx);
        assert_eq!(s, CustomState::Done);
        assert_eq!(ctx.commands.uv_duty, 0);
        assert_eq!(ctx.commands.beep, Some(BeepPattern::Triple));
    }

    #[test]
    fn run_long_press_cancels_and_destroys_cursor() {
        let mut ctx = test_ctx();
        ctx.current = Some(two_step_program());
        let running = CustomState::Running {
            cursor: RunCursor {
                step_index: 0,
                loop_index: 1,
                timer: ExposureTimer::start(0, 10_000),
            },
        };
        ctx.uv_on(30);
        long_press(&mut ctx);
        assert_eq!(update(running, &mut ctx), Mode::home());
        assert_eq!(ctx.commands.uv_duty, 0);
    }

    #[test]
    fn done_acknowledges_back_to_main_menu() {
        let mut ctx = test_ctx();
        press(&mut ctx);
        assert_eq!(update(CustomState::Done, &mut ctx), Mode::home());
    }
}
