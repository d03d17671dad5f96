//! Nested mode state machines.
//!
//! The operator interface is one top-level machine with a nested sub-machine
//! per mode:
//!
//! ```text
//!  MAIN MENU ──[press: Simple]──▶ SIMPLE  (Idle → SetTimeUnit → SetTime →
//!      ▲                                   SetIntensity → Running → Done)
//!      │
//!      ├──[press: Custom]──▶ CUSTOM MENU  (Nav ⇄ Load | Running → Done)
//!      │                         │
//!      │                   [press: Create]
//!      │                         ▼
//!      └───────────────── CUSTOM CREATE   (8-state authoring wizard)
//!
//!  Lid opens mid-run ──▶ forced back to MAIN MENU (see safety.rs)
//! ```
//!
//! Every sub-state is an enum variant carrying its own data — a running
//! exposure owns its timer, a menu owns its selection — so invalid
//! combinations (a load flow and a run cursor both "active") cannot be
//! represented.  Exactly one nested transition is evaluated per tick; each
//! handler consumes the tick's [`OvenContext`] input frame and returns the
//! next top-level mode.

pub mod context;
pub mod create;
pub mod custom;
pub mod simple;

use context::OvenContext;
use create::CreateWizard;
use custom::CustomState;
use simple::SimpleState;

use crate::line;
use crate::modes::context::BeepPattern;
use crate::screen;

// ---------------------------------------------------------------------------
// Main menu selector
// ---------------------------------------------------------------------------

/// The two top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuItem {
    Simple,
    Custom,
}

impl MainMenuItem {
    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "Simple Mode",
            Self::Custom => "Custom Mode",
        }
    }

    /// Two-item selector: any rotation flips to the other entry.
    pub fn toggled(self) -> Self {
        match self {
            Self::Simple => Self::Custom,
            Self::Custom => Self::Simple,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level mode
// ---------------------------------------------------------------------------

/// The active top-level mode with its nested sub-state.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    MainMenu { selected: MainMenuItem },
    Simple(SimpleState),
    Custom(CustomState),
    Create(CreateWizard),
}

impl Mode {
    /// Boot / safe-baseline mode.
    pub fn home() -> Self {
        Self::MainMenu {
            selected: MainMenuItem::Simple,
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::MainMenu { .. } => ModeKind::MainMenu,
            Self::Simple(_) => ModeKind::Simple,
            Self::Custom(_) => ModeKind::Custom,
            Self::Create(_) => ModeKind::Create,
        }
    }
}

/// Data-free mode discriminant for events and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    MainMenu,
    Simple,
    Custom,
    Create,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the top-level mode and advances exactly one nested sub-state
/// transition per tick.
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self { mode: Mode::home() }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    /// True while UV exposure is in progress — the lid monitor's trigger
    /// condition.
    pub fn run_active(&self) -> bool {
        matches!(
            self.mode,
            Mode::Simple(SimpleState::Running { .. }) | Mode::Custom(CustomState::Running { .. })
        )
    }

    /// A finished run is blinking for acknowledgement.
    pub fn run_done(&self) -> bool {
        matches!(
            self.mode,
            Mode::Simple(SimpleState::Done) | Mode::Custom(CustomState::Done)
        )
    }

    /// Advance one tick.  The lid preemption check happens *before* this is
    /// called — see [`crate::app::service::OvenService`].
    pub fn tick(&mut self, ctx: &mut OvenContext) {
        let mode = core::mem::replace(&mut self.mode, Mode::home());
        self.mode = match mode {
            Mode::MainMenu { selected } => update_main_menu(selected, ctx),
            Mode::Simple(state) => simple::update(state, ctx),
            Mode::Custom(state) => custom::update(state, ctx),
            Mode::Create(wizard) => create::update(wizard, ctx),
        };
    }

    /// Safety preemption: drop whatever was in flight and return to the main
    /// menu.  Any run cursor or wizard draft dies with its enum variant.
    pub fn force_home(&mut self, ctx: &mut OvenContext) {
        self.mode = Mode::home();
        render_main_menu(MainMenuItem::Simple, ctx);
    }
}

// ---------------------------------------------------------------------------
// Main menu
// ---------------------------------------------------------------------------

fn update_main_menu(mut selected: MainMenuItem, ctx: &mut OvenContext) -> Mode {
    if ctx.input.delta != 0 {
        selected = selected.toggled();
    }

    if ctx.input.short_press() {
        if ctx.lid_open {
            ctx.beep(BeepPattern::Warn);
            ctx.notify(line!("!! CLOSE LID !!"), line!(""), ctx.config.notice_dwell_ms);
        } else {
            ctx.beep(BeepPattern::Confirm);
            return match selected {
                MainMenuItem::Simple => {
                    let next = Mode::Simple(SimpleState::Idle);
                    simple::render(&SimpleState::Idle, ctx);
                    next
                }
                MainMenuItem::Custom => {
                    let state = CustomState::nav_home();
                    custom::render(&state, ctx);
                    Mode::Custom(state)
                }
            };
        }
    }

    render_main_menu(selected, ctx);
    Mode::MainMenu { selected }
}

pub(crate) fn render_main_menu(selected: MainMenuItem, ctx: &mut OvenContext) {
    ctx.screen(line!("Main Menu"), screen::menu_item(selected.label()));
}
