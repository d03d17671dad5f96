//! Application service — the hexagonal core.
//!
//! [`OvenService`] owns the mode controller, input aggregator, lid monitor,
//! indicator policy, and the shared context.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  ControlsPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │         OvenService          │
//!     PanelPort ◀── │  Modes · Lid · Input · Px    │ ◀─▶ ProgramStorePort
//!                   └──────────────────────────────┘
//! ```
//!
//! Per-tick order is fixed (and load-bearing): input sampling → lid
//! preemption → mode dispatch → indicator → command application.  The lid
//! check can cancel a run and skip mode dispatch in the same tick; nothing
//! in the cycle blocks.

use log::{info, warn};

use crate::app::events::{CancelReason, OvenEvent};
use crate::app::ports::{ControlsPort, EventSink, PanelPort, ProgramStorePort};
use crate::config::OvenConfig;
use crate::indicator::{IndicatorPolicy, IndicatorState, PIXELS_NORMAL};
use crate::input::InputAggregator;
use crate::line;
use crate::modes::context::{BeepPattern, OvenContext, PanelCommands};
use crate::modes::{Mode, ModeController, render_main_menu, MainMenuItem};
use crate::program::{Program, ProgramStore};
use crate::safety::{LidMonitor, LidVerdict};

/// The application service orchestrates all control logic.
pub struct OvenService {
    ctx: OvenContext,
    controller: ModeController,
    input: InputAggregator,
    lid: LidMonitor,
    indicator: IndicatorPolicy,
}

impl OvenService {
    /// Construct the service around a pre-loaded program library.
    ///
    /// `initial_position` seeds the encoder delta baseline; `lid_open` seeds
    /// the monitor so the boot screen can warn before the first tick.
    pub fn new(
        config: OvenConfig,
        store: ProgramStore,
        initial_position: i32,
        lid_open: bool,
    ) -> Self {
        let input = InputAggregator::new(&config, initial_position);
        let indicator = IndicatorPolicy::new(config.blink_interval_ms);
        let mut ctx = OvenContext::new(config, store);
        ctx.lid_open = lid_open;
        Self {
            ctx,
            controller: ModeController::new(),
            input,
            lid: LidMonitor::new(lid_open),
            indicator,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Render the boot screen and announce startup.  Call once before the
    /// first [`tick`](Self::tick).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        if self.lid.is_open() {
            self.ctx.screen(line!("!! CLOSE LID !!"), line!("To begin"));
        } else {
            render_main_menu(MainMenuItem::Simple, &mut self.ctx);
        }
        self.ctx.commands.pixels = PIXELS_NORMAL;
        sink.emit(&OvenEvent::Started {
            lid_open: self.lid.is_open(),
        });
        info!(
            "oven service started ({} stored programs, lid {})",
            self.ctx.store.len(),
            if self.lid.is_open() { "open" } else { "closed" }
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`ControlsPort`] and
    /// [`PanelPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl ControlsPort + PanelPort),
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = now_ms;

        // 1. Sample operator input.
        let position = hw.read_rotation();
        let pressed = hw.is_pressed();
        let lid_open = hw.lid_is_open();
        self.ctx.input = self.input.poll(position, pressed, now_ms);

        let prev_kind = self.controller.kind();

        // 2. Lid preemption — strictly precedes every mode transition.
        let verdict = self.lid.sample(lid_open, self.controller.run_active());
        self.ctx.lid_open = self.lid.is_open();

        match verdict {
            LidVerdict::PreemptRun => {
                self.ctx.uv_off();
                self.ctx.beep(BeepPattern::Double);
                self.ctx.emit(OvenEvent::RunCanceled {
                    reason: CancelReason::LidOpened,
                });
                self.ctx.notify(
                    line!("!! LID OPENED !!"),
                    line!("RUN CANCELED"),
                    self.ctx.config.cancel_dwell_ms,
                );
                self.controller.force_home(&mut self.ctx);
                // Mode dispatch is skipped for the rest of this tick.
            }
            LidVerdict::Proceed => {
                // 3. Mode dispatch — muted while a notice is on screen.
                if self.ctx.active_notice().is_none() {
                    self.controller.tick(&mut self.ctx);
                }
            }
        }

        let new_kind = self.controller.kind();
        if new_kind != prev_kind {
            self.ctx.emit(OvenEvent::ModeChanged {
                from: prev_kind,
                to: new_kind,
            });
        }

        // 4. Indicator regime: done-blink beats alarm-blink beats normal.
        let regime = if self.controller.run_done() {
            IndicatorState::DoneBlink
        } else if self.ctx.lid_open {
            IndicatorState::AlarmBlink
        } else {
            IndicatorState::Normal
        };
        self.ctx.commands.pixels = self.indicator.tick(regime, now_ms);

        // 5. Apply commands and drain events.
        self.apply(hw);
        for event in self.ctx.events.drain(..) {
            sink.emit(&event);
        }
    }

    /// Flush a save committed this tick to persistent storage.
    ///
    /// Failure is logged and reported but never fatal: the in-memory library
    /// stays intact and the operator may simply save again.
    pub fn persist_if_requested(
        &mut self,
        storage: &mut impl ProgramStorePort,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.ctx.save_requested {
            return false;
        }
        self.ctx.save_requested = false;
        match storage.save_programs(self.ctx.store.programs()) {
            Ok(()) => {
                info!("program library saved ({} entries)", self.ctx.store.len());
                true
            }
            Err(e) => {
                warn!("program save failed: {e} — library kept in memory");
                sink.emit(&OvenEvent::SaveFailed { error: e });
                false
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The active top-level mode with its nested sub-state.
    pub fn mode(&self) -> &Mode {
        self.controller.mode()
    }

    /// True while UV exposure is in progress.
    pub fn run_active(&self) -> bool {
        self.controller.run_active()
    }

    /// Latched lid state.
    pub fn lid_open(&self) -> bool {
        self.lid.is_open()
    }

    /// The program library.
    pub fn store(&self) -> &ProgramStore {
        &self.ctx.store
    }

    /// The working-slot program, if any.
    pub fn current_program(&self) -> Option<&Program> {
        self.ctx.current.as_ref()
    }

    /// This tick's panel command state (display lines, pixels, UV duty).
    pub fn commands(&self) -> &PanelCommands {
        &self.ctx.commands
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the command blackboard into port calls.
    fn apply(&mut self, hw: &mut impl PanelPort) {
        // Display: a live notice overrides the mode screen.
        let (line1, line2) = match self.ctx.active_notice() {
            Some(n) => (n.line1.clone(), n.line2.clone()),
            None => (
                self.ctx.commands.line1.clone(),
                self.ctx.commands.line2.clone(),
            ),
        };
        hw.display(&line1, &line2);

        hw.set_indicator(self.ctx.commands.pixels);

        // UV is gated on the lid at the point of application too — the
        // preemption path already zeroed the duty, this keeps a single
        // tick's interleaving from ever energising UV under an open lid.
        if self.ctx.commands.uv_duty > 0 && !self.ctx.lid_open {
            hw.set_uv_duty(f32::from(self.ctx.commands.uv_duty) / 100.0);
        } else {
            hw.uv_off();
        }

        if let Some(pattern) = self.ctx.commands.beep.take() {
            hw.beep(pattern);
        }
    }
}
