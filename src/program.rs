//! Exposure programs and the in-memory program library.
//!
//! A [`Program`] is an ordered list of [`Step`]s repeated `loops` times.
//! The [`ProgramStore`] holds the library loaded from flash at boot; it is
//! rewritten wholesale on every save (no incremental patching).
//!
//! Program identity is the name: saving under an existing name replaces that
//! entry in place, any other name appends.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::config::TimeUnit;

/// Maximum program-name length ("P-NN" plus headroom).
pub const NAME_CAPACITY: usize = 12;

/// A program name — short, fixed-capacity, unique within the store.
pub type ProgramName = String<NAME_CAPACITY>;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One exposure step: a duration in the author's chosen unit plus a UV
/// intensity.  Immutable once appended to a program; the value is clamped
/// in-range for the unit at authoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub unit: TimeUnit,
    pub value: u32,
    /// UV intensity in percent (0–100).
    pub intensity: u8,
}

impl Step {
    /// Absolute step duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.unit.to_millis(self.value)
    }
}

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

/// A named multi-step exposure program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: ProgramName,
    /// Number of times the step sequence repeats (1–99).
    pub loops: u8,
    pub steps: Vec<Step>,
}

impl Program {
    /// Fresh unsaved program staked when the authoring wizard opens.
    pub fn draft() -> Self {
        let mut name = ProgramName::new();
        // "New" always fits the capacity.
        let _ = name.push_str("New");
        Self {
            name,
            loops: 1,
            steps: Vec::new(),
        }
    }

    /// A program needs at least one step before it can run.
    pub fn is_runnable(&self) -> bool {
        !self.steps.is_empty()
    }
}

/// Build a `P-NN` name from its numeric suffix.
pub fn numbered_name(n: u8) -> ProgramName {
    let mut name = ProgramName::new();
    let _ = core::fmt::Write::write_fmt(&mut name, format_args!("P-{n:02}"));
    name
}

/// Parse the numeric suffix back out of a `P-NN` name, if it has one.
pub fn name_number(name: &str) -> Option<u8> {
    name.strip_prefix("P-")?.parse().ok()
}

// ---------------------------------------------------------------------------
// ProgramStore
// ---------------------------------------------------------------------------

/// The in-memory program library.
///
/// Ordered; order is preserved across replace-by-name saves and across
/// persistence round trips.
#[derive(Debug, Default)]
pub struct ProgramStore {
    programs: Vec<Program>,
}

impl ProgramStore {
    pub fn new(programs: Vec<Program>) -> Self {
        Self { programs }
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn get(&self, index: usize) -> Option<&Program> {
        self.programs.get(index)
    }

    /// The full library, for persistence.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Replace-by-name-or-append: if a program with the same name exists it
    /// is overwritten in place (store length unchanged), otherwise the
    /// program is appended.
    pub fn upsert(&mut self, program: Program) {
        match self.programs.iter_mut().find(|p| p.name == program.name) {
            Some(slot) => *slot = program,
            None => self.programs.push(program),
        }
    }

    /// Lowest-numbered `P-NN` (01–99) not already taken, for the authoring
    /// wizard's default name.  Falls back to 99 if the library somehow holds
    /// every number.
    pub fn next_free_number(&self) -> u8 {
        (1..=99u8)
            .find(|&n| !self.programs.iter().any(|p| p.name == numbered_name(n)))
            .unwrap_or(99)
    }
}
