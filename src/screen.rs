//! Display text building for the two-line panel.
//!
//! The panel shows two lines of at most 21 characters; everything longer is
//! clipped, never wrapped.  Formatting is heap-free (`heapless::String`) so
//! the per-tick countdown redraw does not allocate.

use crate::config::TimeUnit;

/// Maximum characters per display line.
pub const LINE_CAPACITY: usize = 21;

/// One display line, clipped to the panel width.
pub type Line = heapless::String<LINE_CAPACITY>;

/// Build a clipped line from format arguments.  Prefer the [`line!`] macro
/// at call sites.
pub fn clipped(args: core::fmt::Arguments) -> Line {
    let mut full: heapless::String<64> = heapless::String::new();
    // Overflow past the scratch capacity just truncates, which is the
    // behaviour we want anyway.
    let _ = core::fmt::Write::write_fmt(&mut full, args);
    let mut out = Line::new();
    for c in full.chars().take(LINE_CAPACITY) {
        let _ = out.push(c);
    }
    out
}

/// Clipped line formatting, `format!`-style.
#[macro_export]
macro_rules! line {
    ($($arg:tt)*) => {
        $crate::screen::clipped(core::format_args!($($arg)*))
    };
}

/// A menu row with the selection chevron: `"> Simple Mode"`.
pub fn menu_item(item: &str) -> Line {
    line!("> {item}")
}

/// Render a set-value in its unit's display form.
pub fn unit_value(unit: TimeUnit, value: u32) -> Line {
    match unit {
        TimeUnit::MinSec => {
            let (m, s) = (value / 60, value % 60);
            line!("{m:02}:{s:02}")
        }
        TimeUnit::HrMin => {
            let (h, m) = (value / 60, value % 60);
            line!("{h:02}:{m:02}")
        }
        TimeUnit::SecMs => {
            let (s, ms) = (value / 1000, value % 1000);
            line!("{s:02}:{ms:03}ms")
        }
    }
}

/// Countdown rendering, always `MM:SS`.
pub fn countdown(secs: u64) -> Line {
    let (m, s) = (secs / 60, secs % 60);
    line!("{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_clipped_to_panel_width() {
        let l = line!("this line is definitely longer than the panel");
        assert_eq!(l.len(), LINE_CAPACITY);
        assert_eq!(l.as_str(), "this line is definite");
    }

    #[test]
    fn menu_item_gets_chevron() {
        assert_eq!(menu_item("Simple Mode").as_str(), "> Simple Mode");
    }

    #[test]
    fn unit_value_formats_per_unit() {
        assert_eq!(unit_value(TimeUnit::MinSec, 300).as_str(), "05:00");
        assert_eq!(unit_value(TimeUnit::MinSec, 61).as_str(), "01:01");
        assert_eq!(unit_value(TimeUnit::HrMin, 90).as_str(), "01:30");
        assert_eq!(unit_value(TimeUnit::SecMs, 1500).as_str(), "01:500ms");
        assert_eq!(unit_value(TimeUnit::SecMs, 500).as_str(), "00:500ms");
    }

    #[test]
    fn countdown_is_minutes_seconds() {
        assert_eq!(countdown(300).as_str(), "05:00");
        assert_eq!(countdown(0).as_str(), "00:00");
        assert_eq!(countdown(3601).as_str(), "60:01");
    }
}
