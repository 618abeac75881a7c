//! Counter view controller core: input mapping, mutation reports, and
//! listener bookkeeping.
//!
//! The host owns the actual DOM listeners and timers; this module owns
//! the rules — which key maps to which operation, what a mutation must
//! update, and the idempotence of keyboard registration and teardown.

use crate::clock::{MonotonicClock, format_elapsed_ms};
use crate::engine::CounterEngine;
use crate::snapshot::{StateSnapshot, restore_into};

/// Idle status line shown when no operation timing is pending.
pub const IDLE_STATUS: &str = "Running on WebAssembly";
/// Delay before transient operation timing reverts to [`IDLE_STATUS`].
pub const STATUS_REVERT_DELAY_MS: u32 = 2_000;
/// Delay before the transient `updating` visual cue is removed.
pub const UPDATING_CLEAR_DELAY_MS: u32 = 200;

const COLOR_POSITIVE: &str = "#4CAF50";
const COLOR_NEUTRAL: &str = "#333";
const COLOR_NEGATIVE: &str = "#f44336";

/// Mutating operations the widget can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOp {
    Increment,
    Decrement,
    Reset,
}

/// Map a DOM key name (plus modifier state) to a counter operation.
///
/// `r` with ctrl or meta held is deliberately ignored — reserved for
/// browser shortcuts.
#[must_use]
pub fn key_to_op(key: &str, ctrl: bool, meta: bool) -> Option<CounterOp> {
    match key {
        "ArrowUp" | "+" => Some(CounterOp::Increment),
        "ArrowDown" | "-" => Some(CounterOp::Decrement),
        "r" | "R" => {
            if ctrl || meta {
                None
            } else {
                Some(CounterOp::Reset)
            }
        }
        _ => None,
    }
}

/// Everything the display needs after a render: value, op count, and
/// the color/size rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    pub value: i32,
    pub total_operations: i32,
    pub color: &'static str,
    pub font_size: &'static str,
    pub title: String,
}

impl DisplayModel {
    #[must_use]
    pub fn for_snapshot(snapshot: StateSnapshot) -> Self {
        let color = if snapshot.value > 0 {
            COLOR_POSITIVE
        } else if snapshot.value == 0 {
            COLOR_NEUTRAL
        } else {
            COLOR_NEGATIVE
        };
        let font_size = if snapshot.value.unsigned_abs() > 999 {
            "3rem"
        } else {
            "4rem"
        };
        Self {
            value: snapshot.value,
            total_operations: snapshot.total_operations,
            color,
            font_size,
            title: format!("Counter: {} | Tally Widget", snapshot.value),
        }
    }
}

/// Outcome of one mutating operation, ready for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    pub op: CounterOp,
    /// Fresh state, to be propagated to the application controller so
    /// it can replace the current history entry.
    pub snapshot: StateSnapshot,
    pub display: DisplayModel,
    /// Transient status line, e.g. `Last op: 0.012ms`.
    pub status: String,
}

/// Counter widget controller state.
///
/// Keyboard registration is idempotent, and teardown releases the
/// listener exactly once no matter how often it is called.
#[derive(Debug, Default)]
pub struct WidgetCore {
    restore: Option<StateSnapshot>,
    keyboard_registered: bool,
}

impl WidgetCore {
    #[must_use]
    pub fn new(restore: Option<StateSnapshot>) -> Self {
        Self {
            restore,
            keyboard_registered: false,
        }
    }

    /// Run the state restoration protocol once, at construction time.
    /// Later calls are no-ops even if a snapshot was supplied.
    pub fn attach(&mut self, engine: &mut CounterEngine) {
        if let Some(snapshot) = self.restore.take() {
            restore_into(engine, snapshot);
        }
    }

    /// Returns true when the host should install the keydown listener.
    /// Attaching twice is forbidden; this is the guard.
    pub fn register_keyboard(&mut self) -> bool {
        if self.keyboard_registered {
            return false;
        }
        self.keyboard_registered = true;
        true
    }

    #[must_use]
    pub const fn keyboard_registered(&self) -> bool {
        self.keyboard_registered
    }

    /// Returns true when the host should remove the keydown listener.
    /// Safe to call repeatedly; only the first call releases.
    pub fn teardown(&mut self) -> bool {
        if !self.keyboard_registered {
            return false;
        }
        self.keyboard_registered = false;
        true
    }

    /// Apply one mutating operation, timing it with the host clock.
    pub fn perform(
        &mut self,
        engine: &mut CounterEngine,
        op: CounterOp,
        clock: &dyn MonotonicClock,
    ) -> MutationReport {
        let started_ms = clock.now_ms();
        match op {
            CounterOp::Increment => {
                engine.increment();
            }
            CounterOp::Decrement => {
                engine.decrement();
            }
            CounterOp::Reset => {
                engine.reset();
            }
        }
        let elapsed = format_elapsed_ms(clock.now_ms() - started_ms);

        let snapshot = StateSnapshot::capture(engine);
        MutationReport {
            op,
            snapshot,
            display: DisplayModel::for_snapshot(snapshot),
            status: format!("Last op: {elapsed}ms"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn keyboard_map_covers_arrows_signs_and_reset() {
        assert_eq!(key_to_op("ArrowUp", false, false), Some(CounterOp::Increment));
        assert_eq!(key_to_op("+", false, false), Some(CounterOp::Increment));
        assert_eq!(key_to_op("ArrowDown", false, false), Some(CounterOp::Decrement));
        assert_eq!(key_to_op("-", false, false), Some(CounterOp::Decrement));
        assert_eq!(key_to_op("r", false, false), Some(CounterOp::Reset));
        assert_eq!(key_to_op("R", false, false), Some(CounterOp::Reset));
        assert_eq!(key_to_op("x", false, false), None);
    }

    #[test]
    fn modifier_held_reset_is_reserved_for_the_browser() {
        assert_eq!(key_to_op("r", true, false), None);
        assert_eq!(key_to_op("R", false, true), None);
        // Modifiers do not block the other bindings.
        assert_eq!(key_to_op("+", true, false), Some(CounterOp::Increment));
    }

    #[test]
    fn keyboard_registration_is_idempotent() {
        let mut widget = WidgetCore::new(None);
        assert!(widget.register_keyboard());
        assert!(!widget.register_keyboard());
        assert!(widget.keyboard_registered());
    }

    #[test]
    fn teardown_releases_exactly_once() {
        let mut widget = WidgetCore::new(None);
        widget.register_keyboard();
        assert!(widget.teardown());
        assert!(!widget.teardown());
        assert!(!widget.teardown());
    }

    #[test]
    fn attach_restores_once() {
        let mut engine = CounterEngine::new();
        let mut widget = WidgetCore::new(Some(StateSnapshot::new(5, 7)));
        widget.attach(&mut engine);
        assert_eq!(engine.get_counter(), 5);
        assert_eq!(engine.get_total_operations(), 7);

        // Re-attach must not replay the protocol.
        widget.attach(&mut engine);
        assert_eq!(engine.get_total_operations(), 7);
    }

    #[test]
    fn mutation_report_carries_timing_and_display_rules() {
        let mut engine = CounterEngine::new();
        let mut widget = WidgetCore::new(None);
        let clock = ManualClock::starting_at(10.0);

        let report = widget.perform(&mut engine, CounterOp::Increment, &clock);
        assert_eq!(report.snapshot, StateSnapshot::new(1, 1));
        assert_eq!(report.display.color, COLOR_POSITIVE);
        assert_eq!(report.display.font_size, "4rem");
        assert_eq!(report.status, "Last op: 0.000ms");
        assert_eq!(report.display.title, "Counter: 1 | Tally Widget");
    }

    #[test]
    fn display_color_tracks_sign() {
        assert_eq!(
            DisplayModel::for_snapshot(StateSnapshot::new(0, 0)).color,
            COLOR_NEUTRAL
        );
        assert_eq!(
            DisplayModel::for_snapshot(StateSnapshot::new(-3, 1)).color,
            COLOR_NEGATIVE
        );
    }

    #[test]
    fn display_font_shrinks_past_three_digits() {
        assert_eq!(
            DisplayModel::for_snapshot(StateSnapshot::new(999, 0)).font_size,
            "4rem"
        );
        assert_eq!(
            DisplayModel::for_snapshot(StateSnapshot::new(1_000, 0)).font_size,
            "3rem"
        );
        assert_eq!(
            DisplayModel::for_snapshot(StateSnapshot::new(-1_000, 0)).font_size,
            "3rem"
        );
    }
}
