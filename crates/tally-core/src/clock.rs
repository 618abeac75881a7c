//! Monotonic clock injection point.
//!
//! Timing is a host concern (`performance.now()` in the browser, a
//! monotonic instant natively), so core code that measures elapsed
//! time takes the clock as a parameter.

/// Millisecond-resolution monotonic clock.
pub trait MonotonicClock {
    fn now_ms(&self) -> f64;
}

/// Hand-advanced clock for deterministic tests and replay harnesses.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: core::cell::Cell<f64>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(now_ms: f64) -> Self {
        let clock = Self::default();
        clock.now_ms.set(now_ms);
        clock
    }

    pub fn advance_ms(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Format an elapsed duration the way the status line shows it:
/// milliseconds with 3 decimal places.
#[must_use]
pub fn format_elapsed_ms(elapsed_ms: f64) -> String {
    format!("{elapsed_ms:.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::starting_at(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance_ms(16.5);
        assert_eq!(clock.now_ms(), 116.5);
    }

    #[test]
    fn elapsed_label_has_three_decimals() {
        assert_eq!(format_elapsed_ms(0.1234), "0.123");
        assert_eq!(format_elapsed_ms(2.0), "2.000");
        assert_eq!(format_elapsed_ms(12.3456), "12.346");
    }
}
