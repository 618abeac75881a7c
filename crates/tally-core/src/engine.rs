//! Numeric backend: the hidden `(counter, total_operations)` pair.
//!
//! This is the leaf computational module the rest of the app binds to.
//! All arithmetic is fixed-width `i32` with wrap-on-overflow semantics,
//! matching the storage width of the compiled module artifact.

/// Counter engine over a single hidden `i32` pair.
///
/// Every mutating operation bumps `total_operations` by exactly 1,
/// including `reset` and `add(0)`. Reads and projections never bump it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterEngine {
    counter: i32,
    total_operations: i32,
}

impl CounterEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: 0,
            total_operations: 0,
        }
    }

    #[must_use]
    pub const fn get_counter(&self) -> i32 {
        self.counter
    }

    #[must_use]
    pub const fn get_total_operations(&self) -> i32 {
        self.total_operations
    }

    pub const fn increment(&mut self) -> i32 {
        self.counter = self.counter.wrapping_add(1);
        self.bump_ops();
        self.counter
    }

    pub const fn decrement(&mut self) -> i32 {
        self.counter = self.counter.wrapping_sub(1);
        self.bump_ops();
        self.counter
    }

    pub const fn reset(&mut self) -> i32 {
        self.counter = 0;
        self.bump_ops();
        self.counter
    }

    pub const fn add(&mut self, value: i32) -> i32 {
        self.counter = self.counter.wrapping_add(value);
        self.bump_ops();
        self.counter
    }

    pub const fn multiply(&mut self, value: i32) -> i32 {
        self.counter = self.counter.wrapping_mul(value);
        self.bump_ops();
        self.counter
    }

    /// True for zero and negatives with even magnitude as well.
    #[must_use]
    pub const fn is_even(&self) -> bool {
        self.counter % 2 == 0
    }

    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.counter > 0
    }

    /// Wrapping square at the counter's storage width.
    #[must_use]
    pub const fn get_square(&self) -> i32 {
        self.counter.wrapping_mul(self.counter)
    }

    /// Fibonacci value at index = current counter.
    ///
    /// Iterative from seed `(0, 1)`; for counter <= 1 the counter value
    /// itself is returned, so fib(0)=0, fib(1)=1, fib(7)=13. Additions
    /// wrap at the `i32` boundary for large indices.
    #[must_use]
    pub fn fibonacci(&self) -> i32 {
        if self.counter <= 1 {
            return self.counter;
        }
        let mut a: i32 = 0;
        let mut b: i32 = 1;
        for _ in 2..=self.counter {
            let next = a.wrapping_add(b);
            a = b;
            b = next;
        }
        b
    }

    const fn bump_ops(&mut self) {
        self.total_operations = self.total_operations.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_engine_starts_at_zero_zero() {
        let engine = CounterEngine::new();
        assert_eq!(engine.get_counter(), 0);
        assert_eq!(engine.get_total_operations(), 0);
    }

    #[test]
    fn every_mutator_bumps_ops_by_exactly_one() {
        let mut engine = CounterEngine::new();
        engine.increment();
        engine.decrement();
        engine.reset();
        engine.add(0);
        engine.multiply(3);
        assert_eq!(engine.get_total_operations(), 5);
    }

    #[test]
    fn reads_and_projections_do_not_bump_ops() {
        let mut engine = CounterEngine::new();
        engine.add(4);
        let ops_before = engine.get_total_operations();
        let _ = engine.get_counter();
        let _ = engine.is_even();
        let _ = engine.is_positive();
        let _ = engine.get_square();
        let _ = engine.fibonacci();
        assert_eq!(engine.get_total_operations(), ops_before);
    }

    #[test]
    fn fibonacci_table_for_small_indices() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13];
        for (index, want) in expected.iter().enumerate() {
            let mut engine = CounterEngine::new();
            engine.add(i32::try_from(index).expect("small index"));
            assert_eq!(engine.fibonacci(), *want, "fib at counter {index}");
        }
    }

    #[test]
    fn square_after_reset_add_five_is_twenty_five() {
        let mut engine = CounterEngine::new();
        engine.reset();
        engine.add(5);
        assert_eq!(engine.get_square(), 25);
    }

    #[test]
    fn parity_and_sign_projections() {
        let mut engine = CounterEngine::new();
        engine.reset();
        engine.add(4);
        assert!(engine.is_even() && engine.is_positive());

        engine.reset();
        engine.add(3);
        assert!(!engine.is_even());
        assert!(engine.is_positive());

        engine.reset();
        engine.add(-2);
        assert!(engine.is_even());
        assert!(!engine.is_positive());
    }

    #[test]
    fn counter_wraps_at_i32_boundary() {
        let mut engine = CounterEngine::new();
        engine.add(i32::MAX);
        engine.increment();
        assert_eq!(engine.get_counter(), i32::MIN);

        let mut engine = CounterEngine::new();
        engine.add(i32::MIN);
        engine.decrement();
        assert_eq!(engine.get_counter(), i32::MAX);
    }

    #[test]
    fn square_wraps_instead_of_panicking() {
        let mut engine = CounterEngine::new();
        engine.add(1 << 16);
        // (2^16)^2 == 2^32 wraps to 0 in i32.
        assert_eq!(engine.get_square(), 0);
    }

    proptest! {
        #[test]
        fn op_count_equals_number_of_mutating_calls(ops in prop::collection::vec(0u8..5, 0..64)) {
            let mut engine = CounterEngine::new();
            for op in &ops {
                match op {
                    0 => { engine.increment(); }
                    1 => { engine.decrement(); }
                    2 => { engine.reset(); }
                    3 => { engine.add(0); }
                    _ => { engine.multiply(2); }
                }
            }
            prop_assert_eq!(
                engine.get_total_operations(),
                i32::try_from(ops.len()).unwrap()
            );
        }
    }
}
