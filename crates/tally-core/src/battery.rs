//! Fixed batteries of correctness checks and timing benchmarks run
//! against the backend binding.
//!
//! Every check resets the engine first so the battery is
//! order-independent and repeatable. A failure in one entry never
//! aborts the rest: each entry carries its own outcome.

use crate::binding::BackendBinding;
use crate::clock::MonotonicClock;
use crate::engine::CounterEngine;

/// Outcome of a single named correctness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail,
    /// The check could not run at all; rendered distinctly from Fail.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub outcome: CheckOutcome,
}

/// All check results plus the aggregate pass count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksReport {
    pub results: Vec<CheckResult>,
    pub passed: usize,
}

impl ChecksReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Aggregate summary line, e.g. `3/4 tests passed`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{}/{} tests passed", self.passed, self.total())
    }
}

/// Outcome of a single named timing benchmark.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchOutcome {
    /// Wall-clock duration in milliseconds.
    ElapsedMs(f64),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub name: &'static str,
    pub outcome: BenchOutcome,
}

type CheckFn = fn(&mut CounterEngine) -> bool;

const CHECKS: &[(&str, CheckFn)] = &[
    ("Basic Counter Operations", check_basic_operations),
    ("Math Functions", check_square),
    ("Boolean Functions", check_parity_and_sign),
    ("Fibonacci Calculation", check_fibonacci),
];

fn check_basic_operations(engine: &mut CounterEngine) -> bool {
    engine.reset();
    let initial = engine.get_counter();
    engine.increment();
    initial == 0 && engine.get_counter() == 1
}

fn check_square(engine: &mut CounterEngine) -> bool {
    engine.reset();
    engine.add(5);
    engine.get_square() == 25
}

fn check_parity_and_sign(engine: &mut CounterEngine) -> bool {
    engine.reset();
    engine.add(4);
    engine.is_even() && engine.is_positive()
}

fn check_fibonacci(engine: &mut CounterEngine) -> bool {
    engine.reset();
    engine.add(7);
    engine.fibonacci() == 13
}

/// Run the full check battery. An unavailable backend yields an
/// `Error` outcome per entry instead of aborting.
#[must_use]
pub fn run_checks(binding: &mut BackendBinding) -> ChecksReport {
    let mut results = Vec::with_capacity(CHECKS.len());
    let mut passed = 0;

    for (name, check) in CHECKS {
        let outcome = match binding.handle() {
            Ok(engine) => {
                if check(engine) {
                    passed += 1;
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Fail
                }
            }
            Err(err) => CheckOutcome::Error(err.to_string()),
        };
        results.push(CheckResult { name, outcome });
    }

    ChecksReport { results, passed }
}

type BenchFn = fn(&mut CounterEngine);

const BENCHMARKS: &[(&str, BenchFn)] = &[
    ("Counter Increment (1000x)", bench_increment),
    ("Fibonacci Calculation (n=20)", bench_fibonacci),
    ("Math Operations (100x)", bench_math),
];

fn bench_increment(engine: &mut CounterEngine) {
    engine.reset();
    for _ in 0..1_000 {
        engine.increment();
    }
}

fn bench_fibonacci(engine: &mut CounterEngine) {
    engine.reset();
    engine.add(20);
    let _ = engine.fibonacci();
}

fn bench_math(engine: &mut CounterEngine) {
    engine.reset();
    for i in 0..100 {
        engine.add(i);
        let _ = engine.get_square();
        let _ = engine.is_even();
    }
}

/// Run the full benchmark battery, timing each entry with the host
/// clock. Setup work (resets, seeding adds) is timed together with the
/// measured loop, matching the displayed numbers users compare across
/// runs.
#[must_use]
pub fn run_benchmarks(
    binding: &mut BackendBinding,
    clock: &dyn MonotonicClock,
) -> Vec<BenchmarkResult> {
    BENCHMARKS
        .iter()
        .map(|(name, bench)| {
            let outcome = match binding.handle() {
                Ok(engine) => {
                    let started_ms = clock.now_ms();
                    bench(engine);
                    BenchOutcome::ElapsedMs(clock.now_ms() - started_ms)
                }
                Err(err) => BenchOutcome::Error(err.to_string()),
            };
            BenchmarkResult { name, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn ready_binding() -> BackendBinding {
        let mut binding = BackendBinding::new();
        binding.initialize();
        binding
    }

    #[test]
    fn all_checks_pass_on_a_healthy_backend() {
        let mut binding = ready_binding();
        let report = run_checks(&mut binding);
        assert_eq!(report.passed, 4);
        assert_eq!(report.total(), 4);
        assert!(
            report
                .results
                .iter()
                .all(|r| r.outcome == CheckOutcome::Pass)
        );
        assert_eq!(report.summary(), "4/4 tests passed");
    }

    #[test]
    fn checks_are_order_independent_and_repeatable() {
        let mut binding = ready_binding();
        // Dirty the engine state between runs; every check resets.
        binding.handle().unwrap().add(999);
        let first = run_checks(&mut binding);
        binding.handle().unwrap().multiply(-3);
        let second = run_checks(&mut binding);
        assert_eq!(first, second);
    }

    #[test]
    fn unavailable_backend_yields_error_per_check_without_aborting() {
        let mut binding = BackendBinding::new();
        binding.fail("fetch failed");
        let report = run_checks(&mut binding);
        assert_eq!(report.passed, 0);
        assert_eq!(report.total(), 4);
        for result in &report.results {
            assert!(matches!(result.outcome, CheckOutcome::Error(_)));
        }
    }

    #[test]
    fn benchmarks_report_elapsed_from_the_injected_clock() {
        let mut binding = ready_binding();
        let clock = ManualClock::starting_at(0.0);
        let results = run_benchmarks(&mut binding, &clock);
        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(matches!(result.outcome, BenchOutcome::ElapsedMs(ms) if ms >= 0.0));
        }
    }

    #[test]
    fn benchmark_errors_do_not_abort_the_battery() {
        let mut binding = BackendBinding::new();
        let clock = ManualClock::default();
        let results = run_benchmarks(&mut binding, &clock);
        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(matches!(result.outcome, BenchOutcome::Error(_)));
        }
    }
}
