#![forbid(unsafe_code)]

//! Platform-independent SPA core.
//!
//! Wraps [`tally_core::app::AppCore`] with the string-shaped surface the
//! browser shell needs: JSON history state in, JSON history state out,
//! key names instead of typed events, rendered result fragments for the
//! test view. Everything here runs natively, so the whole navigation
//! and input surface is testable without a browser.

use tally_core::app::{AppConfig, AppCore, HostAction};
use tally_core::battery::{BenchOutcome, CheckOutcome};
use tally_core::clock::MonotonicClock;
use tally_core::snapshot::StateSnapshot;
use tally_core::widget::{CounterOp, key_to_op};
use web_time::Instant;

/// Monotonic clock backed by `web_time` (Performance API on wasm32,
/// `std::time::Instant` natively).
#[derive(Debug)]
pub struct WebClock {
    origin: Instant,
}

impl WebClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WebClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for WebClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}

/// The SPA core: controller plus host clock.
#[derive(Debug)]
pub struct SpaCore {
    app: AppCore,
    clock: WebClock,
}

impl SpaCore {
    #[must_use]
    pub fn new(base_path: Option<String>, location_path: &str) -> Self {
        Self {
            app: AppCore::new(AppConfig { base_path }, location_path),
            clock: WebClock::new(),
        }
    }

    /// The numeric engine ships inside this module, so readiness is the
    /// normal load report once instantiation succeeded.
    pub fn report_backend_ready(&mut self) {
        self.app.report_backend_load(Ok(()));
    }

    /// Terminal degradation for this session, reported by the bootstrap
    /// when instantiation failed its self-check.
    pub fn report_backend_failure(&mut self, reason: &str) {
        self.app.report_backend_load(Err(reason.to_owned()));
    }

    #[must_use]
    pub fn backend_ready(&self) -> bool {
        self.app.backend_ready()
    }

    /// One-time startup: restore from the serialized history state (if
    /// any survives a reload), then dispatch the initial location.
    pub fn startup(&mut self, state_json: Option<&str>) -> Vec<HostAction> {
        self.app.startup(parse_state(state_json))
    }

    pub fn navigate(&mut self, path: &str) -> Vec<HostAction> {
        self.app.navigate(path)
    }

    /// Browser-initiated traversal (popstate).
    pub fn handle_popstate(
        &mut self,
        location_path: &str,
        state_json: Option<&str>,
    ) -> Vec<HostAction> {
        self.app
            .handle_traversal(location_path, parse_state(state_json))
    }

    /// Keyboard input by DOM key name. Unmapped keys produce no actions,
    /// which the shell uses to decide whether to preventDefault.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, meta: bool) -> Vec<HostAction> {
        match key_to_op(key, ctrl, meta) {
            Some(op) => self.app.perform(op, &self.clock),
            None => Vec::new(),
        }
    }

    /// Button input by operation name (`increment`, `decrement`, `reset`).
    pub fn perform_named(&mut self, op_name: &str) -> Vec<HostAction> {
        match parse_op(op_name) {
            Some(op) => self.app.perform(op, &self.clock),
            None => Vec::new(),
        }
    }

    /// Run the check battery and render the result fragment for the
    /// `test-results` container.
    pub fn run_checks_html(&mut self) -> String {
        let report = self.app.run_checks();
        let mut html = String::new();
        for result in &report.results {
            match &result.outcome {
                CheckOutcome::Pass => {
                    html.push_str(&format!(
                        "<div class=\"test-result pass\">&#10003; {}</div>",
                        result.name
                    ));
                }
                CheckOutcome::Fail => {
                    html.push_str(&format!(
                        "<div class=\"test-result fail\">&#10007; {}</div>",
                        result.name
                    ));
                }
                CheckOutcome::Error(reason) => {
                    // Could-not-run is a distinct state from a failed
                    // assertion, with its own marker and class.
                    html.push_str(&format!(
                        "<div class=\"test-result error\">&#9888; {}: {}</div>",
                        result.name, reason
                    ));
                }
            }
        }
        html.push_str(&format!(
            "<div class=\"test-summary\">{}</div>",
            report.summary()
        ));
        html
    }

    /// Run the benchmark battery and render the result fragment for the
    /// `benchmark-results` container.
    pub fn run_benchmarks_html(&mut self) -> String {
        let results = self.app.run_benchmarks(&self.clock);
        let mut html = String::new();
        for result in &results {
            match &result.outcome {
                BenchOutcome::ElapsedMs(ms) => {
                    html.push_str(&format!(
                        "<div class=\"benchmark-result\">{}: {ms:.3}ms</div>",
                        result.name
                    ));
                }
                BenchOutcome::Error(reason) => {
                    html.push_str(&format!(
                        "<div class=\"benchmark-result error\">{}: {}</div>",
                        result.name, reason
                    ));
                }
            }
        }
        html
    }

    #[must_use]
    pub fn current_state(&self) -> StateSnapshot {
        self.app.current_state()
    }
}

/// Serialize a snapshot for `history.pushState`/`replaceState` payloads.
#[must_use]
pub fn snapshot_json(snapshot: StateSnapshot) -> String {
    serde_json::to_string(&snapshot).unwrap_or_default()
}

/// Lenient history-state parse: anything that is not a well-formed
/// snapshot object is treated as no state at all.
fn parse_state(state_json: Option<&str>) -> Option<StateSnapshot> {
    serde_json::from_str(state_json?).ok()
}

fn parse_op(name: &str) -> Option<CounterOp> {
    match name {
        "increment" => Some(CounterOp::Increment),
        "decrement" => Some(CounterOp::Decrement),
        "reset" => Some(CounterOp::Reset),
        _ => None,
    }
}
