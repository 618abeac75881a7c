#![forbid(unsafe_code)]

//! WASM frontend for the Tally counter demo.
//!
//! This crate provides [`CounterSpa`], a `wasm-bindgen`-exported struct
//! that wraps the host-agnostic application controller from
//! `tally-core` and executes its action lists against the real DOM,
//! History API, and timers.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::CounterSpa;

// The SPA core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod spa_core;

#[cfg(test)]
mod tests {
    use crate::spa_core::{SpaCore, snapshot_json};
    use pretty_assertions::assert_eq;
    use tally_core::app::HostAction;
    use tally_core::snapshot::StateSnapshot;

    fn booted() -> SpaCore {
        let mut core = SpaCore::new(None, "/");
        core.report_backend_ready();
        core
    }

    fn content_html(actions: &[HostAction]) -> &str {
        actions
            .iter()
            .find_map(|a| match a {
                HostAction::SetContent { html } => Some(html.as_str()),
                _ => None,
            })
            .expect("a SetContent action")
    }

    #[test]
    fn startup_parses_serialized_history_state() {
        let mut core = booted();
        let json = snapshot_json(StateSnapshot::new(5, 7));
        core.startup(Some(&json));
        assert_eq!(core.current_state(), StateSnapshot::new(5, 7));
    }

    #[test]
    fn malformed_history_state_is_ignored() {
        let mut core = booted();
        core.startup(Some("{not json"));
        assert_eq!(core.current_state(), StateSnapshot::default());
    }

    #[test]
    fn keyboard_input_drives_the_counter() {
        let mut core = booted();
        core.startup(None);

        let actions = core.handle_key("ArrowUp", false, false);
        assert!(!actions.is_empty());
        assert_eq!(core.current_state(), StateSnapshot::new(1, 1));

        // Unmapped keys produce nothing, so the shell lets them through.
        assert!(core.handle_key("x", false, false).is_empty());
        // Ctrl+R stays with the browser.
        assert!(core.handle_key("r", true, false).is_empty());
    }

    #[test]
    fn button_ops_by_name() {
        let mut core = booted();
        core.startup(None);
        core.perform_named("increment");
        core.perform_named("increment");
        core.perform_named("decrement");
        assert_eq!(core.current_state(), StateSnapshot::new(1, 3));
        assert!(core.perform_named("nonsense").is_empty());
    }

    #[test]
    fn popstate_round_trip_preserves_state() {
        let mut core = booted();
        core.startup(None);
        core.perform_named("increment");
        let state = snapshot_json(core.current_state());

        core.navigate("/test");
        let actions = core.handle_popstate("/", Some(&state));
        assert_eq!(core.current_state(), StateSnapshot::new(1, 1));
        assert!(content_html(&actions).contains(">1<"));
    }

    #[test]
    fn check_battery_renders_a_full_pass() {
        let mut core = booted();
        core.startup(None);
        let html = core.run_checks_html();
        assert!(html.contains("4/4 tests passed"));
        assert!(html.contains("Fibonacci Calculation"));
        assert!(!html.contains("fail"));
    }

    #[test]
    fn benchmark_battery_renders_all_entries() {
        let mut core = booted();
        core.startup(None);
        let html = core.run_benchmarks_html();
        assert!(html.contains("Counter Increment (1000x)"));
        assert!(html.contains("Fibonacci Calculation (n=20)"));
        assert!(html.contains("Math Operations (100x)"));
    }

    #[test]
    fn degraded_backend_renders_errors_instead_of_results() {
        let mut core = SpaCore::new(None, "/test");
        core.report_backend_failure("instantiation failed");
        core.startup(None);
        let html = core.run_checks_html();
        assert!(html.contains("0/4 tests passed"));
        assert!(html.contains("instantiation failed"));
        // Could-not-run renders as its own state, not as a failure.
        assert!(html.contains(r#"class="test-result error""#));
        assert!(html.contains("&#9888;"));
        assert!(!html.contains(r#"class="test-result fail""#));
    }
}
