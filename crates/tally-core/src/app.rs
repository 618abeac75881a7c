//! Application controller: single owner of the backend binding, the
//! authoritative snapshot, the route table, and the history log.
//!
//! Every entry point returns the ordered [`HostAction`] list the shell
//! must execute; the controller itself never touches the DOM or the
//! real browser history.

use crate::battery::{BenchmarkResult, ChecksReport, run_benchmarks, run_checks};
use crate::binding::BackendBinding;
use crate::clock::MonotonicClock;
use crate::history::HistoryLog;
use crate::lifecycle::{CurrentView, ViewAction, ViewKind, plan_activation};
use crate::markup;
use crate::route::{ResolvedRoute, RouteTable};
use crate::snapshot::{StateSnapshot, restore_into};
use crate::widget::{
    CounterOp, DisplayModel, IDLE_STATUS, STATUS_REVERT_DELAY_MS, UPDATING_CLEAR_DELAY_MS,
    WidgetCore,
};

/// Persistent status line shown while the backend is unusable.
pub const DEGRADED_STATUS: &str = "Backend load failed - operations disabled";

/// Deployment configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Optional base-path prefix the app is served under, stripped
    /// from incoming locations and prepended to outgoing ones.
    pub base_path: Option<String>,
}

/// Side effects the hosting shell executes in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    /// Swap the content container's markup.
    SetContent { html: String },
    /// Install the counter widget's click + keydown listeners.
    MountCounterWidget,
    /// Remove the counter widget's keydown listener.
    TeardownCounterWidget,
    /// Install the test view's run-button listeners.
    MountTestView,
    /// `history.pushState(snapshot, '', url)`.
    PushHistory {
        url: String,
        snapshot: Option<StateSnapshot>,
    },
    /// `history.replaceState(snapshot, '', url)`.
    ReplaceHistory {
        url: String,
        snapshot: StateSnapshot,
    },
    /// Toggle the `active` class on nav links matching `path`.
    SetNavActive { path: String },
    /// Re-render the counter display after a mutation.
    SetDisplay(DisplayModel),
    /// Update the status line; `revert_after_ms` schedules the revert
    /// to the idle message (None = persistent, e.g. degraded mode).
    SetStatus {
        text: String,
        revert_after_ms: Option<u32>,
    },
    /// Add the transient `updating` class, cleared after the delay.
    MarkUpdating { clear_after_ms: u32 },
}

/// The single application controller instance.
#[derive(Debug)]
pub struct AppCore {
    binding: BackendBinding,
    routes: RouteTable,
    history: HistoryLog,
    current_view: CurrentView,
    widget: Option<WidgetCore>,
    /// Fallback snapshot for reads while the backend is unavailable.
    cached: StateSnapshot,
}

impl AppCore {
    /// Build the controller with the standard route table. The initial
    /// location seeds the history log's first entry.
    #[must_use]
    pub fn new(config: AppConfig, initial_location_path: &str) -> Self {
        let mut routes = RouteTable::new(config.base_path);
        routes.register("/", ViewKind::Counter);
        routes.register("/counter", ViewKind::Counter);
        routes.register("/test", ViewKind::Test);
        routes.register("*", ViewKind::NotFound);

        let initial_path = routes.strip_base(initial_location_path).to_owned();
        Self {
            binding: BackendBinding::new(),
            routes,
            history: HistoryLog::new(&initial_path),
            current_view: CurrentView::None,
            widget: None,
            cached: StateSnapshot::default(),
        }
    }

    /// Report the outcome of the asynchronous module load. Idempotent;
    /// a failure is terminal for the session.
    pub fn report_backend_load(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.binding.initialize(),
            Err(reason) => self.binding.fail(reason),
        }
    }

    /// Startup sequence, run exactly once after the load report:
    /// restore any snapshot carried by the current history entry, then
    /// perform the initial dispatch — in that order, so the restored
    /// state is visible to whichever view activates first.
    pub fn startup(&mut self, entry_snapshot: Option<StateSnapshot>) -> Vec<HostAction> {
        if let Some(snapshot) = entry_snapshot {
            self.cached = snapshot;
            self.history.replace_snapshot(snapshot);
            if let Ok(engine) = self.binding.handle() {
                restore_into(engine, snapshot);
            }
        }
        let path = self.history.current().path.clone();
        self.dispatch(&path)
    }

    /// Explicit in-page navigation: push a history entry carrying the
    /// current snapshot, then dispatch.
    pub fn navigate(&mut self, path: &str) -> Vec<HostAction> {
        let snapshot = self.current_state();
        let stripped = self.routes.strip_base(path).to_owned();
        self.history.push(&stripped, Some(snapshot));

        let mut actions = vec![HostAction::PushHistory {
            url: self.routes.with_base(&stripped),
            snapshot: Some(snapshot),
        }];
        actions.extend(self.dispatch(&stripped));
        actions
    }

    /// History traversal (popstate): realign the log to the reported
    /// entry, adopt its snapshot, then dispatch.
    pub fn handle_traversal(
        &mut self,
        location_path: &str,
        entry_snapshot: Option<StateSnapshot>,
    ) -> Vec<HostAction> {
        let stripped = self.routes.strip_base(location_path).to_owned();
        self.history.align_to(&stripped, entry_snapshot);
        if let Some(snapshot) = entry_snapshot {
            self.cached = snapshot;
        }
        self.dispatch(&stripped)
    }

    /// Resolve a location and activate the matching view. An
    /// unhandled path without a wildcard is logged and ignored.
    pub fn dispatch(&mut self, location_path: &str) -> Vec<HostAction> {
        match self.routes.resolve(location_path) {
            Ok(resolved) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %resolved.path, view = ?resolved.view, "dispatching route");
                self.activate(&resolved)
            }
            Err(_unhandled) => Vec::new(),
        }
    }

    /// One mutating counter operation from the live widget.
    pub fn perform(&mut self, op: CounterOp, clock: &dyn MonotonicClock) -> Vec<HostAction> {
        if !self.binding.is_ready() {
            return vec![HostAction::SetStatus {
                text: DEGRADED_STATUS.to_owned(),
                revert_after_ms: None,
            }];
        }
        let Some(widget) = self.widget.as_mut() else {
            return Vec::new();
        };
        let Ok(engine) = self.binding.handle() else {
            return Vec::new();
        };

        let report = widget.perform(engine, op, clock);
        self.cached = report.snapshot;
        self.history.replace_snapshot(report.snapshot);

        vec![
            HostAction::MarkUpdating {
                clear_after_ms: UPDATING_CLEAR_DELAY_MS,
            },
            HostAction::SetDisplay(report.display),
            HostAction::SetStatus {
                text: report.status,
                revert_after_ms: Some(STATUS_REVERT_DELAY_MS),
            },
            HostAction::ReplaceHistory {
                url: self.routes.with_base(&self.history.current().path),
                snapshot: report.snapshot,
            },
        ]
    }

    /// Live snapshot when the backend is up, cached snapshot otherwise.
    #[must_use]
    pub fn current_state(&self) -> StateSnapshot {
        match self.binding.engine() {
            Ok(engine) => StateSnapshot::capture(engine),
            Err(_) => self.cached,
        }
    }

    #[must_use]
    pub const fn current_view(&self) -> CurrentView {
        self.current_view
    }

    #[must_use]
    pub const fn backend_ready(&self) -> bool {
        self.binding.is_ready()
    }

    pub fn run_checks(&mut self) -> ChecksReport {
        run_checks(&mut self.binding)
    }

    pub fn run_benchmarks(&mut self, clock: &dyn MonotonicClock) -> Vec<BenchmarkResult> {
        run_benchmarks(&mut self.binding, clock)
    }

    fn activate(&mut self, resolved: &ResolvedRoute) -> Vec<HostAction> {
        let transition = plan_activation(self.current_view, resolved.view);
        if transition.skipped() {
            // Nav link highlighting still follows the resolved path.
            return vec![HostAction::SetNavActive {
                path: resolved.path.clone(),
            }];
        }

        let mut actions = Vec::with_capacity(transition.actions.len());
        for action in &transition.actions {
            match action {
                ViewAction::PersistOutgoingSnapshot => {
                    let snapshot = self.current_state();
                    self.history.replace_snapshot(snapshot);
                    actions.push(HostAction::ReplaceHistory {
                        url: self.routes.with_base(&self.history.current().path),
                        snapshot,
                    });
                }
                ViewAction::TeardownCounterWidget => {
                    if let Some(widget) = self.widget.as_mut()
                        && widget.teardown()
                    {
                        actions.push(HostAction::TeardownCounterWidget);
                    }
                    self.widget = None;
                }
                ViewAction::RenderMarkup(kind) => {
                    actions.push(HostAction::SetContent {
                        html: self.render_view(*kind, &resolved.path),
                    });
                }
                ViewAction::MountCounterWidget => {
                    if let Some(widget) = self.widget.as_mut()
                        && widget.register_keyboard()
                    {
                        actions.push(HostAction::MountCounterWidget);
                    }
                    // Document title tracks the counter from first render.
                    actions.push(HostAction::SetDisplay(DisplayModel::for_snapshot(
                        self.current_state(),
                    )));
                }
                ViewAction::MountTestView => {
                    actions.push(HostAction::MountTestView);
                }
                ViewAction::UpdateNavLinks => {
                    actions.push(HostAction::SetNavActive {
                        path: resolved.path.clone(),
                    });
                }
            }
        }

        self.current_view = transition.to;
        actions
    }

    fn render_view(&mut self, kind: ViewKind, path: &str) -> String {
        match kind {
            ViewKind::Counter => {
                // Construct the widget first so the restoration
                // protocol has run before the markup reads state.
                // Replay only when the engine has diverged from the
                // entry's snapshot: startup and mutations leave them
                // in sync, and replaying on a synced engine would
                // spend reset/add operations on state already there.
                let restore = self.history.current().snapshot.filter(|snapshot| {
                    self.binding
                        .engine()
                        .map_or(true, |engine| StateSnapshot::capture(engine) != *snapshot)
                });
                let mut widget = WidgetCore::new(restore);
                if let Ok(engine) = self.binding.handle() {
                    widget.attach(engine);
                } else if let Some(snapshot) = restore {
                    self.cached = snapshot;
                }
                self.widget = Some(widget);

                let snapshot = self.current_state();
                self.cached = snapshot;
                let status = if self.binding.is_ready() {
                    IDLE_STATUS
                } else {
                    DEGRADED_STATUS
                };
                markup::render_counter(&DisplayModel::for_snapshot(snapshot), status)
            }
            ViewKind::Test => markup::render_test(),
            ViewKind::NotFound => markup::render_not_found(path),
        }
    }
}
