//! View lifecycle: tagged view variants and the activation planner.
//!
//! View activation is modeled as an explicit transition function that
//! returns the ordered side effects the host must execute, instead of
//! ad hoc flag checks inside callbacks. The "skip if already active"
//! and teardown-before-render rules are structural here.

use serde::Serialize;

/// A view the router can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Counter,
    Test,
    NotFound,
}

/// Which view controller is presently live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentView {
    #[default]
    None,
    Counter,
    Test,
    NotFound,
}

impl From<ViewKind> for CurrentView {
    fn from(kind: ViewKind) -> Self {
        match kind {
            ViewKind::Counter => Self::Counter,
            ViewKind::Test => Self::Test,
            ViewKind::NotFound => Self::NotFound,
        }
    }
}

/// Ordered side effects the host executes for one view activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAction {
    /// Replace the current history entry with the outgoing counter
    /// state before anything is torn down.
    PersistOutgoingSnapshot,
    /// Release the counter widget's listeners.
    TeardownCounterWidget,
    /// Swap the content container markup for the new view.
    RenderMarkup(ViewKind),
    /// Construct the counter view controller over the fresh markup.
    MountCounterWidget,
    /// Construct the test/benchmark view controller.
    MountTestView,
    /// Toggle the `active` class on nav links matching the new path.
    UpdateNavLinks,
}

/// One planned activation: previous view, new view, and the action list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTransition {
    pub from: CurrentView,
    pub to: CurrentView,
    /// Empty when the requested view was already current.
    pub actions: Vec<ViewAction>,
}

impl ViewTransition {
    /// True when activation was suppressed because the view is already
    /// live: no DOM reconstruction, no duplicate listeners.
    #[must_use]
    pub fn skipped(&self) -> bool {
        self.actions.is_empty() && self.from == self.to
    }
}

/// Plan the activation of `requested` given the presently live view.
#[must_use]
pub fn plan_activation(current: CurrentView, requested: ViewKind) -> ViewTransition {
    let to = CurrentView::from(requested);
    if current == to {
        return ViewTransition {
            from: current,
            to,
            actions: Vec::new(),
        };
    }

    let mut actions = Vec::new();
    if current == CurrentView::Counter {
        actions.push(ViewAction::PersistOutgoingSnapshot);
        actions.push(ViewAction::TeardownCounterWidget);
    }
    actions.push(ViewAction::RenderMarkup(requested));
    match requested {
        ViewKind::Counter => actions.push(ViewAction::MountCounterWidget),
        ViewKind::Test => actions.push(ViewAction::MountTestView),
        ViewKind::NotFound => {}
    }
    actions.push(ViewAction::UpdateNavLinks);

    ViewTransition {
        from: current,
        to,
        actions,
    }
}
