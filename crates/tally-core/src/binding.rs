//! Backend binding: initialization guard around the numeric engine.
//!
//! The binding models the asynchronous "instantiate from binary" step
//! at the host boundary. The host performs the actual load and reports
//! the outcome here; everything downstream goes through [`handle`]
//! and degrades to a read-only UI instead of crashing when the load
//! failed.
//!
//! [`handle`]: BackendBinding::handle

use core::fmt;

use crate::engine::CounterEngine;

/// The numeric module could not be loaded, or was never loaded.
///
/// Terminal for the session: no automatic retry. Callers disable
/// operations and surface persistent degraded status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUnavailable {
    reason: String,
}

impl BackendUnavailable {
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for BackendUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend unavailable: {}", self.reason)
    }
}

impl std::error::Error for BackendUnavailable {}

#[derive(Debug, Clone)]
enum BindingState {
    Uninitialized,
    Ready(CounterEngine),
    Failed(String),
}

/// Owns at most one engine instance for the application's lifetime.
#[derive(Debug, Clone)]
pub struct BackendBinding {
    state: BindingState,
}

impl Default for BackendBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendBinding {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BindingState::Uninitialized,
        }
    }

    /// Record a successful module load. Idempotent: a `Ready` binding
    /// keeps its existing engine (and its accumulated op count), and a
    /// `Failed` binding stays failed.
    pub fn initialize(&mut self) {
        if matches!(self.state, BindingState::Uninitialized) {
            self.state = BindingState::Ready(CounterEngine::new());
        }
    }

    /// Record a failed module load. A binding that is already `Ready`
    /// is left untouched.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !matches!(self.state, BindingState::Ready(_)) {
            self.state = BindingState::Failed(reason.into());
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, BindingState::Ready(_))
    }

    /// Mutable access to the live engine.
    pub fn handle(&mut self) -> Result<&mut CounterEngine, BackendUnavailable> {
        match &mut self.state {
            BindingState::Ready(engine) => Ok(engine),
            BindingState::Uninitialized => Err(BackendUnavailable {
                reason: "module not loaded".to_owned(),
            }),
            BindingState::Failed(reason) => Err(BackendUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    /// Shared access to the live engine, for read-only projections.
    pub fn engine(&self) -> Result<&CounterEngine, BackendUnavailable> {
        match &self.state {
            BindingState::Ready(engine) => Ok(engine),
            BindingState::Uninitialized => Err(BackendUnavailable {
                reason: "module not loaded".to_owned(),
            }),
            BindingState::Failed(reason) => Err(BackendUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}
