//! Observable counter state and the history restoration protocol.

use serde::{Deserialize, Serialize};

use crate::engine::CounterEngine;

/// Full observable state of the counter, as persisted into navigation
/// history entries. Round-trips losslessly through JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub value: i32,
    #[serde(rename = "totalOperations")]
    pub total_operations: i32,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(value: i32, total_operations: i32) -> Self {
        Self {
            value,
            total_operations,
        }
    }

    /// Read the current snapshot off a live engine.
    #[must_use]
    pub const fn capture(engine: &CounterEngine) -> Self {
        Self {
            value: engine.get_counter(),
            total_operations: engine.get_total_operations(),
        }
    }
}

/// Reconstruct snapshot state on a backend that exposes no direct
/// assignment.
///
/// Protocol: `reset()`; if the value is nonzero, `add(value)`; then
/// no-op `add(0)` calls until the op count reaches the snapshot's
/// `total_operations` — the reset call already spent one unit of the
/// budget. When the target is already met or smaller than the current
/// count, the fill loop never runs: restoration can only move the op
/// count forward, since the backend exposes no op-count decrement.
pub fn restore_into(engine: &mut CounterEngine, snapshot: StateSnapshot) {
    engine.reset();
    if snapshot.value != 0 {
        engine.add(snapshot.value);
    }
    while engine.get_total_operations() < snapshot.total_operations {
        engine.add(0);
    }
}
