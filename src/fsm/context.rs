//! Mutable context threaded through every FSM handler.
//!
//! `FsmContext` carries the current timestamp (set by the orchestrator
//! before each dispatch), the record of the current run, and the reason
//! selected when leaving `WaitingForReason`.

use crate::events::DowntimeReason;

// ---------------------------------------------------------------------------
// Run record
// ---------------------------------------------------------------------------

/// Start and stop timestamps of the most recent run, in ms since boot.
/// Replaced on every entry into `Running`; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunRecord {
    pub started_at_ms: Option<u64>,
    pub stopped_at_ms: Option<u64>,
}

impl RunRecord {
    /// Elapsed runtime in whole seconds, once both edges are recorded.
    /// A stop timestamp earlier than the start clamps to zero.
    pub fn runtime_secs(&self) -> Option<u64> {
        match (self.started_at_ms, self.stopped_at_ms) {
            (Some(start), Some(stop)) => Some(stop.saturating_sub(start) / 1000),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FsmContext {
    /// Monotonic time of the event being dispatched.
    pub now_ms: u64,
    pub run: RunRecord,
    /// Set by the `WaitingForReason` handler on the edge back to `Idle`.
    pub selected_reason: Option<DowntimeReason>,
}

impl FsmContext {
    pub fn new() -> Self {
        Self::default()
    }
}
