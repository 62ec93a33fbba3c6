//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[start/stop]──▶ RUNNING ──[start/stop]──▶ WAITING_FOR_REASON
//!    ▲                                                     │
//!    └───────────────────[reason selected]─────────────────┘
//! ```

use super::context::{FsmContext, RunRecord};
use super::{PressState, StateDescriptor};
use crate::events::LifecycleEvent;
use log::info;

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; PressState::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: PressState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_event: idle_event,
        },
        // Index 1: Running
        StateDescriptor {
            id: PressState::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_event: running_event,
        },
        // Index 2: WaitingForReason
        StateDescriptor {
            id: PressState::WaitingForReason,
            name: "WaitingForReason",
            on_enter: Some(waiting_enter),
            on_exit: None,
            on_event: waiting_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(_ctx: &mut FsmContext) {
    info!("IDLE: press ready");
}

fn idle_event(_ctx: &mut FsmContext, event: LifecycleEvent) -> Option<PressState> {
    match event {
        LifecycleEvent::StartStopPressed => Some(PressState::Running),
        LifecycleEvent::ReasonSelected(_) => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut FsmContext) {
    ctx.run = RunRecord {
        started_at_ms: Some(ctx.now_ms),
        stopped_at_ms: None,
    };
    ctx.selected_reason = None;
    info!("RUNNING: press started at {} ms", ctx.now_ms);
}

fn running_exit(ctx: &mut FsmContext) {
    ctx.run.stopped_at_ms = Some(ctx.now_ms);
}

fn running_event(_ctx: &mut FsmContext, event: LifecycleEvent) -> Option<PressState> {
    match event {
        LifecycleEvent::StartStopPressed => Some(PressState::WaitingForReason),
        LifecycleEvent::ReasonSelected(_) => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAITING_FOR_REASON
// ═══════════════════════════════════════════════════════════════════════════

fn waiting_enter(ctx: &mut FsmContext) {
    info!(
        "WAITING_FOR_REASON: press stopped after {}s, awaiting reason",
        ctx.run.runtime_secs().unwrap_or(0)
    );
}

fn waiting_event(ctx: &mut FsmContext, event: LifecycleEvent) -> Option<PressState> {
    match event {
        LifecycleEvent::ReasonSelected(reason) => {
            ctx.selected_reason = Some(reason);
            Some(PressState::Idle)
        }
        LifecycleEvent::StartStopPressed => None,
    }
}
