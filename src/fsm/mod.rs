//! Function-pointer finite state machine for the press lifecycle.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                      │
//! │  ┌──────────────────┬──────────┬──────────┬────────────────────┐ │
//! │  │ PressState       │ on_enter │ on_exit  │ on_event           │ │
//! │  ├──────────────────┼──────────┼──────────┼────────────────────┤ │
//! │  │ Idle             │ fn(ctx)  │ -        │ fn(ctx,ev)->Option │ │
//! │  │ Running          │ fn(ctx)  │ fn(ctx)  │ fn(ctx,ev)->Option │ │
//! │  │ WaitingForReason │ fn(ctx)  │ -        │ fn(ctx,ev)->Option │ │
//! │  └──────────────────┴──────────┴──────────┴────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is event-driven rather than tick-driven: each
//! [`Fsm::dispatch`] hands one [`LifecycleEvent`] to the current state's
//! `on_event`.  If it returns `Some(next)` the engine runs `on_exit` for
//! the current state, moves the pointer, then runs `on_enter` for the next.
//! Events with no matching row are discarded.
//!
//! The only legal edges are the cycle
//! `Idle → Running → WaitingForReason → Idle`.

pub mod context;
pub mod states;

use context::FsmContext;
use log::{debug, info};

use crate::events::LifecycleEvent;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// The press lifecycle.  Exactly one instance lives inside [`Fsm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PressState {
    Idle = 0,
    Running = 1,
    WaitingForReason = 2,
}

impl PressState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a table index back to `PressState`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::WaitingForReason,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    /// Canonical label used on the status channel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::WaitingForReason => "WAITING_FOR_REASON",
        }
    }

    /// The one state this state may move to.
    pub fn successor(self) -> Self {
        match self {
            Self::Idle => Self::Running,
            Self::Running => Self::WaitingForReason,
            Self::WaitingForReason => Self::Idle,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to discard.
pub type StateEventFn = fn(&mut FsmContext, LifecycleEvent) -> Option<PressState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: PressState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

/// A completed state change, returned to the orchestrator so it can run
/// the side effects for that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PressState,
    pub to: PressState,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The press state machine.  The sole writer of [`PressState`].
pub struct Fsm {
    /// Fixed-size table indexed by `PressState as usize`.
    table: [StateDescriptor; PressState::COUNT],
    current: usize,
    transitions: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; PressState::COUNT], initial: PressState) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Offer one event to the current state.
    ///
    /// Returns the transition taken, or `None` when the event does not apply
    /// to the current state (the event is dropped, never queued).
    pub fn dispatch(&mut self, event: LifecycleEvent, ctx: &mut FsmContext) -> Option<Transition> {
        let from = self.current_state();
        let Some(next) = (self.table[self.current].on_event)(ctx, event) else {
            debug!("FSM: {:?} ignored in {}", event, self.table[self.current].name);
            return None;
        };
        debug_assert_eq!(next, from.successor(), "state table produced an illegal edge");
        self.transition(next, ctx);
        Some(Transition { from, to: next })
    }

    pub fn current_state(&self) -> PressState {
        PressState::from_index(self.current)
    }

    /// Number of transitions taken since construction.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: PressState, ctx: &mut FsmContext) {
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
