//! Polled, debounced push buttons.
//!
//! ## Hardware
//!
//! Active-low momentary switches with internal pull-ups.  The main loop
//! samples every button once per cycle; there are no interrupts.
//!
//! ## Debounce
//!
//! Any change of the raw level restarts the button's timer.  The raw level
//! becomes the stable level once it has held for at least the debounce
//! window, and a stable high→low edge yields exactly one press.
//!
//! | Button       | Polled when            | Event                      |
//! |--------------|------------------------|----------------------------|
//! | Start/stop   | always                 | `StartStopPressed`         |
//! | Maintenance  | `WaitingForReason` only| `ReasonSelected(..)`       |
//! | Quality      | `WaitingForReason` only| `ReasonSelected(..)`       |
//! | Material     | `WaitingForReason` only| `ReasonSelected(..)`       |
//! | Tool change  | `WaitingForReason` only| `ReasonSelected(..)`       |

use embedded_hal::digital::InputPin;
use log::info;

use crate::events::{DowntimeReason, LifecycleEvent};
use crate::fsm::PressState;

/// Per-button debounce bookkeeping.  Levels are `true` when pressed (low).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceState {
    last_raw_pressed: bool,
    last_change_ms: u64,
    stable_pressed: bool,
}

impl DebounceState {
    pub const fn new() -> Self {
        Self {
            last_raw_pressed: false,
            last_change_ms: 0,
            stable_pressed: false,
        }
    }

    /// Feed one raw sample.  Returns `true` on a debounced press edge.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64, window_ms: u64) -> bool {
        if raw_pressed != self.last_raw_pressed {
            self.last_change_ms = now_ms;
            self.last_raw_pressed = raw_pressed;
        }

        if now_ms.saturating_sub(self.last_change_ms) >= window_ms
            && raw_pressed != self.stable_pressed
        {
            self.stable_pressed = raw_pressed;
            return raw_pressed;
        }
        false
    }

    pub fn is_pressed(&self) -> bool {
        self.stable_pressed
    }
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DebouncedButton<P> {
    pin: P,
    state: DebounceState,
    window_ms: u64,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P, window_ms: u64) -> Self {
        Self {
            pin,
            state: DebounceState::new(),
            window_ms,
        }
    }

    /// Sample the pin.  A failed read counts as "no change".
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.pin.is_low() {
            Ok(pressed) => self.state.update(pressed, now_ms, self.window_ms),
            Err(_) => false,
        }
    }
}

/// The five station buttons.
pub struct ButtonBank<P> {
    start_stop: DebouncedButton<P>,
    reasons: [(DowntimeReason, DebouncedButton<P>); 4],
}

impl<P: InputPin> ButtonBank<P> {
    pub fn new(
        start_stop: P,
        maintenance: P,
        quality: P,
        material: P,
        tool_change: P,
        window_ms: u64,
    ) -> Self {
        Self {
            start_stop: DebouncedButton::new(start_stop, window_ms),
            reasons: [
                (
                    DowntimeReason::MaintenanceRequired,
                    DebouncedButton::new(maintenance, window_ms),
                ),
                (DowntimeReason::QualityIssue, DebouncedButton::new(quality, window_ms)),
                (DowntimeReason::MaterialIssue, DebouncedButton::new(material, window_ms)),
                (DowntimeReason::ToolChange, DebouncedButton::new(tool_change, window_ms)),
            ],
        }
    }

    /// Poll one cycle and return at most one event.
    ///
    /// Reason buttons are not sampled at all outside `WaitingForReason`.
    /// When several presses land in the same cycle a reason wins over
    /// start/stop, and earlier reasons win over later ones.
    pub fn poll(&mut self, now_ms: u64, state: PressState) -> Option<LifecycleEvent> {
        let mut event = None;

        if state == PressState::WaitingForReason {
            for (reason, button) in &mut self.reasons {
                if button.poll(now_ms) && event.is_none() {
                    info!("{reason} button pressed");
                    event = Some(LifecycleEvent::ReasonSelected(*reason));
                }
            }
        }

        if self.start_stop.poll(now_ms) {
            info!("start/stop button pressed");
            event = event.or(Some(LifecycleEvent::StartStopPressed));
        }

        event
    }
}
