//! Red/green status LEDs.
//!
//! | State              | Red             | Green           |
//! |--------------------|-----------------|-----------------|
//! | Idle               | on              | off             |
//! | Running            | off             | blinking        |
//! | WaitingForReason   | blinking        | blinking, inverted |
//!
//! Generic over `embedded-hal` output pins so the pattern logic runs on
//! the host with fake pins.

use embedded_hal::digital::{OutputPin, PinState};

use crate::fsm::PressState;

/// Pin levels `(red, green)` for a state at a given blink phase.
pub fn levels(state: PressState, phase: bool) -> (bool, bool) {
    match state {
        PressState::Idle => (true, false),
        PressState::Running => (false, phase),
        PressState::WaitingForReason => (phase, !phase),
    }
}

pub struct StatusLeds<R, G> {
    red: R,
    green: G,
    blink_ms: u64,
    last_toggle_ms: u64,
    phase: bool,
}

impl<R: OutputPin, G: OutputPin> StatusLeds<R, G> {
    pub fn new(red: R, green: G, blink_ms: u64) -> Self {
        Self {
            red,
            green,
            blink_ms,
            last_toggle_ms: 0,
            phase: false,
        }
    }

    /// Advance the blink phase and drive both pins.  Pin errors are ignored.
    pub fn update(&mut self, state: PressState, now_ms: u64) {
        if now_ms.saturating_sub(self.last_toggle_ms) >= self.blink_ms {
            self.phase = !self.phase;
            self.last_toggle_ms = now_ms;
        }
        let (red, green) = levels(state, self.phase);
        self.red.set_state(PinState::from(red)).ok();
        self.green.set_state(PinState::from(green)).ok();
    }
}
