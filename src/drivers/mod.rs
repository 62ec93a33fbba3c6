//! Station front-panel drivers: buttons and status LEDs.

pub mod button;
pub mod status_led;
