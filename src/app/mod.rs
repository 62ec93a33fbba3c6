//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the orchestration rules for the press station:
//! the lifecycle FSM fan-out, remote command decoding, and the structured
//! events the core emits.  All interaction with the network happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
