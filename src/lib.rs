//! Press-monitoring station firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module; without the feature
//! the adapters fall back to host simulations.

#![deny(unused_must_use)]

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod status;

pub mod adapters;
pub mod drivers;
