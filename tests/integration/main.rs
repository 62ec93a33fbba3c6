//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no network or
//! hardware required.

mod lifecycle_tests;
mod mock_hw;
mod remote_command_tests;
