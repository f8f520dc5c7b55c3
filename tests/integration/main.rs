//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that drives a [`Monitor`] through whole
//! main-loop cycles against mock adapters.  Everything runs on the host
//! with no radio, flash or GPIO.
//!
//! [`Monitor`]: shopwatch::app::service::Monitor

#![cfg(not(target_os = "espidf"))]

mod command_flow_tests;
mod mock_hw;
mod sim_adapter_tests;
