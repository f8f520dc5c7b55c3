//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules of the shop monitor: change
//! detection, store-and-forward delivery, link and clock management and
//! command polling.  All interaction with hardware and the network happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod changes;
pub mod clock;
pub mod commands;
pub mod events;
pub mod form;
pub mod link;
pub mod notifier;
pub mod outbox;
pub mod poller;
pub mod ports;
pub mod service;
pub mod state;

#[cfg(test)]
mod test_support;
