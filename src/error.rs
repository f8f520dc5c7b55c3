//! Unified error types for the shop monitor.
//!
//! Every port error converts into [`Error`], whose variants mirror the
//! recovery classes of the main loop.  None of them is fatal: the loop
//! always returns to the top of the next cycle.  All variants are `Copy`
//! so they can be logged and carried in events without allocation.

use core::fmt;

use crate::app::ports::{ConnectivityError, StoreError, TransportError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The network link is down. Recovered by retrying on the next cycle;
    /// meanwhile the device runs in queue-only mode.
    NetworkUnavailable,
    /// The sink refused or failed a delivery. Recovered by queueing.
    /// Carries the HTTP status when one was received.
    DeliveryFailed(Option<u16>),
    /// The persistent store could not be opened, read or written.
    /// The affected operation is abandoned.
    StorageUnavailable,
    /// The wall clock is not synchronised; timestamps use the sentinel.
    ClockUnsynced,
    /// A command-poll response could not be interpreted; the poll is skipped.
    MalformedInboundResponse,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnavailable => write!(f, "network unavailable"),
            Self::DeliveryFailed(Some(status)) => write!(f, "delivery failed (HTTP {status})"),
            Self::DeliveryFailed(None) => write!(f, "delivery failed (no response)"),
            Self::StorageUnavailable => write!(f, "storage unavailable"),
            Self::ClockUnsynced => write!(f, "clock not synchronised"),
            Self::MalformedInboundResponse => write!(f, "malformed inbound response"),
        }
    }
}

impl From<ConnectivityError> for Error {
    fn from(_: ConnectivityError) -> Self {
        Self::NetworkUnavailable
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NotConnected => Self::NetworkUnavailable,
            TransportError::Io | TransportError::Timeout => Self::DeliveryFailed(None),
        }
    }
}

impl From<StoreError> for Error {
    fn from(_: StoreError) -> Self {
        Self::StorageUnavailable
    }
}

impl From<serde_json::Error> for Error {
    fn from(_: serde_json::Error) -> Self {
        Self::MalformedInboundResponse
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
