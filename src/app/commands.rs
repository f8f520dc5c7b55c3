//! Inbound commands to the application core.
//!
//! Operators send these as chat messages; the
//! [`CommandPoller`](super::poller::CommandPoller) turns matching text
//! into an [`AppCommand`] and the [`Monitor`](super::service::Monitor)
//! acts on it.

/// Commands that the outside world can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Reply with a status report of every sensor, the link and the time.
    Status,
}

impl AppCommand {
    /// Exact, case-sensitive match.  Surrounding whitespace is significant.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "1" | "status" => Some(Self::Status),
            _ => None,
        }
    }
}
