//! Outbound application events.
//!
//! The [`Monitor`](super::service::Monitor) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the shipped one writes them to the
//! serial log.

use crate::error::Error;
use crate::sensors::SensorId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot sequence finished; carries whether the link came up.
    Started { online: bool },

    /// The link reached `Connected`.
    LinkUp,

    /// The link was lost.
    LinkDown,

    /// A connect cycle exhausted its attempts.
    ConnectFailed,

    /// Wall-clock trust changed.
    ClockSynced(bool),

    /// A stable sensor level changed.
    Transition { sensor: SensorId, asserted: bool },

    /// A message reached the sink.
    Delivered,

    /// A message was written to the outbox.
    Queued,

    /// A message could neither be delivered nor queued.
    MessageLost,

    /// An outbox flush finished.
    Flushed { delivered: usize, requeued: usize },

    /// An operator asked for a status report.
    StatusRequested,

    /// A command poll produced nothing usable.
    PollSkipped(Error),
}
