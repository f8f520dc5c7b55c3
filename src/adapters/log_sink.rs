//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { online } => {
                info!("START | online={}", online);
            }
            AppEvent::LinkUp => info!("LINK  | up"),
            AppEvent::LinkDown => warn!("LINK  | down"),
            AppEvent::ConnectFailed => warn!("LINK  | connect failed, retrying next cycle"),
            AppEvent::ClockSynced(synced) => {
                info!("CLOCK | {}", if *synced { "synchronised" } else { "unsynchronised" });
            }
            AppEvent::Transition { sensor, asserted } => {
                info!("INPUT | {} -> {}", sensor.name(), if *asserted { "asserted" } else { "released" });
            }
            AppEvent::Delivered => info!("NOTIFY| delivered"),
            AppEvent::Queued => info!("NOTIFY| queued"),
            AppEvent::MessageLost => error!("NOTIFY| message lost"),
            AppEvent::Flushed { delivered, requeued } => {
                info!("NOTIFY| flush delivered={} requeued={}", delivered, requeued);
            }
            AppEvent::StatusRequested => info!("CMD   | status"),
            AppEvent::PollSkipped(e) => warn!("CMD   | poll skipped: {}", e),
        }
    }
}
