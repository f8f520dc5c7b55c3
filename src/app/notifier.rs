//! Notification sender.
//!
//! One POST per message to `{api_base}/bot{token}/sendMessage` with body
//! `chat_id=<id>&text=<form-encoded message>`.  Only HTTP 200 counts as
//! delivered; anything else, and every send while offline, lands in the
//! [`Outbox`].  Queued messages are retried only by [`Notifier::flush`].

use log::{error, info, warn};

use crate::config::{RedeliveryPolicy, SystemConfig};
use crate::error::{Error, Result};

use super::events::AppEvent;
use super::form;
use super::outbox::Outbox;
use super::ports::{EventSink, FileStore, SinkTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Not delivered; queued if the store allowed it.
    Failed,
}

pub struct Notifier {
    send_url: String,
    chat_id: heapless::String<24>,
    policy: RedeliveryPolicy,
    outbox: Outbox,
}

impl Notifier {
    pub fn new(cfg: &SystemConfig) -> Self {
        Self {
            send_url: format!("{}/bot{}/sendMessage", cfg.api_base, cfg.bot_token),
            chat_id: cfg.chat_id.clone(),
            policy: cfg.redelivery,
            outbox: Outbox::new(cfg),
        }
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Deliver `message` now if `online`, otherwise (or on failure) queue it.
    pub fn send(
        &self,
        message: &str,
        online: bool,
        http: &mut impl SinkTransport,
        store: &mut impl FileStore,
        sink: &mut impl EventSink,
    ) -> Delivery {
        if !online {
            self.queue(message, store, sink);
            return Delivery::Failed;
        }

        match self.deliver(message, http) {
            Ok(()) => {
                sink.emit(&AppEvent::Delivered);
                Delivery::Delivered
            }
            Err(e) => {
                warn!("Notify: {}, queueing", e);
                self.queue(message, store, sink);
                Delivery::Failed
            }
        }
    }

    /// Drain the outbox and redeliver it according to the configured
    /// [`RedeliveryPolicy`].  Returns the number of lines delivered.
    pub fn flush(
        &self,
        online: bool,
        http: &mut impl SinkTransport,
        store: &mut impl FileStore,
        sink: &mut impl EventSink,
    ) -> usize {
        let lines = match self.outbox.drain_all(online, store) {
            Ok(lines) if lines.is_empty() => return 0,
            Ok(lines) => lines,
            Err(e) => {
                warn!("Notify: outbox not drained: {}", e);
                return 0;
            }
        };

        let (delivered, requeued) = match self.policy {
            RedeliveryPolicy::Batch => self.flush_batch(&lines, http, store, sink),
            RedeliveryPolicy::PerMessage => self.flush_each(&lines, http, store, sink),
        };
        info!("Notify: flush delivered {} line(s), re-queued {}", delivered, requeued);
        sink.emit(&AppEvent::Flushed { delivered, requeued });
        delivered
    }

    /// The whole drain goes out as one message; on failure it comes back
    /// as one entry.
    fn flush_batch(
        &self,
        lines: &[String],
        http: &mut impl SinkTransport,
        store: &mut impl FileStore,
        sink: &mut impl EventSink,
    ) -> (usize, usize) {
        let batch = lines.join("\n");
        match self.deliver(&batch, http) {
            Ok(()) => (lines.len(), 0),
            Err(e) => {
                warn!("Notify: batch of {} line(s) failed: {}", lines.len(), e);
                self.queue(&batch, store, sink);
                (0, lines.len())
            }
        }
    }

    /// One message per line.  After the first failure the rest are queued
    /// untried so order is kept.
    fn flush_each(
        &self,
        lines: &[String],
        http: &mut impl SinkTransport,
        store: &mut impl FileStore,
        sink: &mut impl EventSink,
    ) -> (usize, usize) {
        let mut delivered = 0;
        let mut requeued = 0;
        let mut failed = false;
        for line in lines.iter().filter(|l| !l.is_empty()) {
            if !failed {
                match self.deliver(line, http) {
                    Ok(()) => {
                        delivered += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!("Notify: redelivery failed: {}", e);
                        failed = true;
                    }
                }
            }
            self.queue(line, store, sink);
            requeued += 1;
        }
        (delivered, requeued)
    }

    fn deliver(&self, message: &str, http: &mut impl SinkTransport) -> Result<()> {
        let body = format!("chat_id={}&text={}", self.chat_id, form::encode(message));
        match http.post_form(&self.send_url, &body)? {
            200 => Ok(()),
            status => Err(Error::DeliveryFailed(Some(status))),
        }
    }

    fn queue(&self, message: &str, store: &mut impl FileStore, sink: &mut impl EventSink) {
        match self.outbox.enqueue(store, message) {
            Ok(()) => sink.emit(&AppEvent::Queued),
            Err(e) => {
                error!("Notify: message lost, outbox unavailable: {}", e);
                sink.emit(&AppEvent::MessageLost);
            }
        }
    }
}
