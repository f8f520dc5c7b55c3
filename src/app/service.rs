//! Monitor service: the hexagonal core.
//!
//! [`Monitor`] owns the device state and every domain component.  One call
//! to [`Monitor::tick`] is one cooperative main-loop iteration:
//!
//! ```text
//!  link check ─▶ clock maintenance ─▶ sample ─▶ detect + notify ─▶ poll (due?)
//! ```
//!
//! Nothing runs concurrently with a tick; every port call blocks until it
//! completes.  Time is passed in as `now_ms` (monotonic uptime) so the
//! service is testable with mock adapters and a scripted clock.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │          Monitor          │
//!                 │ Link · Clock · Notifier   │
//!                 │ Outbox · Poller           │
//!                 └──────────────────────────┘
//!                   │      │       │      │
//!            Connectivity Clock SinkTransport FileStore
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::sensors::Debouncer;

use super::changes;
use super::clock::TimestampProvider;
use super::commands::AppCommand;
use super::events::AppEvent;
use super::link::{Link, LinkTransition};
use super::notifier::{Delivery, Notifier};
use super::poller::CommandPoller;
use super::ports::{ClockPort, ConnectivityPort, EventSink, FileStore, SensorPort, SinkTransport};
use super::state::{DeviceState, StatusSnapshot};

/// Text sent every time the link comes up, ahead of any queued backlog.
pub const CONNECTED_MESSAGE: &str = "connected to WiFi";

/// Driven adapters the monitor holds for its whole life.
pub struct Ports<N, H, F, C> {
    pub net: N,
    pub http: H,
    pub store: F,
    pub clock: C,
}

// ───────────────────────────────────────────────────────────────
// Monitor
// ───────────────────────────────────────────────────────────────

pub struct Monitor<N, H, F, C> {
    ports: Ports<N, H, F, C>,
    state: DeviceState,
    link: Link,
    clock: TimestampProvider,
    notifier: Notifier,
    poller: CommandPoller,
    debouncer: Debouncer,
    site_name: heapless::String<32>,
    poll_interval_ms: u64,
    last_poll_ms: u64,
}

impl<N, H, F, C> Monitor<N, H, F, C>
where
    N: ConnectivityPort,
    H: SinkTransport,
    F: FileStore,
    C: ClockPort,
{
    /// Construct the service.  Does **not** touch any port; call
    /// [`start`](Self::start) next.
    pub fn new(config: &SystemConfig, ports: Ports<N, H, F, C>) -> Self {
        Self {
            ports,
            state: DeviceState::new(),
            link: Link::new(config),
            clock: TimestampProvider::new(config),
            notifier: Notifier::new(config),
            poller: CommandPoller::new(config),
            debouncer: Debouncer::new(config.debounce_samples),
            site_name: config.site_name.clone(),
            poll_interval_ms: u64::from(config.command_poll_interval_ms),
            last_poll_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: bring the link up (which flushes the backlog and
    /// syncs the clock), then seed both halves of the snapshot pair from
    /// one sample so boot never reports phantom edges.
    pub fn start(&mut self, now_ms: u64, sensors: &mut impl SensorPort, sink: &mut impl EventSink) {
        self.connectivity_step(now_ms, sink);

        let initial = sensors.sample();
        self.debouncer.seed(initial);
        self.state.seed(initial);

        let online = self.state.is_online();
        sink.emit(&AppEvent::Started { online });
        info!("Monitor started ({})", if online { "online" } else { "offline, queueing" });
    }

    // ── Per-tick orchestration ────────────────────────────────

    pub fn tick(&mut self, now_ms: u64, sensors: &mut impl SensorPort, sink: &mut impl EventSink) {
        // 1. Link
        self.connectivity_step(now_ms, sink);

        // 2. Clock
        let was_synced = self.state.clock_synced;
        self.clock.maintain(now_ms, &mut self.ports.clock, &mut self.state);
        self.report_clock(was_synced, sink);

        // 3. Sample
        let stable = self.debouncer.update(sensors.sample());
        self.state.record_sample(stable);

        // 4. Detect + notify
        self.notify_changes(sink);

        // 5. Poll
        if self.state.is_online() && now_ms.saturating_sub(self.last_poll_ms) >= self.poll_interval_ms {
            self.last_poll_ms = now_ms;
            self.poll_commands(sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::Status => {
                sink.emit(&AppEvent::StatusRequested);
                let report = self.state.status().render(&self.site_name);
                self.send(&report, sink);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn status(&self) -> StatusSnapshot {
        self.state.status()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn poller(&self) -> &CommandPoller {
        &self.poller
    }

    pub fn ports(&self) -> &Ports<N, H, F, C> {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut Ports<N, H, F, C> {
        &mut self.ports
    }

    /// Messages currently waiting in the outbox (0 if unreadable).
    pub fn queued(&self) -> usize {
        self.notifier.outbox().len(&self.ports.store).unwrap_or(0)
    }

    // ── Internal ──────────────────────────────────────────────

    fn connectivity_step(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let was_synced = self.state.clock_synced;
        match self.link.check(&mut self.state, &mut self.ports.net, sink) {
            Some(LinkTransition::Up) => self.on_link_up(now_ms, sink),
            Some(LinkTransition::Down) => self.report_clock(was_synced, sink),
            None => {}
        }
    }

    /// "connected" notice first, then the backlog, then the clock.
    fn on_link_up(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.send(CONNECTED_MESSAGE, sink);
        self.notifier.flush(true, &mut self.ports.http, &mut self.ports.store, sink);

        let was_synced = self.state.clock_synced;
        self.clock.initialize(now_ms, &mut self.ports.clock, &mut self.state);
        self.report_clock(was_synced, sink);

        if !self.poller.is_primed() {
            if let Err(e) = self.poller.prime(&mut self.ports.http) {
                warn!("Poller: priming failed: {}", e);
                sink.emit(&AppEvent::PollSkipped(e));
            }
        }
    }

    fn notify_changes(&mut self, sink: &mut impl EventSink) {
        let (previous, current) = (self.state.previous, self.state.current);
        for sensor in current.changed_since(&previous) {
            sink.emit(&AppEvent::Transition { sensor, asserted: current.get(sensor) });
        }
        let timestamp = self.state.timestamp.clone();
        for message in changes::detect(&previous, &current, &timestamp) {
            self.send(&message, sink);
        }
    }

    fn poll_commands(&mut self, sink: &mut impl EventSink) {
        match self.poller.poll(&mut self.ports.http) {
            Ok(commands) => {
                for cmd in commands {
                    self.handle_command(cmd, sink);
                }
            }
            Err(e) => {
                warn!("Poller: {}, skipping this poll", e);
                sink.emit(&AppEvent::PollSkipped(e));
            }
        }
    }

    fn send(&mut self, message: &str, sink: &mut impl EventSink) -> Delivery {
        let online = self.state.is_online();
        self.notifier
            .send(message, online, &mut self.ports.http, &mut self.ports.store, sink)
    }

    fn report_clock(&self, was_synced: bool, sink: &mut impl EventSink) {
        if was_synced != self.state.clock_synced {
            sink.emit(&AppEvent::ClockSynced(self.state.clock_synced));
        }
    }
}
