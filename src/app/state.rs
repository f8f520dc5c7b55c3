//! Process-wide device state, owned by the main loop.
//!
//! `DeviceState` is the single struct that holds the snapshot pair, the
//! link state and the displayed timestamp.  Components receive it by
//! reference for the duration of one call and never keep a copy.

use core::fmt::Write as _;

use crate::sensors::{SensorId, SensorSnapshot};

use super::clock::SENTINEL_TIMESTAMP;

/// Wire format `DD/MM/YYYY HH:MM:SS` plus the sentinel's `*`.
pub type Timestamp = heapless::String<24>;

/// Link state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Derived view combining link and clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Disconnected,
    ConnectedClockUnsynced,
    ConnectedClockSynced,
}

pub struct DeviceState {
    /// Stable snapshot from the latest sample.
    pub current: SensorSnapshot,
    /// `current` as it was before the latest sample.
    pub previous: SensorSnapshot,
    pub link: LinkState,
    pub clock_synced: bool,
    /// Timestamp stamped onto every message produced this cycle.
    pub timestamp: Timestamp,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceState {
    pub fn new() -> Self {
        Self {
            current: SensorSnapshot::default(),
            previous: SensorSnapshot::default(),
            link: LinkState::Disconnected,
            clock_synced: false,
            timestamp: sentinel(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.link == LinkState::Connected
    }

    pub fn connectivity(&self) -> ConnectivityState {
        match (self.is_online(), self.clock_synced) {
            (false, _) => ConnectivityState::Disconnected,
            (true, false) => ConnectivityState::ConnectedClockUnsynced,
            (true, true) => ConnectivityState::ConnectedClockSynced,
        }
    }

    /// Shift `current` into `previous` and adopt `snap`.
    pub fn record_sample(&mut self, snap: SensorSnapshot) {
        self.previous = self.current;
        self.current = snap;
    }

    /// Make both halves of the pair equal to `snap` (boot).
    pub fn seed(&mut self, snap: SensorSnapshot) {
        self.previous = snap;
        self.current = snap;
    }

    pub fn set_sentinel(&mut self) {
        self.timestamp = sentinel();
        self.clock_synced = false;
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            sensors: self.current,
            connectivity: self.connectivity(),
            timestamp: self.timestamp.clone(),
        }
    }
}

fn sentinel() -> Timestamp {
    let mut t = Timestamp::new();
    let _ = t.push_str(SENTINEL_TIMESTAMP);
    t
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// Read-only view assembled for a status reply.  Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub sensors: SensorSnapshot,
    pub connectivity: ConnectivityState,
    pub timestamp: Timestamp,
}

impl StatusSnapshot {
    /// Numbered multi-line report headed by `site_name`.
    pub fn render(&self, site_name: &str) -> String {
        let closed = |id| if self.sensors.get(id) { "Closed" } else { "Open" };
        let occupied = |id| if self.sensors.get(id) { "Occupied" } else { "Vacant" };
        let wifi = match self.connectivity {
            ConnectivityState::Disconnected => "Disconnected",
            _ => "Connected",
        };

        let mut out = String::with_capacity(192);
        let _ = write!(out, "{} Status:\n\n", site_name);
        let _ = writeln!(out, "1. WiFi : {}", wifi);
        let _ = writeln!(out, "2. Shop: {}", closed(SensorId::Shutter));
        let _ = writeln!(out, "3. Office Door: {}", closed(SensorId::OfficeDoor));
        let _ = writeln!(out, "4. Drawer: {}", closed(SensorId::Drawer));
        let _ = writeln!(out, "5. Computer 1: {}", occupied(SensorId::Motion1));
        let _ = writeln!(out, "6. Computer 2: {}", occupied(SensorId::Motion2));
        let _ = write!(out, "7. Time: {}", self.timestamp);
        out
    }
}
