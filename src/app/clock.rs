//! Timestamp provider.
//!
//! Keeps `DeviceState::timestamp` current.  While the link is up and the
//! wall clock is synchronised it holds local time as `DD/MM/YYYY HH:MM:SS`;
//! otherwise it holds [`SENTINEL_TIMESTAMP`], whose trailing `*` tells
//! readers the value is a placeholder.
//!
//! Two cadences apply while connected:
//! - a cheap refresh of the displayed time (default every second);
//! - a forced SNTP resync to correct drift (default every 5 minutes).

use core::fmt::Write as _;

use chrono::DateTime;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::Error;

use super::ports::ClockPort;
use super::state::{DeviceState, Timestamp};

/// Placeholder shown whenever the clock cannot be trusted.
pub const SENTINEL_TIMESTAMP: &str = "01/01/1001 00:00:00*";

pub struct TimestampProvider {
    server: heapless::String<32>,
    utc_offset_secs: i64,
    sync_attempts: u8,
    sync_delay_ms: u32,
    refresh_interval_ms: u64,
    resync_interval_ms: u64,
    last_refresh_ms: Option<u64>,
    last_sync_ms: Option<u64>,
}

impl TimestampProvider {
    pub fn new(cfg: &SystemConfig) -> Self {
        Self {
            server: cfg.ntp_server.clone(),
            utc_offset_secs: i64::from(cfg.utc_offset_secs),
            sync_attempts: cfg.time_sync_attempts,
            sync_delay_ms: cfg.time_sync_delay_ms,
            refresh_interval_ms: u64::from(cfg.time_refresh_interval_ms),
            resync_interval_ms: u64::from(cfg.time_resync_interval_ms),
            last_refresh_ms: None,
            last_sync_ms: None,
        }
    }

    /// Start (or restart) time synchronisation and refresh the timestamp.
    /// Called when the link comes up and on the resync cadence.
    pub fn initialize(&mut self, now_ms: u64, clock: &mut impl ClockPort, state: &mut DeviceState) {
        if !state.is_online() {
            warn!("Clock: cannot initialise time, link is down");
            state.set_sentinel();
            return;
        }

        self.last_sync_ms = Some(now_ms);
        if clock.sync(&self.server, self.sync_attempts, self.sync_delay_ms) {
            info!("Clock: synchronised against {}", self.server);
        } else {
            warn!("Clock: sync against {} did not complete", self.server);
        }
        self.refresh_from(now_ms, &*clock, state);
    }

    /// Per-cycle maintenance.
    pub fn maintain(&mut self, now_ms: u64, clock: &mut impl ClockPort, state: &mut DeviceState) {
        if !state.is_online() {
            state.set_sentinel();
            self.last_refresh_ms = None;
            return;
        }

        if elapsed(self.last_sync_ms, now_ms) >= self.resync_interval_ms {
            info!("Clock: periodic resync");
            self.initialize(now_ms, clock, state);
            return;
        }

        if elapsed(self.last_refresh_ms, now_ms) < self.refresh_interval_ms {
            return;
        }
        if self.try_refresh(now_ms, &*clock, state) {
            return;
        }

        // Connected but no time: resync once, then wait for the next refresh slot.
        warn!("Clock: failed to obtain time, reinitialising");
        self.last_sync_ms = Some(now_ms);
        clock.sync(&self.server, self.sync_attempts, self.sync_delay_ms);
        self.refresh_from(now_ms, &*clock, state);
    }

    fn refresh_from(&mut self, now_ms: u64, clock: &impl ClockPort, state: &mut DeviceState) {
        if !self.try_refresh(now_ms, clock, state) {
            warn!("Clock: {}, stamping {}", Error::ClockUnsynced, SENTINEL_TIMESTAMP);
            state.set_sentinel();
        }
    }

    fn try_refresh(&mut self, now_ms: u64, clock: &impl ClockPort, state: &mut DeviceState) -> bool {
        self.last_refresh_ms = Some(now_ms);
        match clock.now_utc_secs().and_then(|s| format_local(s, self.utc_offset_secs)) {
            Some(ts) => {
                state.timestamp = ts;
                state.clock_synced = true;
                true
            }
            None => false,
        }
    }
}

/// Milliseconds since `since`, or `u64::MAX` if it never happened.
fn elapsed(since: Option<u64>, now_ms: u64) -> u64 {
    since.map_or(u64::MAX, |t| now_ms.saturating_sub(t))
}

/// Render UTC seconds as local `DD/MM/YYYY HH:MM:SS` at a fixed offset.
pub fn format_local(utc_secs: i64, utc_offset_secs: i64) -> Option<Timestamp> {
    let local = DateTime::from_timestamp(utc_secs.checked_add(utc_offset_secs)?, 0)?;
    let mut out = Timestamp::new();
    write!(out, "{}", local.format("%d/%m/%Y %H:%M:%S")).ok()?;
    Some(out)
}
