//! ESP32 time adapter.
//!
//! Implements [`ClockPort`] (wall clock via SNTP) and provides the
//! monotonic uptime the main loop schedules against.
//!
//! - **`target_os = "espidf"`**: `EspSntp` for synchronisation, the C
//!   library clock for reads, `esp_timer_get_time()` for uptime.
//! - **`not(target_os = "espidf")`**: `std::time` for host-side testing;
//!   "synchronisation" succeeds unless disabled with [`Esp32TimeAdapter::sim_set_reachable`].
//!
//! The wall clock reads as UTC.  The fixed local offset is applied by the
//! domain when formatting.

use log::{info, warn};

use crate::app::ports::ClockPort;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};

/// Anything earlier is an unsynchronised RTC counting from 1970.
const EPOCH_2020: i64 = 1_577_836_800;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(target_os = "espidf")]
    sntp: Option<EspSntp<'static>>,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(not(target_os = "espidf"))]
    sim_reachable: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_synced: bool,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            sntp: None,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(not(target_os = "espidf"))]
            sim_reachable: true,
            #[cfg(not(target_os = "espidf"))]
            sim_synced: false,
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer is started by the IDF before `main`.
        (unsafe { esp_idf_sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Simulation: whether the NTP server answers.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_reachable(&mut self, reachable: bool) {
        self.sim_reachable = reachable;
    }

    #[cfg(target_os = "espidf")]
    fn platform_sync(&mut self, server: &str, attempts: u8, delay_ms: u32) -> bool {
        // Dropping the old service stops it before the new one starts.
        self.sntp = None;
        let mut conf = SntpConf::default();
        conf.servers[0] = server;
        let sntp = match EspSntp::new(&conf) {
            Ok(s) => s,
            Err(e) => {
                warn!("Time: SNTP start failed: {}", e);
                return false;
            }
        };

        let mut completed = false;
        for _ in 0..attempts.max(1) {
            if sntp.get_sync_status() == SyncStatus::Completed {
                completed = true;
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(u64::from(delay_ms)));
        }
        self.sntp = Some(sntp);
        completed || self.now_utc_secs().is_some()
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_sync(&mut self, server: &str, _attempts: u8, _delay_ms: u32) -> bool {
        self.sim_synced = self.sim_reachable;
        if self.sim_synced {
            info!("Time(sim): synchronised against '{}'", server);
        }
        self.sim_synced
    }

    fn system_utc_secs() -> Option<i64> {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()?
            .as_secs() as i64;
        (secs >= EPOCH_2020).then_some(secs)
    }
}

impl ClockPort for Esp32TimeAdapter {
    fn sync(&mut self, server: &str, attempts: u8, delay_ms: u32) -> bool {
        info!("Time: syncing against '{}'", server);
        let ok = self.platform_sync(server, attempts, delay_ms);
        if !ok {
            warn!("Time: no valid time after {} check(s)", attempts);
        }
        ok
    }

    #[cfg(target_os = "espidf")]
    fn now_utc_secs(&self) -> Option<i64> {
        Self::system_utc_secs()
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_utc_secs(&self) -> Option<i64> {
        if !self.sim_synced {
            return None;
        }
        Self::system_utc_secs()
    }
}
