//! System configuration parameters
//!
//! All tunable parameters for the shop monitor.  Defaults reproduce the
//! field-deployed firmware; values can be overridden via NVS.  Credentials
//! default from build-time environment variables so they never live in
//! the source tree.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// How a drained outbox is redelivered when the link comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedeliveryPolicy {
    /// Send every queued line as one concatenated message.  If that send
    /// fails the whole batch is re-queued as a single entry.
    Batch,
    /// Send each queued line individually; only failed lines are re-queued.
    PerMessage,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- WiFi ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    /// Association attempts per connect cycle.
    pub connect_attempts: u8,
    /// Delay between association checks (milliseconds).
    pub connect_attempt_delay_ms: u32,

    // --- Notification sink ---
    /// Base URL of the bot API, without trailing slash.
    pub api_base: heapless::String<64>,
    pub bot_token: heapless::String<64>,
    pub chat_id: heapless::String<24>,
    /// Name printed at the top of status reports.
    pub site_name: heapless::String<32>,
    /// Only honour commands that reply to a bot message.
    pub commands_require_reply: bool,

    // --- Clock ---
    pub ntp_server: heapless::String<32>,
    /// Fixed offset from UTC (seconds).  No daylight saving.
    pub utc_offset_secs: i32,
    /// Sync-status checks after (re)starting SNTP.
    pub time_sync_attempts: u8,
    /// Delay between sync-status checks (milliseconds).
    pub time_sync_delay_ms: u32,

    // --- Outbox ---
    /// File name of the pending-message queue, relative to the store root.
    pub queue_file: heapless::String<32>,
    /// Line count at which a trim fires.
    pub queue_max_lines: u16,
    /// Oldest lines dropped per trim pass.
    pub queue_trim_lines: u16,
    pub redelivery: RedeliveryPolicy,

    // --- Sampling ---
    /// Consecutive identical raw samples required before a level change
    /// is accepted.  1 disables debouncing.
    pub debounce_samples: u8,

    // --- Timing ---
    /// Main loop yield between iterations (milliseconds).
    pub loop_interval_ms: u32,
    /// Displayed-time refresh period while connected (milliseconds).
    pub time_refresh_interval_ms: u32,
    /// Forced SNTP resync period (milliseconds).
    pub time_resync_interval_ms: u32,
    /// Command poll cadence (milliseconds).
    pub command_poll_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // WiFi
            wifi_ssid: bounded(option_env!("SHOPWATCH_WIFI_SSID").unwrap_or("")),
            wifi_password: bounded(option_env!("SHOPWATCH_WIFI_PASS").unwrap_or("")),
            connect_attempts: 2,
            connect_attempt_delay_ms: 500,

            // Sink
            api_base: bounded("https://api.telegram.org"),
            bot_token: bounded(option_env!("SHOPWATCH_BOT_TOKEN").unwrap_or("")),
            chat_id: bounded(option_env!("SHOPWATCH_CHAT_ID").unwrap_or("")),
            site_name: bounded("Bharat Multiservices"),
            commands_require_reply: false,

            // Clock
            ntp_server: bounded("pool.ntp.org"),
            utc_offset_secs: 5 * 3600 + 30 * 60, // IST
            time_sync_attempts: 10,
            time_sync_delay_ms: 500,

            // Outbox
            queue_file: bounded("pending_messages.txt"),
            queue_max_lines: 50,
            queue_trim_lines: 10,
            redelivery: RedeliveryPolicy::Batch,

            // Sampling
            debounce_samples: 1,

            // Timing
            loop_interval_ms: 100,
            time_refresh_interval_ms: 1_000,
            time_resync_interval_ms: 300_000, // 5 min
            command_poll_interval_ms: 5_000,
        }
    }
}

/// Copy `s` into a fixed-capacity string, truncating at a char boundary.
pub fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Range-check every field.  Invalid values are rejected, never clamped.
pub fn validate(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if cfg.connect_attempts == 0 {
        return Err(ConfigError::ValidationFailed("connect_attempts must be >= 1"));
    }
    if !(50..=10_000).contains(&cfg.connect_attempt_delay_ms) {
        return Err(ConfigError::ValidationFailed(
            "connect_attempt_delay_ms must be 50–10000",
        ));
    }
    if !cfg.api_base.starts_with("http://") && !cfg.api_base.starts_with("https://") {
        return Err(ConfigError::ValidationFailed("api_base must be an http(s) URL"));
    }
    if cfg.api_base.ends_with('/') {
        return Err(ConfigError::ValidationFailed("api_base must not end with '/'"));
    }
    if !(-12 * 3600..=14 * 3600).contains(&cfg.utc_offset_secs) {
        return Err(ConfigError::ValidationFailed(
            "utc_offset_secs must be within UTC-12..UTC+14",
        ));
    }
    if cfg.queue_file.is_empty() || cfg.queue_file.contains('/') {
        return Err(ConfigError::ValidationFailed(
            "queue_file must be a plain file name",
        ));
    }
    if cfg.queue_max_lines < 2 {
        return Err(ConfigError::ValidationFailed("queue_max_lines must be >= 2"));
    }
    if cfg.queue_trim_lines == 0 || cfg.queue_trim_lines >= cfg.queue_max_lines {
        return Err(ConfigError::ValidationFailed(
            "queue_trim_lines must be 1..queue_max_lines",
        ));
    }
    if !(1..=10).contains(&cfg.debounce_samples) {
        return Err(ConfigError::ValidationFailed("debounce_samples must be 1–10"));
    }
    if !(10..=5_000).contains(&cfg.loop_interval_ms) {
        return Err(ConfigError::ValidationFailed("loop_interval_ms must be 10–5000"));
    }
    if cfg.time_refresh_interval_ms < cfg.loop_interval_ms {
        return Err(ConfigError::ValidationFailed(
            "time_refresh_interval_ms must be >= loop_interval_ms",
        ));
    }
    if cfg.time_resync_interval_ms < 60_000 {
        return Err(ConfigError::ValidationFailed(
            "time_resync_interval_ms must be >= 60000",
        ));
    }
    if !(1_000..=600_000).contains(&cfg.command_poll_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "command_poll_interval_ms must be 1000–600000",
        ));
    }
    Ok(())
}
