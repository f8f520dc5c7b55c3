//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Monitor (domain)
//! ```
//!
//! Driven adapters (GPIO, WiFi, HTTP, flash store, SNTP, logging) implement
//! these traits.  The [`Monitor`](super::service::Monitor) consumes them via
//! generics, so the domain core never touches hardware or sockets directly.
//!
//! All calls are blocking and run to completion; there is no cancellation
//! of an in-flight request.

use core::fmt;

use crate::config::SystemConfig;
use crate::sensors::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Read all five inputs and return their polarity-corrected levels.
    fn sample(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain → WiFi STA)
// ───────────────────────────────────────────────────────────────

pub trait ConnectivityPort {
    /// Whether the interface currently reports an association.
    fn is_connected(&self) -> bool;

    /// Start association and wait for it, checking up to `attempts` times
    /// with `attempt_delay_ms` between checks.
    fn connect(&mut self, attempts: u8, attempt_delay_ms: u32) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ↔ SNTP / RTC)
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// (Re)start time synchronisation against `server` and wait for it,
    /// checking up to `attempts` times `delay_ms` apart.  Returns whether
    /// the wall clock is trustworthy afterwards.
    fn sync(&mut self, server: &str, attempts: u8, delay_ms: u32) -> bool;

    /// Current UTC time in seconds since the Unix epoch, or `None` while
    /// the clock has never been synchronised.
    fn now_utc_secs(&self) -> Option<i64>;
}

// ───────────────────────────────────────────────────────────────
// Sink transport (driven adapter: domain → HTTP client)
// ───────────────────────────────────────────────────────────────

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

pub trait SinkTransport {
    /// POST `body` as `application/x-www-form-urlencoded`.  Returns the
    /// HTTP status code of the reply.
    fn post_form(&mut self, url: &str, body: &str) -> Result<u16, TransportError>;

    /// GET `url` and return status plus body.
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// File store (driven adapter: domain ↔ SPIFFS)
// ───────────────────────────────────────────────────────────────

/// Append-oriented byte store addressed by plain file names.
pub trait FileStore {
    /// Append `data` to `name`, creating the file if needed.
    fn append(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Read the whole file.  `Ok(None)` if it does not exist.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the file contents.
    fn overwrite(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Delete the file.  `Ok(())` even if it did not exist.
    fn remove(&mut self, name: &str) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ NVS)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST run [`config::validate`](crate::config::validate)
/// before persisting and reject invalid values instead of clamping them.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SystemConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    /// Association did not complete within the attempt budget.
    ConnectionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No network path (interface down, DNS failure).
    NotConnected,
    /// Socket / TLS / HTTP protocol failure.
    Io,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Filesystem not mounted or root missing.
    NotMounted,
    /// Open, read or write failed.
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Io => write!(f, "I/O error"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => write!(f, "store not mounted"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
