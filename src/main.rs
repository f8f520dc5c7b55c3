//! Shopwatch firmware entry point
//!
//! Hexagonal architecture with a single cooperative main loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorBank<GpioInput>  LogEventSink  NvsAdapter  FsStore      │
//! │  (SensorPort)           (EventSink)   (Config)    (FileStore)  │
//! │  WifiAdapter            HttpAdapter   Esp32TimeAdapter         │
//! │  (Connectivity)         (Transport)   (ClockPort + uptime)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │                 Monitor (pure logic)                   │    │
//! │  │  Link · Clock · Changes · Notifier · Outbox · Poller   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use shopwatch::adapters::fs_store::{self, FsStore};
use shopwatch::adapters::gpio;
use shopwatch::adapters::http::HttpAdapter;
use shopwatch::adapters::log_sink::LogEventSink;
use shopwatch::adapters::nvs::NvsAdapter;
use shopwatch::adapters::time::Esp32TimeAdapter;
use shopwatch::adapters::wifi::WifiAdapter;
use shopwatch::app::ports::ConfigPort;
use shopwatch::app::service::{Monitor, Ports};
use shopwatch::config::SystemConfig;

/// Upper bound on one HTTP exchange.  A hung sink stalls the loop for at
/// most this long.
const HTTP_TIMEOUT_MS: u32 = 10_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Shopwatch v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config unavailable or invalid ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. Storage ────────────────────────────────────────────
    // Without a mounted store the device still runs; undeliverable
    // messages are then lost instead of queued.
    if let Err(e) = fs_store::mount_spiffs() {
        warn!("Outbox storage unavailable: {}", e);
    }
    let store = FsStore::new(fs_store::SPIFFS_BASE_PATH);

    // ── 4. Construct adapters ─────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let mut sensors = gpio::sensor_bank()?;

    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), None)?;
    let mut net = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?);
    if let Err(e) = net.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        warn!("WiFi credentials rejected: {} (running offline)", e);
    }

    let ports = Ports {
        net,
        http: HttpAdapter::new(HTTP_TIMEOUT_MS),
        store,
        clock: Esp32TimeAdapter::new(),
    };
    let mut log_sink = LogEventSink::new();

    // ── 5. Construct and start the monitor ────────────────────
    let mut monitor = Monitor::new(&config, ports);
    let now = monitor.ports().clock.uptime_ms();
    monitor.start(now, &mut sensors, &mut log_sink);

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    let interval = Duration::from_millis(u64::from(config.loop_interval_ms));
    loop {
        let now = monitor.ports().clock.uptime_ms();
        monitor.tick(now, &mut sensors, &mut log_sink);
        std::thread::sleep(interval);
    }
}
