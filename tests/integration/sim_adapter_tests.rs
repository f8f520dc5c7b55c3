//! The monitor wired to the real adapter types in their host simulation
//! mode: simulated GPIO levels, WiFi, SNTP, HTTP and a directory-backed
//! outbox.

use std::path::PathBuf;

use shopwatch::adapters::fs_store::FsStore;
use shopwatch::adapters::gpio::GpioInput;
use shopwatch::adapters::http::HttpAdapter;
use shopwatch::adapters::log_sink::LogEventSink;
use shopwatch::adapters::nvs::NvsAdapter;
use shopwatch::adapters::time::Esp32TimeAdapter;
use shopwatch::adapters::wifi::WifiAdapter;
use shopwatch::app::clock::SENTINEL_TIMESTAMP;
use shopwatch::app::ports::ConfigPort;
use shopwatch::app::service::{CONNECTED_MESSAGE, Monitor, Ports};
use shopwatch::sensors::{SensorBank, SensorId};

use super::mock_hw::test_config;

fn scratch(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shopwatch-it-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn pins() -> [GpioInput; SensorId::COUNT] {
    SensorId::ALL.map(|id| GpioInput::new(id.gpio(), id.polarity() == shopwatch::sensors::Polarity::ActiveLow).unwrap())
}

#[test]
fn door_closes_offline_then_backlog_reaches_sink() {
    let root = scratch("backlog");
    let cfg = test_config();

    let pins = pins();
    let shutter = pins[SensorId::Shutter as usize].sim_level();
    let mut sensors = SensorBank::new(pins);

    let mut net = WifiAdapter::new();
    net.set_credentials("ShopAP", "password123").unwrap();
    net.sim_set_reachable(false);

    let mut monitor = Monitor::new(
        &cfg,
        Ports {
            net,
            http: HttpAdapter::new(10_000),
            store: FsStore::new(&root),
            clock: Esp32TimeAdapter::new(),
        },
    );
    let mut sink = LogEventSink::new();
    monitor.start(0, &mut sensors, &mut sink);

    // Reed switch pulls the line low when the shutter closes.
    shutter.set_low();
    monitor.tick(100, &mut sensors, &mut sink);

    let queue = std::fs::read_to_string(root.join(cfg.queue_file.as_str())).unwrap();
    assert_eq!(queue, format!("Shutter closed at {SENTINEL_TIMESTAMP}\n"));
    assert!(monitor.ports().http.sim_requests().is_empty());

    monitor.ports_mut().net.sim_set_reachable(true);
    monitor.tick(200, &mut sensors, &mut sink);

    let posts: Vec<&str> = monitor
        .ports()
        .http
        .sim_requests()
        .iter()
        .filter(|(method, _, _)| *method == "POST")
        .map(|(_, _, body)| body.as_str())
        .collect();
    assert_eq!(posts.len(), 2);
    assert!(posts[0].ends_with(&shopwatch::app::form::encode(CONNECTED_MESSAGE)));
    assert!(posts[1].contains("Shutter+closed+at+01%2F01%2F1001"));
    assert!(!root.join(cfg.queue_file.as_str()).exists());
    assert!(monitor.state().clock_synced);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn stored_config_drives_the_monitor() {
    let nvs = NvsAdapter::new().unwrap();
    let mut cfg = test_config();
    cfg.site_name = shopwatch::config::bounded("Corner Shop");
    nvs.save(&cfg).unwrap();
    let loaded = nvs.load().unwrap();
    assert_eq!(loaded, cfg);

    let root = scratch("config");
    let mut net = WifiAdapter::new();
    net.set_credentials("ShopAP", "password123").unwrap();
    let mut monitor = Monitor::new(
        &loaded,
        Ports {
            net,
            http: HttpAdapter::new(10_000),
            store: FsStore::new(&root),
            clock: Esp32TimeAdapter::new(),
        },
    );
    let mut sensors = SensorBank::new(pins());
    let mut sink = LogEventSink::new();
    monitor.start(0, &mut sensors, &mut sink);
    monitor.handle_command(shopwatch::app::commands::AppCommand::Status, &mut sink);

    let last = &monitor.ports().http.sim_requests().last().unwrap().2;
    assert!(last.contains("text=Corner+Shop+Status%3A"), "got {last}");
    assert!(last.contains("2%2E+Shop%3A+Open"));

    let _ = std::fs::remove_dir_all(root);
}
