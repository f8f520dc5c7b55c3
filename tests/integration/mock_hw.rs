//! Mock adapters for integration tests.
//!
//! Every mock records what the monitor asked of it so tests can assert on
//! the full request history.  Network reachability, HTTP replies and the
//! wall clock are all scripted from the test.

use std::collections::{HashMap, VecDeque};

use shopwatch::app::events::AppEvent;
use shopwatch::app::form;
use shopwatch::app::ports::{
    ClockPort, ConnectivityError, ConnectivityPort, EventSink, FileStore, HttpResponse, SensorPort,
    SinkTransport, StoreError, TransportError,
};
use shopwatch::app::service::{Monitor, Ports};
use shopwatch::config::{SystemConfig, bounded};
use shopwatch::sensors::{SensorId, SensorSnapshot};

/// 2024-03-10 00:15:07 at UTC+05:30.
pub const BOOT_UTC: i64 = 1_710_009_907;
pub const BOOT_LOCAL: &str = "10/03/2024 00:15:07";

// ── MockNet ───────────────────────────────────────────────────

/// Access point the test can switch on and off.  `connect` succeeds only
/// while `reachable` is set.
#[derive(Default)]
pub struct MockNet {
    pub associated: bool,
    pub reachable: bool,
    pub connect_calls: u32,
}

impl MockNet {
    pub fn online() -> Self {
        Self { associated: true, reachable: true, connect_calls: 0 }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn drop_link(&mut self) {
        self.associated = false;
        self.reachable = false;
    }

    pub fn restore(&mut self) {
        self.reachable = true;
    }
}

impl ConnectivityPort for MockNet {
    fn is_connected(&self) -> bool {
        self.associated
    }

    fn connect(&mut self, _attempts: u8, _attempt_delay_ms: u32) -> Result<(), ConnectivityError> {
        self.connect_calls += 1;
        self.associated = self.reachable;
        if self.associated { Ok(()) } else { Err(ConnectivityError::ConnectionFailed) }
    }
}

// ── MockHttp ──────────────────────────────────────────────────

/// Records POSTs and GETs.  POSTs pop `post_replies`, then answer
/// `post_status`; GETs pop `get_replies`, then answer an empty update list.
pub struct MockHttp {
    pub posts: Vec<(String, String)>,
    pub gets: Vec<String>,
    pub post_status: Result<u16, TransportError>,
    pub post_replies: VecDeque<Result<u16, TransportError>>,
    pub get_replies: VecDeque<Result<HttpResponse, TransportError>>,
}

#[allow(dead_code)]
impl MockHttp {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            gets: Vec::new(),
            post_status: Ok(200),
            post_replies: VecDeque::new(),
            get_replies: VecDeque::new(),
        }
    }

    /// Decoded `text` field of every POST, in order.
    pub fn texts(&self) -> Vec<String> {
        self.posts
            .iter()
            .filter_map(|(_, body)| body.split_once("&text="))
            .filter_map(|(_, text)| form::decode(text))
            .collect()
    }

    /// Queue a 200 `getUpdates` reply with one message per `(date, text)`.
    pub fn reply_updates(&mut self, updates: &[(i64, &str)]) {
        let result: Vec<String> = updates
            .iter()
            .enumerate()
            .map(|(i, (date, text))| {
                format!(r#"{{"update_id":{},"message":{{"date":{},"text":"{}"}}}}"#, i + 1, date, text)
            })
            .collect();
        self.get_replies.push_back(Ok(HttpResponse {
            status: 200,
            body: format!(r#"{{"ok":true,"result":[{}]}}"#, result.join(",")),
        }));
    }
}

impl Default for MockHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkTransport for MockHttp {
    fn post_form(&mut self, url: &str, body: &str) -> Result<u16, TransportError> {
        self.posts.push((url.to_owned(), body.to_owned()));
        self.post_replies.pop_front().unwrap_or(self.post_status)
    }

    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.gets.push(url.to_owned());
        self.get_replies.pop_front().unwrap_or_else(|| {
            Ok(HttpResponse { status: 200, body: r#"{"ok":true,"result":[]}"#.to_owned() })
        })
    }
}

// ── MemStore ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MemStore {
    pub files: HashMap<String, Vec<u8>>,
    pub fail_remove: bool,
}

#[allow(dead_code)]
impl MemStore {
    pub fn text(&self, name: &str) -> String {
        self.files
            .get(name)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

impl FileStore for MemStore {
    fn append(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.files.entry(name.to_owned()).or_default().extend_from_slice(data);
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.files.get(name).cloned())
    }

    fn overwrite(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.files.insert(name.to_owned(), data.to_vec());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        if self.fail_remove {
            return Err(StoreError::Io);
        }
        self.files.remove(name);
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// SNTP stand-in.  Sync succeeds while `reachable`; the wall clock then
/// reads `utc`.
pub struct MockClock {
    pub reachable: bool,
    pub utc: i64,
    synced: bool,
    pub sync_calls: u32,
}

impl MockClock {
    pub fn new(reachable: bool) -> Self {
        Self { reachable, utc: BOOT_UTC, synced: false, sync_calls: 0 }
    }
}

impl ClockPort for MockClock {
    fn sync(&mut self, _server: &str, _attempts: u8, _delay_ms: u32) -> bool {
        self.sync_calls += 1;
        self.synced |= self.reachable;
        self.synced
    }

    fn now_utc_secs(&self) -> Option<i64> {
        self.synced.then_some(self.utc)
    }
}

// ── ScriptedSensors ───────────────────────────────────────────

/// Returns `level` on every sample; tests flip sensors between ticks.
#[derive(Default)]
pub struct ScriptedSensors {
    pub level: SensorSnapshot,
}

#[allow(dead_code)]
impl ScriptedSensors {
    pub fn set(&mut self, id: SensorId, asserted: bool) {
        self.level.set(id, asserted);
    }
}

impl SensorPort for ScriptedSensors {
    fn sample(&mut self) -> SensorSnapshot {
        self.level
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixture ───────────────────────────────────────────────────

pub type TestMonitor = Monitor<MockNet, MockHttp, MemStore, MockClock>;

pub fn test_config() -> SystemConfig {
    SystemConfig {
        bot_token: bounded("123:ABC"),
        chat_id: bounded("42"),
        site_name: bounded("Test Shop"),
        ..SystemConfig::default()
    }
}

pub fn make_monitor(config: &SystemConfig, net: MockNet, store: MemStore) -> TestMonitor {
    Monitor::new(
        config,
        Ports {
            net,
            http: MockHttp::new(),
            store,
            clock: MockClock::new(true),
        },
    )
}

/// A store whose queue file already holds `lines`.
pub fn store_with_queue(config: &SystemConfig, lines: &[String]) -> MemStore {
    let mut store = MemStore::default();
    let mut data = String::new();
    for line in lines {
        data.push_str(line);
        data.push('\n');
    }
    store.files.insert(config.queue_file.as_str().to_owned(), data.into_bytes());
    store
}
