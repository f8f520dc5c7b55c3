//! Inbound command polling: priming, date filtering, status replies.

use shopwatch::app::events::AppEvent;
use shopwatch::app::ports::{HttpResponse, TransportError};
use shopwatch::app::service::CONNECTED_MESSAGE;
use shopwatch::config::SystemConfig;
use shopwatch::error::Error;
use shopwatch::sensors::SensorId;

use super::mock_hw::{
    BOOT_LOCAL, MemStore, MockNet, RecordingSink, ScriptedSensors, TestMonitor, make_monitor, test_config,
};

/// Boot online with `backlog` already waiting on the sink for the priming
/// read and `poll` answered at the first poll.
fn booted(cfg: &SystemConfig, backlog: &[(i64, &str)], poll: &[(i64, &str)]) -> (TestMonitor, ScriptedSensors, RecordingSink) {
    let mut m = make_monitor(cfg, MockNet::online(), MemStore::default());
    m.ports_mut().http.reply_updates(backlog);
    m.ports_mut().http.reply_updates(poll);
    let mut sensors = ScriptedSensors::default();
    let mut sink = RecordingSink::default();
    m.start(0, &mut sensors, &mut sink);
    (m, sensors, sink)
}

#[test]
fn priming_reads_latest_update_once() {
    let (m, _, _) = booted(&test_config(), &[(1_000, "status")], &[]);
    let gets = &m.ports().http.gets;
    assert_eq!(gets.len(), 1);
    assert!(gets[0].ends_with("/bot123:ABC/getUpdates?offset=-1"), "got {}", gets[0]);
    assert_eq!(m.poller().last_date(), 1_000);
    assert_eq!(m.ports().http.texts(), [CONNECTED_MESSAGE], "backlog command must not be answered");
}

#[test]
fn stale_command_gets_no_reply() {
    let (mut m, mut sensors, mut sink) = booted(&test_config(), &[(1_000, "hello")], &[(1_000, "status")]);
    m.tick(5_000, &mut sensors, &mut sink);

    assert!(m.ports().http.gets[1].ends_with("getUpdates?timeout=1"));
    assert_eq!(m.ports().http.posts.len(), 1);
    assert!(!sink.events.contains(&AppEvent::StatusRequested));
}

#[test]
fn newer_status_gets_exactly_one_report() {
    let (mut m, mut sensors, mut sink) =
        booted(&test_config(), &[(1_000, "hello")], &[(1_001, "status"), (1_001, "status")]);
    sensors.set(SensorId::Drawer, true);
    sensors.set(SensorId::Motion1, true);
    m.tick(5_000, &mut sensors, &mut sink);

    let texts = m.ports().http.texts();
    let reports: Vec<&String> = texts.iter().filter(|t| t.contains("Status:")).collect();
    assert_eq!(reports.len(), 1);
    let report = reports[0];
    assert!(report.starts_with("Test Shop Status:\n\n"));
    for line in [
        "1. WiFi : Connected",
        "2. Shop: Open",
        "3. Office Door: Open",
        "4. Drawer: Closed",
        "5. Computer 1: Occupied",
        "6. Computer 2: Vacant",
    ] {
        assert!(report.contains(line), "missing {line:?} in {report:?}");
    }
    assert!(report.ends_with(&format!("7. Time: {BOOT_LOCAL}")));
    assert_eq!(sink.count(&AppEvent::StatusRequested), 1);
    assert_eq!(m.poller().last_date(), 1_001);
}

#[test]
fn numeric_shortcut_requests_status() {
    let (mut m, mut sensors, mut sink) = booted(&test_config(), &[], &[(50, "1")]);
    m.tick(5_000, &mut sensors, &mut sink);
    assert_eq!(sink.count(&AppEvent::StatusRequested), 1);
}

#[test]
fn unknown_text_advances_watermark_without_reply() {
    let (mut m, mut sensors, mut sink) = booted(&test_config(), &[], &[(70, "hi there")]);
    m.tick(5_000, &mut sensors, &mut sink);
    assert_eq!(m.poller().last_date(), 70);
    assert_eq!(m.ports().http.posts.len(), 1);
}

#[test]
fn polls_only_every_five_seconds() {
    let (mut m, mut sensors, mut sink) = booted(&test_config(), &[], &[]);
    for now in (100..5_000).step_by(100) {
        m.tick(now, &mut sensors, &mut sink);
    }
    assert_eq!(m.ports().http.gets.len(), 1, "only the priming read so far");
    m.tick(5_000, &mut sensors, &mut sink);
    m.tick(5_100, &mut sensors, &mut sink);
    assert_eq!(m.ports().http.gets.len(), 2);
    m.tick(10_000, &mut sensors, &mut sink);
    assert_eq!(m.ports().http.gets.len(), 3);
}

#[test]
fn malformed_reply_skips_the_poll() {
    let (mut m, mut sensors, mut sink) = booted(&test_config(), &[], &[]);
    // Discard the scripted empty page and substitute bad ones.
    m.ports_mut().http.get_replies.clear();
    m.ports_mut().http.get_replies.push_back(Ok(HttpResponse { status: 200, body: "<html>".into() }));
    m.ports_mut().http.get_replies.push_back(Ok(HttpResponse { status: 502, body: String::new() }));
    m.ports_mut().http.get_replies.push_back(Err(TransportError::Timeout));

    m.tick(5_000, &mut sensors, &mut sink);
    m.tick(10_000, &mut sensors, &mut sink);
    m.tick(15_000, &mut sensors, &mut sink);

    assert_eq!(
        sink.count(&AppEvent::PollSkipped(Error::MalformedInboundResponse)),
        2,
        "bad JSON and non-200 are both malformed"
    );
    assert_eq!(sink.events.iter().filter(|e| matches!(e, AppEvent::PollSkipped(_))).count(), 3);
    assert_eq!(m.ports().http.posts.len(), 1);
}

#[test]
fn reply_filter_ignores_plain_messages() {
    let cfg = SystemConfig { commands_require_reply: true, ..test_config() };
    let (mut m, mut sensors, mut sink) = booted(&cfg, &[], &[]);
    m.ports_mut().http.get_replies.clear();
    m.ports_mut().http.get_replies.push_back(Ok(HttpResponse {
        status: 200,
        body: concat!(
            r#"{"ok":true,"result":["#,
            r#"{"update_id":1,"message":{"date":80,"text":"status"}},"#,
            r#"{"update_id":2,"message":{"date":81,"text":"status","reply_to_message":{"message_id":9}}}"#,
            "]}"
        )
        .into(),
    }));
    m.tick(5_000, &mut sensors, &mut sink);

    assert_eq!(sink.count(&AppEvent::StatusRequested), 1);
    assert_eq!(m.poller().last_date(), 81);
}

#[test]
fn status_while_clock_unsynced_shows_sentinel() {
    let mut m = make_monitor(&test_config(), MockNet::online(), MemStore::default());
    m.ports_mut().clock.reachable = false;
    m.ports_mut().http.reply_updates(&[]);
    m.ports_mut().http.reply_updates(&[(5, "status")]);
    let mut sensors = ScriptedSensors::default();
    let mut sink = RecordingSink::default();
    m.start(0, &mut sensors, &mut sink);
    m.tick(5_000, &mut sensors, &mut sink);

    let texts = m.ports().http.texts();
    let report = texts.last().unwrap();
    assert!(report.contains("1. WiFi : Connected"));
    assert!(report.ends_with("7. Time: 01/01/1001 00:00:00*"));
}
