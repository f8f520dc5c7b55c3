//! Fuzz target: `CommandPoller::commands_in` (getUpdates body parser)
//!
//! Feeds arbitrary bodies to the poller, twice, and checks:
//! - No panics under any input
//! - The processed-date watermark never moves backwards
//! - Replaying the same body never yields a command
//!
//! cargo fuzz run fuzz_updates_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use shopwatch::app::poller::CommandPoller;
use shopwatch::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    let mut poller = CommandPoller::new(&SystemConfig::default());
    let before = poller.last_date();
    let _ = poller.commands_in(body);
    let after = poller.last_date();
    assert!(after >= before, "watermark moved back: {before} -> {after}");

    if let Ok(again) = poller.commands_in(body) {
        assert!(again.is_empty(), "replayed body produced {} command(s)", again.len());
    }
    assert_eq!(poller.last_date(), after);
});
