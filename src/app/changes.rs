//! Change detector.
//!
//! Turns a `(previous, current)` snapshot pair into notification text.
//! Only edges are reported: one message per sensor whose flag differs,
//! never one for a level that merely persists.  The single exception is
//! the level-derived "no employee present" message, emitted when both
//! motion sensors become idle after at least one was active.
//!
//! Messages come out in a fixed order: contacts, then motion sensors,
//! then the aggregate occupancy message.

use crate::sensors::{SensorId, SensorKind, SensorSnapshot};

/// Five sensors plus the aggregate.
pub const MAX_MESSAGES_PER_CYCLE: usize = SensorId::COUNT + 1;

pub type CycleMessages = heapless::Vec<String, MAX_MESSAGES_PER_CYCLE>;

const REPORT_ORDER: [SensorId; SensorId::COUNT] = [
    SensorId::Shutter,
    SensorId::Drawer,
    SensorId::OfficeDoor,
    SensorId::Motion1,
    SensorId::Motion2,
];

pub fn detect(previous: &SensorSnapshot, current: &SensorSnapshot, timestamp: &str) -> CycleMessages {
    let mut out = CycleMessages::new();

    for id in REPORT_ORDER {
        if previous.get(id) != current.get(id) {
            let pushed = out.push(transition_message(id, current.get(id), timestamp));
            debug_assert!(pushed.is_ok(), "cycle capacity below sensor count");
        }
    }

    if previous.any_motion() && !current.any_motion() {
        let pushed = out.push(format!("No employee present in the shop at {}", timestamp));
        debug_assert!(pushed.is_ok(), "cycle capacity leaves no room for the aggregate");
    }

    out
}

/// Text for one sensor edge.  `asserted` is the new level.
pub fn transition_message(id: SensorId, asserted: bool, timestamp: &str) -> String {
    match (id.kind(), asserted) {
        (SensorKind::Contact, true) => format!("{} closed at {}", id.name(), timestamp),
        (SensorKind::Contact, false) => format!("{} open at {}", id.name(), timestamp),
        (SensorKind::Motion, true) => {
            format!("Employee is present at {} at {}", id.name(), timestamp)
        }
        (SensorKind::Motion, false) => format!("Employee left {} at {}", id.name(), timestamp),
    }
}
