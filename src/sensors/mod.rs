//! Sensor subsystem: the five digital inputs and the [`SensorBank`] that
//! samples them into a [`SensorSnapshot`].
//!
//! Each input has a fixed active level:
//!
//! | Sensor       | Hardware          | Pull      | Asserted level | Meaning  |
//! |--------------|-------------------|-----------|----------------|----------|
//! | `Motion1/2`  | PIR push-pull out | none      | HIGH           | motion   |
//! | `Shutter`    | reed to GND       | pull-up   | LOW            | closed   |
//! | `Drawer`     | reed to GND       | pull-up   | LOW            | closed   |
//! | `OfficeDoor` | reed to GND       | pull-up   | LOW            | closed   |
//!
//! The snapshot stores the *asserted* flag, so the rest of the system
//! never deals with electrical polarity.

pub mod debounce;

use core::ops::Index;

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::SensorPort;
use crate::pins;

pub use debounce::Debouncer;

// ---------------------------------------------------------------------------
// Sensor identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorId {
    Motion1 = 0,
    Motion2 = 1,
    Shutter = 2,
    Drawer = 3,
    OfficeDoor = 4,
}

/// Which electrical level means "asserted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// What a sensor physically reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// PIR presence detector. Asserted = motion.
    Motion,
    /// Magnetic contact. Asserted = closed.
    Contact,
}

impl SensorId {
    pub const COUNT: usize = 5;

    /// All sensors in reporting order.
    pub const ALL: [SensorId; Self::COUNT] = [
        Self::Motion1,
        Self::Motion2,
        Self::Shutter,
        Self::Drawer,
        Self::OfficeDoor,
    ];

    pub const fn kind(self) -> SensorKind {
        match self {
            Self::Motion1 | Self::Motion2 => SensorKind::Motion,
            Self::Shutter | Self::Drawer | Self::OfficeDoor => SensorKind::Contact,
        }
    }

    pub const fn polarity(self) -> Polarity {
        match self.kind() {
            SensorKind::Motion => Polarity::ActiveHigh,
            SensorKind::Contact => Polarity::ActiveLow,
        }
    }

    pub const fn gpio(self) -> i32 {
        match self {
            Self::Motion1 => pins::MOTION_1_GPIO,
            Self::Motion2 => pins::MOTION_2_GPIO,
            Self::Shutter => pins::SHUTTER_GPIO,
            Self::Drawer => pins::DRAWER_GPIO,
            Self::OfficeDoor => pins::OFFICE_DOOR_GPIO,
        }
    }

    /// Human-readable name used in notifications.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Motion1 => "main Computer 1",
            Self::Motion2 => "Computer 2",
            Self::Shutter => "Shutter",
            Self::Drawer => "Drawer",
            Self::OfficeDoor => "Office door",
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Asserted flag of every sensor at one sampling instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    asserted: [bool; SensorId::COUNT],
}

impl SensorSnapshot {
    pub fn new(asserted: [bool; SensorId::COUNT]) -> Self {
        Self { asserted }
    }

    pub fn get(&self, id: SensorId) -> bool {
        self.asserted[id as usize]
    }

    pub fn set(&mut self, id: SensorId, asserted: bool) {
        self.asserted[id as usize] = asserted;
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, id: SensorId, asserted: bool) -> Self {
        self.set(id, asserted);
        self
    }

    /// True if either motion sensor is asserted.
    pub fn any_motion(&self) -> bool {
        self.get(SensorId::Motion1) || self.get(SensorId::Motion2)
    }

    /// Sensors whose flag differs between `self` and `other`, in reporting order.
    pub fn changed_since(&self, other: &SensorSnapshot) -> impl Iterator<Item = SensorId> + '_ {
        let other = *other;
        SensorId::ALL
            .into_iter()
            .filter(move |&id| self.get(id) != other.get(id))
    }
}

impl Index<SensorId> for SensorSnapshot {
    type Output = bool;

    fn index(&self, id: SensorId) -> &bool {
        &self.asserted[id as usize]
    }
}

// ---------------------------------------------------------------------------
// Sensor bank
// ---------------------------------------------------------------------------

/// Owns the five input pins and implements [`SensorPort`].
///
/// Generic over any `embedded-hal` input so the same sampler runs on
/// `esp-idf-hal` pin drivers and on simulated pins in tests.
pub struct SensorBank<P: InputPin> {
    /// Indexed by `SensorId as usize`.
    pins: [P; SensorId::COUNT],
    last: SensorSnapshot,
}

impl<P: InputPin> SensorBank<P> {
    /// `pins` must be ordered as [`SensorId::ALL`].
    pub fn new(pins: [P; SensorId::COUNT]) -> Self {
        Self {
            pins,
            last: SensorSnapshot::default(),
        }
    }

    fn read_one(&mut self, id: SensorId) -> bool {
        let pin = &mut self.pins[id as usize];
        let level = match id.polarity() {
            Polarity::ActiveHigh => pin.is_high(),
            Polarity::ActiveLow => pin.is_low(),
        };
        match level {
            Ok(asserted) => asserted,
            Err(_) => {
                // Keep the previous level; a read glitch must not become an edge.
                warn!("GPIO{} read failed, keeping last level", id.gpio());
                self.last.get(id)
            }
        }
    }
}

impl<P: InputPin> SensorPort for SensorBank<P> {
    fn sample(&mut self) -> SensorSnapshot {
        let mut snap = SensorSnapshot::default();
        for id in SensorId::ALL {
            snap.set(id, self.read_one(id));
        }
        self.last = snap;
        snap
    }
}
