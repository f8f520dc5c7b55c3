//! N-sample level confirmation.
//!
//! A raw level replaces the stable level only after it has been seen on
//! `required` consecutive samples.  With `required == 1` the debouncer is
//! a pass-through, which is the deployed behaviour (the PIR modules and
//! reed-switch pull-ups already filter most bounce in hardware).

use super::{SensorId, SensorSnapshot};

pub struct Debouncer {
    required: u8,
    stable: SensorSnapshot,
    /// Consecutive samples that disagreed with `stable`, per sensor.
    streak: [u8; SensorId::COUNT],
}

impl Debouncer {
    pub fn new(required: u8) -> Self {
        Self {
            required: required.max(1),
            stable: SensorSnapshot::default(),
            streak: [0; SensorId::COUNT],
        }
    }

    /// Adopt `snap` as the stable state without confirmation (boot seeding).
    pub fn seed(&mut self, snap: SensorSnapshot) {
        self.stable = snap;
        self.streak = [0; SensorId::COUNT];
    }

    /// Feed one raw sample and return the current stable snapshot.
    pub fn update(&mut self, raw: SensorSnapshot) -> SensorSnapshot {
        for id in SensorId::ALL {
            let i = id as usize;
            if raw.get(id) == self.stable.get(id) {
                self.streak[i] = 0;
                continue;
            }
            self.streak[i] = self.streak[i].saturating_add(1);
            if self.streak[i] >= self.required {
                self.stable.set(id, raw.get(id));
                self.streak[i] = 0;
            }
        }
        self.stable
    }

    pub fn stable(&self) -> SensorSnapshot {
        self.stable
    }
}
