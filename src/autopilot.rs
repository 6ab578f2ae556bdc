//! Seeded random key scripts
//!
//! Drives a session without a keyboard: picks a throttle and steering
//! combination, holds it for a while, then rerolls. Same seed, same run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::session::Session;
use crate::sim::{ControlKey, ControlSet, TickReport};

/// Shortest and longest hold, in ticks
pub const MIN_HOLD_TICKS: u32 = 10;
pub const MAX_HOLD_TICKS: u32 = 90;

#[derive(Debug, Clone)]
pub struct Autopilot {
    pub seed: u64,
    rng: Pcg32,
    held: ControlSet,
    ticks_left: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            held: ControlSet::EMPTY,
            ticks_left: 0,
        }
    }

    fn roll(&mut self) -> ControlSet {
        let mut controls = ControlSet::EMPTY;

        let throttle: f32 = self.rng.random();
        if throttle < 0.7 {
            controls.insert(ControlKey::Forward);
        } else if throttle < 0.85 {
            controls.insert(ControlKey::Back);
        }

        let steer: f32 = self.rng.random();
        if steer < 0.25 {
            controls.insert(ControlKey::Left);
        } else if steer < 0.5 {
            controls.insert(ControlKey::Right);
        }

        if self.rng.random_bool(0.05) {
            controls.insert(ControlKey::Brake);
        }
        controls
    }

    /// Controls to hold this tick
    pub fn next_controls(&mut self) -> ControlSet {
        if self.ticks_left == 0 {
            self.held = self.roll();
            self.ticks_left = self.rng.random_range(MIN_HOLD_TICKS..=MAX_HOLD_TICKS);
        }
        self.ticks_left -= 1;
        self.held
    }

    /// Press this tick's keys on `session` and step it once
    pub fn drive(&mut self, session: &mut Session) -> TickReport {
        let controls = self.next_controls();
        session.release_all();
        for key in controls.iter() {
            session.press(key);
        }
        session.step()
    }
}
