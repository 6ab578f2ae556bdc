//! Fixed-step accumulator
//!
//! Hosts feed wall-clock frame deltas; the clock hands back how many whole
//! simulation ticks to run, so the simulation stays deterministic under any
//! frame rate.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    pub dt: f32,
    pub max_substeps: u32,
    pub max_frame_dt: f32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed time and return the number of ticks due
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(self.max_frame_dt);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        // Drop the backlog rather than spiral
        if ticks == self.max_substeps && self.accumulator >= self.dt {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator %= self.dt;
        }
        ticks
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStep::new(0.01);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_caps_substeps() {
        let mut clock = FixedStep::new(0.001);
        assert_eq!(clock.advance(0.05), MAX_SUBSTEPS);
        // Backlog dropped, not carried into the next frame
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_sixty_hz() {
        let mut clock = FixedStep::default();
        let ticks: u32 = (0..60).map(|_| clock.advance(1.0 / 60.0)).sum();
        // Float drift can leave the last tick pending
        assert!((59..=60).contains(&ticks));
    }
}
