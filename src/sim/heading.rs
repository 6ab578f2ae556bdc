//! Heading model
//!
//! Steering only works while rolling, and gets less twitchy with speed: the
//! full turn step at standstill, a quarter of it at top speed.

use super::input::ControlSet;
use crate::config::DriveConfig;
use crate::normalize_angle;

/// Fraction of the turn step left at top speed
pub const MIN_TURN_FRACTION: f32 = 0.25;

/// Turn increment magnitude for the given speed (radians per tick)
pub fn turn_step(speed: f32, config: &DriveConfig) -> f32 {
    let t = (speed.abs() / config.max_speed).clamp(0.0, 1.0);
    config.turn_step * (1.0 - (1.0 - MIN_TURN_FRACTION) * t)
}

/// Signed yaw change for this tick; zero when not turning or too slow.
///
/// Left is checked first. Steering mirrors in reverse so the car still turns
/// toward the held side relative to its direction of travel.
pub fn yaw_delta(controls: ControlSet, speed: f32, config: &DriveConfig) -> f32 {
    if speed.abs() < config.min_speed_to_turn {
        return 0.0;
    }

    let side = if controls.left() {
        1.0
    } else if controls.right() {
        -1.0
    } else {
        return 0.0;
    };
    let travel = if speed < 0.0 { -1.0 } else { 1.0 };

    side * travel * turn_step(speed, config)
}

/// Compute next tick's yaw
pub fn next_heading(yaw: f32, controls: ControlSet, speed: f32, config: &DriveConfig) -> f32 {
    let delta = yaw_delta(controls, speed, config);
    if delta == 0.0 {
        yaw
    } else {
        normalize_angle(yaw + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::ControlKey;

    fn config() -> DriveConfig {
        DriveConfig {
            max_speed: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_turn_when_stationary() {
        let config = config();
        let left = ControlSet::EMPTY.with(ControlKey::Left);
        assert_eq!(next_heading(0.3, left, 0.0, &config), 0.3);
        assert_eq!(next_heading(0.3, left, 0.019, &config), 0.3);
    }

    #[test]
    fn test_turn_step_at_max_speed_is_quarter() {
        let config = config();
        let left = ControlSet::EMPTY.with(ControlKey::Left);
        let delta = yaw_delta(left, 1.0, &config);
        assert!((delta - config.turn_step / 4.0).abs() < 1e-7);
    }

    #[test]
    fn test_turn_step_interpolates() {
        let config = config();
        let half = turn_step(0.5, &config);
        assert!((half - config.turn_step * 0.625).abs() < 1e-7);
        assert!(turn_step(0.02, &config) > turn_step(0.8, &config));
    }

    #[test]
    fn test_right_turns_negative() {
        let config = config();
        let right = ControlSet::EMPTY.with(ControlKey::Right);
        assert!(yaw_delta(right, 0.5, &config) < 0.0);
    }

    #[test]
    fn test_left_wins_over_right() {
        let config = config();
        let both = ControlSet::EMPTY
            .with(ControlKey::Left)
            .with(ControlKey::Right);
        assert!(yaw_delta(both, 0.5, &config) > 0.0);
    }

    #[test]
    fn test_reverse_mirrors_steering() {
        let config = config();
        let left = ControlSet::EMPTY.with(ControlKey::Left);
        let forward = yaw_delta(left, 0.5, &config);
        let reverse = yaw_delta(left, -0.5, &config);
        assert!((forward + reverse).abs() < 1e-7);
    }
}
