//! Speed model
//!
//! One scalar per tick, signed (positive = forward). Rules in priority order:
//! brake, direction reversal, forward, back, friction. The reversal rule only
//! applies under `ForceSign`; the signed accumulator sheds speed at the plain
//! acceleration rate and crosses zero without stopping.

use super::input::ControlSet;
use crate::config::{AccelerationPolicy, DriveConfig};
use crate::sign;

/// Residual magnitudes below this are treated as a full stop
pub const SPEED_EPSILON: f32 = 1e-6;

/// Magnitude `magnitude` carrying the sign of `sign_source`; zero stays zero
#[inline]
fn signed(magnitude: f32, sign_source: f32) -> f32 {
    if magnitude <= SPEED_EPSILON {
        0.0
    } else {
        magnitude * sign(sign_source)
    }
}

/// Whether the held throttle points against the previous direction of travel
pub fn is_reversing(controls: ControlSet, previous_speed: f32) -> bool {
    (controls.forward() && previous_speed < 0.0) || (controls.back() && previous_speed > 0.0)
}

/// Compute next tick's speed.
///
/// Forward wins over back when both are held.
pub fn next_speed(
    controls: ControlSet,
    current_speed: f32,
    previous_speed: f32,
    config: &DriveConfig,
) -> f32 {
    let max = config.max_speed;
    let accel = config.acceleration;
    let magnitude = current_speed.abs();

    let speed = if controls.brake() {
        signed(magnitude - config.brake_deceleration, current_speed)
    } else if config.acceleration_policy == AccelerationPolicy::ForceSign
        && is_reversing(controls, previous_speed)
    {
        // Shed speed first; the sign only flips once we've stopped
        signed(magnitude - 2.0 * accel, previous_speed)
    } else if controls.forward() {
        match config.acceleration_policy {
            AccelerationPolicy::ForceSign => (magnitude + accel).min(max),
            AccelerationPolicy::SignedAccumulator => (current_speed + accel).min(max),
        }
    } else if controls.back() {
        match config.acceleration_policy {
            AccelerationPolicy::ForceSign => -(magnitude + accel).min(max),
            AccelerationPolicy::SignedAccumulator => (current_speed - accel).max(-max),
        }
    } else {
        signed(magnitude - config.friction, current_speed)
    };

    speed.clamp(-max, max)
}

/// Take `amount` off the magnitude of `speed`, never crossing zero
#[inline]
pub fn decelerate(speed: f32, amount: f32) -> f32 {
    signed(speed.abs() - amount, speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::ControlKey;
    use proptest::prelude::*;

    fn held(keys: &[ControlKey]) -> ControlSet {
        keys.iter().copied().collect()
    }

    fn config() -> DriveConfig {
        DriveConfig {
            acceleration: 0.02,
            max_speed: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_forward_accelerates_to_cap() {
        let config = config();
        let forward = held(&[ControlKey::Forward]);
        let mut speed = 0.0;
        for n in 1..=80 {
            speed = next_speed(forward, speed, speed, &config);
            let expected = (0.02 * n as f32).min(1.0);
            assert!((speed - expected).abs() < 1e-4, "tick {n}: {speed} vs {expected}");
        }
        assert_eq!(speed, 1.0);
    }

    #[test]
    fn test_back_accelerates_negative() {
        let config = config();
        let back = held(&[ControlKey::Back]);
        let speed = next_speed(back, 0.0, 0.0, &config);
        assert!((speed + 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_forward_wins_over_back() {
        let config = config();
        let both = held(&[ControlKey::Forward, ControlKey::Back]);
        assert!(next_speed(both, 0.0, 0.0, &config) > 0.0);
    }

    #[test]
    fn test_brake_keeps_sign_and_floors_at_zero() {
        let config = config();
        let brake = held(&[ControlKey::Brake, ControlKey::Forward]);
        let speed = next_speed(brake, -0.5, -0.5, &config);
        assert!((speed + 0.47).abs() < 1e-6);
        assert_eq!(next_speed(brake, 0.01, 0.01, &config), 0.0);
    }

    #[test]
    fn test_reversal_decelerates_before_flipping() {
        let config = config();
        let back = held(&[ControlKey::Back]);
        let mut speed: f32 = 0.5;
        let mut flipped = false;
        for _ in 0..100 {
            let previous = speed;
            speed = next_speed(back, speed, previous, &config);
            if speed < 0.0 {
                // Only flips out of a full stop
                assert_eq!(previous, 0.0);
                flipped = true;
                break;
            }
            assert!(speed < previous || speed == 0.0);
        }
        assert!(flipped);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let config = config();
        let none = ControlSet::EMPTY;
        assert_eq!(next_speed(none, 0.004, 0.004, &config), 0.0);
        assert_eq!(next_speed(none, -0.005, -0.005, &config), 0.0);
        let speed = next_speed(none, 0.3, 0.3, &config);
        assert!((speed - 0.295).abs() < 1e-6);
    }

    #[test]
    fn test_signed_accumulator_crosses_zero() {
        let config = DriveConfig {
            acceleration_policy: AccelerationPolicy::SignedAccumulator,
            ..config()
        };
        let forward = held(&[ControlKey::Forward]);
        let speed = next_speed(forward, -0.01, 0.0, &config);
        assert!((speed - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_signed_accumulator_skips_reversal_rule() {
        let config = DriveConfig {
            acceleration_policy: AccelerationPolicy::SignedAccumulator,
            ..config()
        };
        let back = held(&[ControlKey::Back]);
        assert!((next_speed(back, 0.5, 0.5, &config) - 0.48).abs() < 1e-6);
        assert!((next_speed(back, 0.01, 0.01, &config) + 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_decelerate_never_flips() {
        assert_eq!(decelerate(0.03, 0.05), 0.0);
        assert!((decelerate(-0.5, 0.05) + 0.45).abs() < 1e-6);
    }

    fn controls_strategy() -> impl Strategy<Value = ControlSet> {
        prop::collection::vec(prop::sample::select(ControlKey::ALL.to_vec()), 0..4)
            .prop_map(|keys| keys.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_speed_stays_bounded(
            controls in controls_strategy(),
            current in -1.0f32..=1.0,
            previous in -1.0f32..=1.0,
            signed_acc in any::<bool>(),
        ) {
            let mut config = config();
            if signed_acc {
                config.acceleration_policy = AccelerationPolicy::SignedAccumulator;
            }
            let speed = next_speed(controls, current, previous, &config);
            prop_assert!(speed.abs() <= config.max_speed);
        }

        #[test]
        fn prop_brake_stops_within_bound(start in -1.0f32..=1.0) {
            let config = config();
            let brake = ControlSet::EMPTY.with(ControlKey::Brake);
            let ticks = (start.abs() / config.brake_deceleration).ceil() as usize;
            let mut speed = start;
            for _ in 0..ticks {
                let next = next_speed(brake, speed, speed, &config);
                prop_assert!(next * start >= 0.0, "sign overshoot");
                speed = next;
            }
            prop_assert_eq!(speed, 0.0);
        }

        #[test]
        fn prop_friction_decays_monotonically(start in -1.0f32..=1.0) {
            let config = config();
            let mut speed = start;
            let max_ticks = (start.abs() / config.friction).ceil() as usize + 1;
            for _ in 0..max_ticks {
                let next = next_speed(ControlSet::EMPTY, speed, speed, &config);
                prop_assert!(next.abs() <= speed.abs());
                prop_assert!(next * start >= 0.0, "sign flipped while coasting");
                speed = next;
            }
            prop_assert_eq!(speed, 0.0);
        }
    }
}
