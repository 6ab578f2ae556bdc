//! Fixed timestep simulation tick
//!
//! Advances the vehicle one step: speed, tentative move, boundary check,
//! resolution, steering, commit. Nothing is written back until the end, so a
//! tick is all-or-nothing.

use serde::{Deserialize, Serialize};

use super::bounds::{BoundaryOracle, BoundaryVerdict, BoundsError};
use super::heading::next_heading;
use super::input::ControlSet;
use super::speed::{decelerate, next_speed};
use super::state::{MotionPhase, Pose, VehicleState};
use crate::config::{BoundaryPolicy, DriveConfig};

/// How the tentative move was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Move kept as-is
    Accepted,
    /// Rolled onto the infield: move kept, small speed penalty
    SoftBumped,
    /// Hit the boundary: move undone, speed penalty
    Bumped,
    /// Hit the boundary: speed flipped and the vehicle pushed back
    Bounced,
}

/// What happened during one tick, for hosts that want to react (sound, UI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub verdict: BoundaryVerdict,
    pub resolution: Resolution,
    /// Set when the oracle could not answer and the move was treated as out of bounds
    pub oracle_error: Option<BoundsError>,
    pub phase: MotionPhase,
}

/// Advance the vehicle by one fixed timestep
pub fn tick<O: BoundaryOracle + ?Sized>(
    state: &mut VehicleState,
    controls: ControlSet,
    oracle: &O,
    config: &DriveConfig,
) -> TickReport {
    let start = state.pose.position;
    let direction = state.pose.direction();

    // The committed speed is both where we are and what the last tick ended on
    let speed = next_speed(controls, state.speed.current, state.speed.current, config);
    let tentative = start + direction * speed;

    let (verdict, oracle_error) = match oracle.classify(tentative) {
        Ok(verdict) => (verdict, None),
        Err(err) => {
            log::warn!("Boundary check failed at {tentative:?}: {err}; treating as out of bounds");
            (BoundaryVerdict::OutOfBounds, Some(err))
        }
    };

    let (position, speed, resolution) = match verdict {
        BoundaryVerdict::OnTrack => (tentative, speed, Resolution::Accepted),
        BoundaryVerdict::InInnerExclusion => {
            let slowed = decelerate(speed, config.inner_bump_deceleration);
            log::debug!("Soft bump at {tentative:?}: speed {speed:.3} -> {slowed:.3}");
            (tentative, slowed, Resolution::SoftBumped)
        }
        BoundaryVerdict::OutOfBounds => {
            let slowed = decelerate(speed, config.bump_deceleration);
            match config.boundary_policy {
                BoundaryPolicy::Revert => {
                    log::debug!(
                        "Out of bounds at {tentative:?}: reverting, speed {speed:.3} -> {slowed:.3}"
                    );
                    (start, slowed, Resolution::Bumped)
                }
                BoundaryPolicy::Bounce => {
                    let bounced = if slowed == 0.0 { 0.0 } else { -slowed };
                    log::debug!(
                        "Out of bounds at {tentative:?}: bouncing, speed {speed:.3} -> {bounced:.3}"
                    );
                    (tentative + direction * bounced, bounced, Resolution::Bounced)
                }
            }
        }
    };

    let phase = MotionPhase::for_speed(speed, config.moving_threshold);
    let yaw = if phase.is_moving() {
        next_heading(state.pose.yaw, controls, speed, config)
    } else {
        state.pose.yaw
    };

    // Commit
    state.pose = Pose::new(position, yaw);
    state.speed = state.speed.advanced(speed);
    state.phase = phase;
    state.time_ticks += 1;

    log::trace!(
        "tick {}: pos={:?} yaw={:.3} speed={:.3} {:?}",
        state.time_ticks,
        state.pose.position,
        state.pose.yaw,
        speed,
        resolution
    );

    TickReport {
        verdict,
        resolution,
        oracle_error,
        phase,
    }
}
