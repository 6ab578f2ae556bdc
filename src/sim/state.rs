//! Vehicle state and core simulation types
//!
//! Everything a tick reads and commits lives here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::yaw_to_direction;

/// Whether the vehicle is rolling; the only "is moving" signal hosts see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPhase {
    #[default]
    Idle,
    Moving,
}

impl MotionPhase {
    /// Phase for a speed, given the configured threshold
    pub fn for_speed(speed: f32, threshold: f32) -> Self {
        if speed.abs() > threshold {
            MotionPhase::Moving
        } else {
            MotionPhase::Idle
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, MotionPhase::Moving)
    }
}

/// Position on the ground plane plus yaw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Radians; 0 faces -Z, positive turns left
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Unit vector the vehicle travels along at positive speed
    pub fn direction(&self) -> Vec3 {
        yaw_to_direction(self.yaw)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0)
    }
}

/// Signed speed and the value committed on the tick before
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedState {
    pub current: f32,
    /// Used to spot a direction reversal
    pub previous: f32,
}

impl SpeedState {
    /// Commit `speed`, shifting the old current into previous
    pub fn advanced(&self, speed: f32) -> Self {
        Self {
            current: speed,
            previous: self.current,
        }
    }
}

/// Complete vehicle state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub pose: Pose,
    pub speed: SpeedState,
    pub phase: MotionPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl VehicleState {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            speed: SpeedState::default(),
            phase: MotionPhase::Idle,
            time_ticks: 0,
        }
    }

    /// Spawn at the configured start pose
    pub fn from_config(config: &DriveConfig) -> Self {
        Self::new(Pose::new(config.initial_position, config.initial_yaw))
    }

    pub fn is_moving(&self) -> bool {
        self.phase.is_moving()
    }
}

/// Read-only view of the committed pose for cameras and renderers
pub trait PoseSource {
    fn current_pose(&self) -> Pose;
    fn is_moving(&self) -> bool;
}

impl PoseSource for VehicleState {
    fn current_pose(&self) -> Pose {
        self.pose
    }

    fn is_moving(&self) -> bool {
        self.phase.is_moving()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_threshold() {
        assert_eq!(MotionPhase::for_speed(0.0, 0.0), MotionPhase::Idle);
        assert_eq!(MotionPhase::for_speed(-0.01, 0.0), MotionPhase::Moving);
        assert_eq!(MotionPhase::for_speed(0.05, 0.1), MotionPhase::Idle);
    }

    #[test]
    fn test_speed_state_advanced() {
        let speed = SpeedState {
            current: 0.4,
            previous: 0.3,
        };
        let next = speed.advanced(0.42);
        assert_eq!(next.previous, 0.4);
        assert_eq!(next.current, 0.42);
    }

    #[test]
    fn test_spawn_from_config() {
        let config = DriveConfig::default();
        let state = VehicleState::from_config(&config);
        assert_eq!(state.pose.position, config.initial_position);
        assert!(!state.is_moving());
        assert_eq!(state.speed, SpeedState::default());
    }
}
