//! Follow camera
//!
//! Reads the committed pose once per tick; never feeds back into the sim.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_IDLE_LERP, CAMERA_MIN_HEIGHT, CAMERA_OFFSET};
use crate::sim::PoseSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowCamera {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Offset from the vehicle in world space; it does not turn with the heading
    pub offset: Vec3,
    pub min_height: f32,
    /// Per-update blend toward the target while the vehicle is idle
    pub idle_lerp: f32,
    /// Free orbiting is only allowed while the vehicle is idle
    pub orbit_enabled: bool,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            position: Vec3::from(CAMERA_OFFSET),
            look_at: Vec3::ZERO,
            offset: Vec3::from(CAMERA_OFFSET),
            min_height: CAMERA_MIN_HEIGHT,
            idle_lerp: CAMERA_IDLE_LERP,
            orbit_enabled: true,
        }
    }
}

impl FollowCamera {
    /// Start already framing the source
    pub fn framing(source: &impl PoseSource) -> Self {
        let vehicle = source.current_pose().position;
        let camera = Self::default();
        Self {
            position: camera.target(vehicle),
            look_at: vehicle,
            ..camera
        }
    }

    /// Where the camera wants to be for a vehicle at `vehicle`
    pub fn target(&self, vehicle: Vec3) -> Vec3 {
        let mut desired = vehicle + self.offset;
        desired.y = desired.y.max(self.min_height);
        desired
    }

    pub fn update(&mut self, source: &impl PoseSource) {
        let vehicle = source.current_pose().position;
        let desired = self.target(vehicle);
        let moving = source.is_moving();

        if moving {
            self.position = desired;
        } else {
            self.position = self.position.lerp(desired, self.idle_lerp);
        }
        self.look_at = vehicle;
        self.orbit_enabled = !moving;
    }
}
