//! Loop Racer - arcade driving on a bounded street loop
//!
//! Core modules:
//! - `sim`: Deterministic vehicle simulation (input, speed, heading, track bounds, tick)
//! - `config`: Tunable driving and track parameters
//! - `camera`: Follow camera that trails the committed pose
//! - `session`: Host-agnostic driver tying input, clock, vehicle and camera together
//! - `autopilot`: Seeded key scripts for headless runs

pub mod autopilot;
pub mod camera;
pub mod config;
pub mod session;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{
    AccelerationPolicy, BoundaryPolicy, ConfigError, DriveConfig, TrackConfig, TrackKind,
};
pub use session::Session;

use glam::{Vec2, Vec3};

/// Driving configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick every ~16ms)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Vehicle motion (units per tick)
    pub const ACCELERATION: f32 = 0.02;
    pub const MAX_SPEED: f32 = 2.0;
    pub const BRAKE_DECELERATION: f32 = 0.03;
    /// Decay per tick with no throttle input
    pub const FRICTION: f32 = 0.005;
    /// Penalty for hitting the outer boundary
    pub const BUMP_DECELERATION: f32 = 0.05;
    /// Penalty for rolling onto the infield
    pub const INNER_BUMP_DECELERATION: f32 = 0.01;
    /// Heading change per tick at standstill (radians)
    pub const TURN_STEP: f32 = std::f32::consts::PI / 90.0;
    pub const MIN_SPEED_TO_TURN: f32 = 0.02;
    /// Speed magnitude above which the vehicle counts as moving
    pub const MOVING_THRESHOLD: f32 = 0.0;

    /// Street loop dimensions
    pub const LOOP_SIZE: f32 = 200.0;
    pub const STREET_WIDTH: f32 = 20.0;
    pub const CORNER_RADIUS: f32 = 40.0;
    pub const INNER_CORNER_RADIUS: f32 = 20.0;
    pub const STREET_DEPTH: f32 = 0.1;
    pub const STREET_INNER_DEPTH: f32 = 0.2;

    /// Square layout dimensions
    pub const LAYOUT_SIZE: f32 = 1000.0;
    pub const LAYOUT_DEPTH: f32 = -0.1;
    pub const BOUNDARY_DEPTH: f32 = -0.2;
    pub const OUTERSIDE_DEPTH: f32 = -0.5;

    /// Extrusion bevel (matches the usual modelling-tool default)
    pub const BEVEL_THICKNESS: f32 = 0.2;
    pub const BEVEL_SIZE: f32 = 0.1;
    /// Line segments per quarter-circle fillet
    pub const ARC_SEGMENTS: u32 = 12;

    /// Camera trails above and behind the vehicle
    pub const CAMERA_OFFSET: [f32; 3] = [0.0, 5.0, 10.0];
    pub const CAMERA_MIN_HEIGHT: f32 = 1.0;
    pub const CAMERA_IDLE_LERP: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit travel direction on the ground plane for a yaw angle.
///
/// Yaw 0 faces -Z; positive yaw turns left (counter-clockwise seen from above).
#[inline]
pub fn yaw_to_direction(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Sign of a value, with exact zero mapping to zero
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
